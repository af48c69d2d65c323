//! Outbound client: executes exactly one backend call.
//!
//! # Responsibilities
//! - Send an `OutboundCall` over the shared connection pool
//! - Bound connect and read time
//! - Buffer the backend body and classify the result
//!
//! # Design Decisions
//! - Never retries; a call is attempted once
//! - Non-2xx/3xx answers are data (`BackendError`), not failures
//! - Dropping the returned future aborts the in-flight call

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::{LimitsConfig, TimeoutConfig};
use crate::forwarding::types::{BackendOutcome, BackendResponse, OutboundCall, TransportError};

/// Anything able to carry an outbound call to a backend.
#[async_trait]
pub trait OutboundClient: Send + Sync {
    async fn execute(&self, call: OutboundCall) -> BackendOutcome;
}

/// Pooled HTTP/1.1 client backed by `hyper-util`.
#[derive(Clone)]
pub struct HyperOutboundClient {
    client: Client<HttpConnector, Body>,
    connect_timeout: Duration,
    read_timeout: Duration,
    max_body_bytes: usize,
}

impl HyperOutboundClient {
    pub fn new(timeouts: &TimeoutConfig, limits: &LimitsConfig) -> Self {
        let connect_timeout = Duration::from_secs(timeouts.connect_secs);
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            connect_timeout,
            read_timeout: Duration::from_secs(timeouts.read_secs),
            max_body_bytes: limits.max_response_body_bytes,
        }
    }

    fn build_request(call: OutboundCall) -> Result<Request<Body>, TransportError> {
        let uri: Uri = call.url.parse().map_err(|e: axum::http::uri::InvalidUri| {
            TransportError::InvalidTarget {
                url: call.url.clone(),
                reason: e.to_string(),
            }
        })?;

        let mut request = Request::builder()
            .method(call.method)
            .uri(uri)
            .body(call.body.map(Body::from).unwrap_or_else(Body::empty))
            .map_err(|e| TransportError::InvalidTarget {
                url: call.url.clone(),
                reason: e.to_string(),
            })?;

        *request.headers_mut() = call.headers;
        Ok(request)
    }

    async fn send(&self, request: Request<Body>) -> Result<BackendResponse, TransportError> {
        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| {
                if e.is_connect() && caused_by_timeout(&e) {
                    TransportError::Timeout(self.connect_timeout)
                } else {
                    TransportError::Request(e.to_string())
                }
            })?;

        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(Body::new(body), self.max_body_bytes)
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(BackendResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}

/// Whether any error in the source chain is an I/O timeout.
fn caused_by_timeout(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<io::Error>() {
            if io.kind() == io::ErrorKind::TimedOut {
                return true;
            }
        }
        current = e.source();
    }
    false
}

#[async_trait]
impl OutboundClient for HyperOutboundClient {
    async fn execute(&self, call: OutboundCall) -> BackendOutcome {
        let request = match Self::build_request(call) {
            Ok(request) => request,
            Err(e) => return BackendOutcome::TransportFailure(e),
        };

        match tokio::time::timeout(self.read_timeout, self.send(request)).await {
            Ok(Ok(response)) => BackendOutcome::from_response(response),
            Ok(Err(e)) => BackendOutcome::TransportFailure(e),
            Err(_) => BackendOutcome::TransportFailure(TransportError::Timeout(self.read_timeout)),
        }
    }
}
