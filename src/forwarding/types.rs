//! Values flowing through a single forwarded call.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use thiserror::Error;

/// An inbound call as seen by a forwarding operation.
///
/// Built once per request and only read afterwards.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Path variables in the order the route pattern declares them.
    pub path_vars: Vec<(String, String)>,
    /// Everything after `?`, untouched. `Some("")` for a bare `?`.
    pub raw_query: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl InboundRequest {
    pub fn path_var(&self, name: &str) -> Option<&str> {
        self.path_vars
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// The equivalent call sent to the backend.
#[derive(Debug, Clone)]
pub struct OutboundCall {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// Status, headers and body as the backend returned them.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Result of one outbound call.
#[derive(Debug)]
pub enum BackendOutcome {
    /// The backend answered with a 2xx or 3xx status.
    Success(BackendResponse),
    /// The backend answered, with any other status.
    BackendError(BackendResponse),
    /// No usable response was obtained.
    TransportFailure(TransportError),
}

impl BackendOutcome {
    /// Classify a complete backend response by its status.
    pub fn from_response(response: BackendResponse) -> Self {
        if response.status.is_success() || response.status.is_redirection() {
            BackendOutcome::Success(response)
        } else {
            BackendOutcome::BackendError(response)
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BackendOutcome::Success(_) => "success",
            BackendOutcome::BackendError(_) => "backend_error",
            BackendOutcome::TransportFailure(_) => "transport_failure",
        }
    }
}

/// Why no backend response could be relayed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid target URL '{url}': {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("upstream request failed: {0}")]
    Request(String),

    #[error("upstream did not answer within {0:?}")]
    Timeout(Duration),

    #[error("failed to read upstream body: {0}")]
    Body(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}

/// Failures detected before any outbound call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForwardError {
    #[error("missing path variable '{0}'")]
    MissingPathVariable(&'static str),

    #[error("unsupported content type, expected '{expected}'")]
    UnsupportedMediaType { expected: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> BackendResponse {
        BackendResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    #[test]
    fn classifies_by_status() {
        assert!(matches!(BackendOutcome::from_response(response(200)), BackendOutcome::Success(_)));
        assert!(matches!(BackendOutcome::from_response(response(204)), BackendOutcome::Success(_)));
        assert!(matches!(BackendOutcome::from_response(response(302)), BackendOutcome::Success(_)));
        assert!(matches!(
            BackendOutcome::from_response(response(404)),
            BackendOutcome::BackendError(_)
        ));
        assert!(matches!(
            BackendOutcome::from_response(response(503)),
            BackendOutcome::BackendError(_)
        ));
    }

    #[test]
    fn path_var_lookup() {
        let inbound = InboundRequest {
            method: Method::GET,
            path_vars: vec![("id".into(), "1002".into())],
            raw_query: None,
            headers: HeaderMap::new(),
            body: None,
        };
        assert_eq!(inbound.path_var("id"), Some("1002"));
        assert_eq!(inbound.path_var("other"), None);
    }
}
