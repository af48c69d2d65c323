//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router from the dispatch table
//! - Wire up middleware (tracing, limits, request ID, deadline)
//! - Bind server to listener
//! - Run each forwarding operation and relay its outcome
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::Instrument;

use crate::admin;
use crate::config::GatewayConfig;
use crate::forwarding::{
    BackendOutcome, ForwardingOperation, HyperOutboundClient, InboundRequest, OutboundClient,
};
use crate::http::request::{request_id, MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::relay;
use crate::observability::metrics;
use crate::routing::DispatchTable;
use crate::security::HeaderPolicy;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn OutboundClient>,
    pub header_policy: HeaderPolicy,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server forwarding over the pooled hyper client.
    pub fn new(config: GatewayConfig) -> Self {
        let client = Arc::new(HyperOutboundClient::new(&config.timeouts, &config.limits));
        Self::with_client(config, client)
    }

    /// Create a server forwarding over `client`.
    pub fn with_client(config: GatewayConfig, client: Arc<dyn OutboundClient>) -> Self {
        let state = AppState {
            client,
            header_policy: HeaderPolicy::from_config(&config.headers),
        };

        let table = DispatchTable::from_config(&config);
        for route in table.routes() {
            tracing::debug!(
                method = %route.method,
                pattern = %route.pattern,
                operation = %route.operation.operation,
                target = %route.operation.base_url,
                "Route registered"
            );
        }

        let router = Self::build_router(&config, table, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, table: DispatchTable, state: AppState) -> Router {
        table
            .into_router()
            .merge(admin::setup_admin_router())
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// A handle on the compiled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend_url = %self.config.upstream.backend_url,
            dashboard_url = %self.config.upstream.dashboard_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Run one forwarding operation and relay its outcome.
pub(crate) async fn forward_handler(
    state: AppState,
    operation: Arc<ForwardingOperation>,
    inbound: InboundRequest,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&inbound.headers);
    let span = tracing::info_span!(
        "forward",
        request_id = %request_id,
        operation = %operation.operation,
    );

    async move {
        let name = operation.operation.as_str();
        let method = operation.method.as_str();

        let outcome = match operation
            .forward(state.client.as_ref(), &inbound, state.header_policy)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "Request rejected before dispatch");
                let response = e.into_response();
                metrics::record_request(name, method, response.status().as_u16(), start);
                return response;
            }
        };

        match &outcome {
            BackendOutcome::Success(response) => {
                tracing::debug!(status = %response.status, "Relaying backend response");
            }
            BackendOutcome::BackendError(response) => {
                tracing::info!(status = %response.status, "Relaying backend error");
            }
            BackendOutcome::TransportFailure(e) => {
                tracing::error!(error = %e, "Upstream request failed");
                metrics::record_upstream_failure(name, e.is_timeout());
            }
        }

        let response = relay(outcome, state.header_policy);
        metrics::record_request(name, method, response.status().as_u16(), start);
        tracing::debug!(
            status = %response.status(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Request complete"
        );
        response
    }
    .instrument(span)
    .await
}
