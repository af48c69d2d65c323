//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (requests, latency, upstream failures)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by operation, method, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_upstream_failures_total` (counter): calls with no backend answer
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op
//! - Labels are low-cardinality: operation names, methods, status codes

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter, serving `/metrics` on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Record one relayed request.
pub fn record_request(operation: &'static str, method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "operation" => operation,
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// Record a call that produced no backend response.
pub fn record_upstream_failure(operation: &'static str, timeout: bool) {
    let kind = if timeout { "timeout" } else { "request" };
    counter!("gateway_upstream_failures_total", "operation" => operation, "kind" => kind)
        .increment(1);
}
