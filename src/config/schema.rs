//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend base URLs the forwarding operations target.
    pub upstream: UpstreamConfig,

    /// Public paths exposed by the gateway.
    pub routes: RoutesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Header propagation policy.
    pub headers: HeaderConfig,

    /// Body size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Backend locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the resource backend. List, create, get, update, delete
    /// and aggregate calls are built on top of it.
    pub backend_url: String,

    /// Base URL of the dashboard summary backend.
    pub dashboard_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8082/api/todos".to_string(),
            dashboard_url: "http://localhost:8084/api/dashboard/totalCategory".to_string(),
        }
    }
}

/// Public path layout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Collection path; item routes live under `{resource_path}/{id}`.
    pub resource_path: String,

    /// Suffix shared by the public aggregate route and its backend target.
    pub aggregate_suffix: String,

    /// Public path of the dashboard summary.
    pub dashboard_path: String,

    /// Media type required on create and update.
    pub required_content_type: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            resource_path: "/api/todos".to_string(),
            aggregate_suffix: "/getTotalCategory".to_string(),
            dashboard_path: "/api/dashboard/totalCategory".to_string(),
            required_content_type: "application/json".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Backend connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed for the backend to answer, body included, in seconds.
    pub read_secs: u64,

    /// Overall inbound request deadline in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            read_secs: 30,
            request_secs: 60,
        }
    }
}

/// Header propagation policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Drop hop-by-hop headers (and `Host`) in both directions.
    pub strip_hop_by_hop: bool,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            strip_hop_by_hop: true,
        }
    }
}

/// Body size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_bytes: usize,

    /// Maximum backend response body size in bytes.
    pub max_response_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024,           // 2MB
            max_response_body_bytes: 16 * 1024 * 1024, // 16MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
