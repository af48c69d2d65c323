//! HTTP forwarding gateway library.
//!
//! Exposes a stable public API and relays every call to its backend,
//! reproducing the backend's status, headers and body, errors included.

pub mod admin;
pub mod config;
pub mod forwarding;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
