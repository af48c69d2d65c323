//! Gateway-owned endpoints.
//!
//! Served by the gateway itself and never forwarded.

pub mod handlers;

use axum::{routing::get, Router};

use self::handlers::*;

/// Path of the liveness endpoint.
pub const HEALTH_PATH: &str = "/actuator/health";
/// Path of the build information endpoint.
pub const INFO_PATH: &str = "/actuator/info";

pub fn setup_admin_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(HEALTH_PATH, get(get_health))
        .route(INFO_PATH, get(get_info))
}
