//! Dispatch table.
//!
//! # Responsibilities
//! - Declare every public (method, path pattern) pair and its operation
//! - Compile the table into an axum router
//!
//! # Design Decisions
//! - Built once from validated config, immutable afterwards
//! - Routes sharing a pattern are merged into one method router
//! - Static segments take precedence over `{id}` (axum matching rules)

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, Uri},
    routing::{MethodFilter, MethodRouter},
    Router,
};

use crate::config::GatewayConfig;
use crate::forwarding::{ForwardingOperation, Operation, Suffix, ID_VAR};
use crate::http::request::{inbound_request, raw_path_vars};
use crate::http::server::{forward_handler, AppState};

/// A (method, pattern) pair bound to an operation.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: String,
    pub operation: Arc<ForwardingOperation>,
}

/// Ordered, immutable set of routes.
#[derive(Debug, Default)]
pub struct DispatchTable {
    routes: Vec<Route>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the public surface from a validated config.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let resource = config.routes.resource_path.trim_end_matches('/');
        let collection = [resource.to_string(), format!("{resource}/")];
        let item = format!("{resource}/{{{ID_VAR}}}");
        let aggregate = format!("{resource}{}", config.routes.aggregate_suffix);

        let mut table = Self::new();
        for operation in Operation::ALL {
            let forwarding = Arc::new(ForwardingOperation::new(operation, config));
            let patterns: Vec<&str> = match operation {
                Operation::List | Operation::Create => {
                    collection.iter().map(String::as_str).collect()
                }
                Operation::Aggregate => vec![aggregate.as_str()],
                Operation::Get | Operation::Update | Operation::Delete => vec![item.as_str()],
                Operation::Dashboard => vec![config.routes.dashboard_path.as_str()],
            };
            for pattern in patterns {
                table.register(forwarding.method.clone(), pattern, forwarding.clone());
            }
        }
        table
    }

    /// Add a route. Later registrations never replace earlier ones.
    pub fn register(
        &mut self,
        method: Method,
        pattern: impl Into<String>,
        operation: Arc<ForwardingOperation>,
    ) -> &mut Self {
        self.routes.push(Route {
            method,
            pattern: pattern.into(),
            operation,
        });
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Compile into an axum router.
    pub fn into_router(self) -> Router<AppState> {
        let mut grouped: Vec<(String, MethodRouter<AppState>)> = Vec::new();

        for route in self.routes {
            let filter = match MethodFilter::try_from(route.method.clone()) {
                Ok(filter) => filter,
                Err(_) => {
                    tracing::warn!(
                        method = %route.method,
                        pattern = %route.pattern,
                        "Skipping route with unsupported method"
                    );
                    continue;
                }
            };

            match grouped.iter().position(|(pattern, _)| *pattern == route.pattern) {
                Some(index) => {
                    let (pattern, existing) = grouped.remove(index);
                    let method_router = add_handler(existing, filter, &pattern, route.operation);
                    grouped.insert(index, (pattern, method_router));
                }
                None => {
                    let method_router =
                        add_handler(MethodRouter::new(), filter, &route.pattern, route.operation);
                    grouped.push((route.pattern, method_router));
                }
            }
        }

        grouped
            .into_iter()
            .fold(Router::new(), |router, (pattern, method_router)| {
                router.route(&pattern, method_router)
            })
    }
}

/// Attach the forwarding handler for `operation` to `router`.
///
/// Path variables are read from the raw request path, not axum's decoded
/// `Path`, so encoded characters such as `%2F` survive forwarding.
fn add_handler(
    router: MethodRouter<AppState>,
    filter: MethodFilter,
    pattern: &str,
    operation: Arc<ForwardingOperation>,
) -> MethodRouter<AppState> {
    let pattern: Option<Arc<str>> =
        matches!(operation.suffix, Suffix::PathVar(_)).then(|| Arc::from(pattern));

    router.on(
        filter,
        move |State(state): State<AppState>,
              method: Method,
              uri: Uri,
              headers: HeaderMap,
              body: Bytes| {
            let operation = operation.clone();
            let pattern = pattern.clone();
            async move {
                let path_vars = pattern
                    .map(|pattern| raw_path_vars(&pattern, uri.path()))
                    .unwrap_or_default();
                let inbound = inbound_request(method, &uri, headers, path_vars, body);
                forward_handler(state, operation, inbound).await
            }
        },
    )
}
