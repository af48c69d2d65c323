//! Forwarding operations: one per public resource action.
//!
//! An operation turns an `InboundRequest` into exactly one `OutboundCall`
//! and hands the `BackendOutcome` back untouched. It never looks at payloads.

use std::fmt;

use axum::http::{header, HeaderMap, Method};

use crate::config::GatewayConfig;
use crate::forwarding::client::OutboundClient;
use crate::forwarding::types::{BackendOutcome, ForwardError, InboundRequest, OutboundCall};
use crate::forwarding::url;
use crate::security::HeaderPolicy;

/// Path variable carrying the resource identifier.
pub const ID_VAR: &str = "id";

/// Logical resource actions exposed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Aggregate,
    Get,
    Create,
    Update,
    Delete,
    Dashboard,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::List,
        Operation::Aggregate,
        Operation::Get,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
        Operation::Dashboard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Aggregate => "aggregate",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What gets appended to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suffix {
    None,
    Literal(String),
    /// `/{value}` of the named path variable.
    PathVar(&'static str),
}

/// A fully resolved forwarding operation.
#[derive(Debug, Clone)]
pub struct ForwardingOperation {
    pub operation: Operation,
    pub method: Method,
    pub base_url: String,
    pub suffix: Suffix,
    pub forwards_body: bool,
    pub forwards_query: bool,
    /// Media type the inbound `Content-Type` must carry, if any.
    pub required_content_type: Option<String>,
}

impl ForwardingOperation {
    /// Resolve `operation` against the configured backends.
    pub fn new(operation: Operation, config: &GatewayConfig) -> Self {
        let backend = config.upstream.backend_url.clone();
        let content_type = Some(config.routes.required_content_type.clone());

        let (method, base_url, suffix, forwards_body, forwards_query, required_content_type) =
            match operation {
                Operation::List => (Method::GET, backend, Suffix::None, false, true, None),
                Operation::Aggregate => (
                    Method::GET,
                    backend,
                    Suffix::Literal(config.routes.aggregate_suffix.clone()),
                    false,
                    true,
                    None,
                ),
                Operation::Get => (Method::GET, backend, Suffix::PathVar(ID_VAR), false, false, None),
                Operation::Create => (Method::POST, backend, Suffix::None, true, false, content_type),
                Operation::Update => {
                    (Method::PUT, backend, Suffix::PathVar(ID_VAR), true, false, content_type)
                }
                Operation::Delete => {
                    (Method::DELETE, backend, Suffix::PathVar(ID_VAR), false, false, None)
                }
                Operation::Dashboard => (
                    Method::GET,
                    config.upstream.dashboard_url.clone(),
                    Suffix::None,
                    false,
                    true,
                    None,
                ),
            };

        Self {
            operation,
            method,
            base_url,
            suffix,
            forwards_body,
            forwards_query,
            required_content_type,
        }
    }

    /// Build the outbound call for `inbound` without sending it.
    pub fn outbound_call(
        &self,
        inbound: &InboundRequest,
        policy: HeaderPolicy,
    ) -> Result<OutboundCall, ForwardError> {
        if let Some(expected) = &self.required_content_type {
            if !content_type_matches(&inbound.headers, expected) {
                return Err(ForwardError::UnsupportedMediaType {
                    expected: expected.clone(),
                });
            }
        }

        let suffix = match &self.suffix {
            Suffix::None => None,
            Suffix::Literal(literal) => Some(literal.clone()),
            Suffix::PathVar(name) => {
                let value = inbound
                    .path_var(name)
                    .ok_or(ForwardError::MissingPathVariable(*name))?;
                Some(format!("/{value}"))
            }
        };

        let query = if self.forwards_query {
            inbound.raw_query.as_deref()
        } else {
            None
        };

        let mut headers = policy.copy(&inbound.headers);
        let body = if self.forwards_body {
            inbound.body.clone()
        } else {
            // Framing headers would describe a body that is not sent.
            headers.remove(header::CONTENT_LENGTH);
            headers.remove(header::TRANSFER_ENCODING);
            None
        };

        Ok(OutboundCall {
            method: self.method.clone(),
            url: url::build(&self.base_url, suffix.as_deref(), query),
            headers,
            body,
        })
    }

    /// Forward `inbound` through `client`: one call, outcome returned as is.
    pub async fn forward<C>(
        &self,
        client: &C,
        inbound: &InboundRequest,
        policy: HeaderPolicy,
    ) -> Result<BackendOutcome, ForwardError>
    where
        C: OutboundClient + ?Sized,
    {
        let call = self.outbound_call(inbound, policy)?;
        tracing::debug!(method = %call.method, target = %call.url, "Dispatching to backend");
        Ok(client.execute(call).await)
    }
}

/// Compare media types, ignoring parameters and case.
fn content_type_matches(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|media| media.trim().eq_ignore_ascii_case(expected.trim()))
        .unwrap_or(false)
}
