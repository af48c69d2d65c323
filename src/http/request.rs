//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID when the caller sent none
//! - Capture the inbound call as an immutable `InboundRequest`
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The query string and path variables are taken raw from the URI, never decoded
//! - An empty body is treated as no body

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, Method, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::forwarding::InboundRequest;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        id.parse().ok().map(RequestId::new)
    }
}

/// Request ID of an inbound request, `"unknown"` when absent.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Bind each `{name}` segment of `pattern` to the matching segment of `path`.
///
/// Values keep their percent-encoding so they reach the backend as sent.
pub fn raw_path_vars(pattern: &str, path: &str) -> Vec<(String, String)> {
    pattern
        .split('/')
        .zip(path.split('/'))
        .filter_map(|(template, segment)| {
            let name = template.strip_prefix('{')?.strip_suffix('}')?;
            Some((name.to_string(), segment.to_string()))
        })
        .collect()
}

/// Capture an inbound call.
pub fn inbound_request(
    method: Method,
    uri: &Uri,
    headers: HeaderMap,
    path_vars: Vec<(String, String)>,
    body: Bytes,
) -> InboundRequest {
    InboundRequest {
        method,
        path_vars,
        raw_query: uri.query().map(str::to_string),
        headers,
        body: if body.is_empty() { None } else { Some(body) },
    }
}
