//! Response relay.
//!
//! # Responsibilities
//! - Turn a `BackendOutcome` into the response sent to the caller
//! - Keep backend status, headers and body for both success and error answers
//! - Synthesize a gateway status only when no backend answer exists
//!
//! # Design Decisions
//! - A backend 4xx/5xx is relayed as is, never mapped to 502
//! - Timeouts result in 504 Gateway Timeout, other transport failures in 502
//! - Header policy applies on the way back as well

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::forwarding::{BackendOutcome, BackendResponse, ForwardError, TransportError};
use crate::security::HeaderPolicy;

/// Body sent when the backend could not be reached.
pub const UPSTREAM_FAILED: &str = "Upstream request failed";
/// Body sent when the backend did not answer in time.
pub const UPSTREAM_TIMED_OUT: &str = "Upstream request timed out";

/// Map an outcome onto the caller-facing response.
pub fn relay(outcome: BackendOutcome, policy: HeaderPolicy) -> Response {
    match outcome {
        BackendOutcome::Success(response) | BackendOutcome::BackendError(response) => {
            pass_through(response, policy)
        }
        BackendOutcome::TransportFailure(error) => transport_failure(&error),
    }
}

fn pass_through(response: BackendResponse, policy: HeaderPolicy) -> Response {
    let mut relayed = Response::new(Body::from(response.body));
    *relayed.status_mut() = response.status;
    *relayed.headers_mut() = policy.copy(&response.headers);
    relayed
}

/// Response for a call that produced no backend answer.
pub fn transport_failure(error: &TransportError) -> Response {
    let (status, body) = if error.is_timeout() {
        (StatusCode::GATEWAY_TIMEOUT, UPSTREAM_TIMED_OUT)
    } else {
        (StatusCode::BAD_GATEWAY, UPSTREAM_FAILED)
    };
    plain(status, body)
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let status = match &self {
            ForwardError::MissingPathVariable(_) => StatusCode::BAD_REQUEST,
            ForwardError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        };
        plain(status, &self.to_string())
    }
}

fn plain(status: StatusCode, body: &str) -> Response {
    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::HeaderMap;
    use std::time::Duration;

    async fn body_of(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    fn backend(status: StatusCode, body: &'static str) -> BackendResponse {
        let mut headers = HeaderMap::new();
        headers.append(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));
        headers.append(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        BackendResponse {
            status,
            headers,
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[tokio::test]
    async fn success_is_relayed_unchanged() {
        let body = r#"[{"name":"Test","id":1002},{"name":"Test 2","id":1003}]"#;
        let response = relay(
            BackendOutcome::Success(backend(StatusCode::OK, body)),
            HeaderPolicy::default(),
        );

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let cookies: Vec<_> = response.headers().get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
        assert!(response.headers().get(header::TRANSFER_ENCODING).is_none());
        assert_eq!(body_of(response).await, body.as_bytes());
    }

    #[tokio::test]
    async fn backend_error_keeps_its_status_and_body() {
        let response = relay(
            BackendOutcome::from_response(backend(StatusCode::NOT_FOUND, r#"{"error":"not found"}"#)),
            HeaderPolicy::default(),
        );

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(body_of(response).await, &br#"{"error":"not found"}"#[..]);
    }

    #[tokio::test]
    async fn no_content_stays_empty() {
        let response = relay(
            BackendOutcome::Success(backend(StatusCode::NO_CONTENT, "")),
            HeaderPolicy::default(),
        );
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn transport_failures_are_synthesized() {
        let refused = relay(
            BackendOutcome::TransportFailure(TransportError::Request("refused".into())),
            HeaderPolicy::default(),
        );
        assert_eq!(refused.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_of(refused).await, UPSTREAM_FAILED.as_bytes());

        let timed_out = relay(
            BackendOutcome::TransportFailure(TransportError::Timeout(Duration::from_secs(1))),
            HeaderPolicy::default(),
        );
        assert_eq!(timed_out.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body_of(timed_out).await, UPSTREAM_TIMED_OUT.as_bytes());
    }

    #[test]
    fn forward_errors_map_to_client_statuses() {
        let response = ForwardError::UnsupportedMediaType {
            expected: "application/json".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let response = ForwardError::MissingPathVariable("id").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
