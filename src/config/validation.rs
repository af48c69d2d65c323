//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check backend base URLs are usable HTTP targets
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check public paths are well-formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::admin::{HEALTH_PATH, INFO_PATH};
use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid base URL '{value}': {reason}")]
    InvalidBaseUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field}: path '{value}' must start with '/', contain no '{{', '}}' or '*', and have no segment starting with ':'")]
    InvalidPath { field: &'static str, value: String },

    #[error("routes.resource_path must not be the root path")]
    RootResourcePath,

    #[error("route '{0}' is declared twice")]
    RouteConflict(String),

    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },

    #[error("timeouts.request_secs ({request}) must exceed timeouts.read_secs ({read})")]
    RequestDeadlineTooShort { request: u64, read: u64 },

    #[error("routes.required_content_type: '{0}' is not a type/subtype media type")]
    InvalidContentType(String),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_base_url("upstream.backend_url", &config.upstream.backend_url, &mut errors);
    check_base_url("upstream.dashboard_url", &config.upstream.dashboard_url, &mut errors);

    check_path("routes.resource_path", &config.routes.resource_path, &mut errors);
    check_path("routes.aggregate_suffix", &config.routes.aggregate_suffix, &mut errors);
    check_path("routes.dashboard_path", &config.routes.dashboard_path, &mut errors);
    check_route_layout(config, &mut errors);

    if !is_media_type(&config.routes.required_content_type) {
        errors.push(ValidationError::InvalidContentType(
            config.routes.required_content_type.clone(),
        ));
    }

    check_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("timeouts.connect_secs", timeouts.connect_secs),
        ("timeouts.read_secs", timeouts.read_secs),
        ("timeouts.request_secs", timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }
    if timeouts.read_secs > 0 && timeouts.request_secs <= timeouts.read_secs {
        errors.push(ValidationError::RequestDeadlineTooShort {
            request: timeouts.request_secs,
            read: timeouts.read_secs,
        });
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero { field: "limits.max_body_bytes" });
    }
    if config.limits.max_response_body_bytes == 0 {
        errors.push(ValidationError::Zero { field: "limits.max_response_body_bytes" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    let invalid = |reason: String| ValidationError::InvalidBaseUrl {
        field,
        value: value.to_string(),
        reason,
    };

    let url = match Url::parse(value) {
        Ok(url) => url,
        Err(e) => {
            errors.push(invalid(e.to_string()));
            return;
        }
    };

    if url.scheme() != "http" {
        errors.push(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        errors.push(invalid("missing host".to_string()));
    }
    // The inbound query string is appended with '?', so the base must not carry one.
    if url.query().is_some() || url.fragment().is_some() {
        errors.push(invalid("query and fragment are not allowed".to_string()));
    }
}

fn check_path(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    // Braces and stars would turn a literal path into a router pattern;
    // the router refuses `:` segments outright.
    let pattern_like = value.contains(['{', '}', '*'])
        || value.split('/').any(|segment| segment.starts_with(':'));
    if !value.starts_with('/') || pattern_like {
        errors.push(ValidationError::InvalidPath {
            field,
            value: value.to_string(),
        });
    }
}

fn check_route_layout(config: &GatewayConfig, errors: &mut Vec<ValidationError>) {
    let resource = config.routes.resource_path.trim_end_matches('/');
    if resource.is_empty() {
        errors.push(ValidationError::RootResourcePath);
        return;
    }

    let aggregate = format!("{}{}", resource, config.routes.aggregate_suffix);
    let dashboard = config.routes.dashboard_path.as_str();
    let collection = [resource.to_string(), format!("{resource}/")];

    if collection.contains(&aggregate) {
        errors.push(ValidationError::RouteConflict(aggregate.clone()));
    }
    if dashboard == aggregate || collection.iter().any(|path| path == dashboard) {
        errors.push(ValidationError::RouteConflict(dashboard.to_string()));
    }

    // Admin endpoints are mounted beside the forwarded routes
    for admin in [HEALTH_PATH, INFO_PATH] {
        let taken = aggregate == admin
            || dashboard == admin
            || collection.iter().any(|path| path == admin);
        if taken {
            errors.push(ValidationError::RouteConflict(admin.to_string()));
        }
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn is_media_type(value: &str) -> bool {
    match value.split_once('/') {
        Some((ty, subtype)) => {
            !ty.trim().is_empty() && !subtype.trim().is_empty() && !subtype.contains('/')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn rejects_non_http_backend() {
        let mut config = GatewayConfig::default();
        config.upstream.backend_url = "https://backend.internal/api/todos".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ValidationError::InvalidBaseUrl { field: "upstream.backend_url", .. }
        ));
    }

    #[test]
    fn rejects_base_url_with_query() {
        let mut config = GatewayConfig::default();
        config.upstream.dashboard_url = "http://dash:8084/summary?x=1".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::InvalidBaseUrl { field: "upstream.dashboard_url", .. }
        ));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.upstream.backend_url = "not a url".into();
        config.routes.resource_path = "api/todos".into();
        config.listener.bind_address = "localhost".into();
        config.timeouts.connect_secs = 0;
        config.routes.required_content_type = "json".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn rejects_pattern_characters_in_paths() {
        let mut config = GatewayConfig::default();
        config.routes.aggregate_suffix = "/{kind}".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::InvalidPath { field: "routes.aggregate_suffix", .. }
        ));
    }

    #[test]
    fn rejects_colon_segments() {
        let mut config = GatewayConfig::default();
        config.routes.resource_path = "/api/:todos".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidPath {
                field: "routes.resource_path",
                value: "/api/:todos".into(),
            }]
        );

        let mut config = GatewayConfig::default();
        config.routes.dashboard_path = "/api/dash:board".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_root_resource_and_conflicts() {
        let mut config = GatewayConfig::default();
        config.routes.resource_path = "/".into();
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::RootResourcePath]
        );

        let mut config = GatewayConfig::default();
        config.routes.dashboard_path = "/api/todos/getTotalCategory".into();
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::RouteConflict("/api/todos/getTotalCategory".into())]
        );
    }

    #[test]
    fn rejects_routes_shadowing_admin_endpoints() {
        let mut config = GatewayConfig::default();
        config.routes.dashboard_path = "/actuator/health".into();
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::RouteConflict("/actuator/health".into())]
        );
    }

    #[test]
    fn request_deadline_must_cover_read_timeout() {
        let mut config = GatewayConfig::default();
        config.timeouts.read_secs = 30;
        config.timeouts.request_secs = 30;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::RequestDeadlineTooShort { request: 30, read: 30 }]
        );
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
