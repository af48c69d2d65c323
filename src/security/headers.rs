//! Header propagation between caller and backend.
//!
//! # Responsibilities
//! - Copy header sets preserving order and repeated keys
//! - Strip hop-by-hop headers when the policy asks for it
//!
//! # Design Decisions
//! - `append`, never `insert`: multi-valued headers stay multi-valued
//! - `Host` is treated as connection-level and re-derived from the target
//! - Headers listed in `Connection` are hop-by-hop for that message only

use axum::http::header::{self, HeaderMap, HeaderName};

use crate::config::HeaderConfig;

/// Hop-by-hop headers (RFC 9110 §7.6.1) plus `Host` and the legacy
/// `Proxy-Connection`.
const HOP_BY_HOP: [HeaderName; 10] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::HOST,
];

/// How headers cross the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderPolicy {
    strip_hop_by_hop: bool,
}

impl HeaderPolicy {
    /// Forward every header unchanged.
    pub const fn verbatim() -> Self {
        Self { strip_hop_by_hop: false }
    }

    /// Drop hop-by-hop headers in both directions.
    pub const fn strip_hop_by_hop() -> Self {
        Self { strip_hop_by_hop: true }
    }

    pub fn from_config(config: &HeaderConfig) -> Self {
        Self {
            strip_hop_by_hop: config.strip_hop_by_hop,
        }
    }

    /// Copy `source` into a fresh header set according to the policy.
    pub fn copy(&self, source: &HeaderMap) -> HeaderMap {
        let mut copied = HeaderMap::with_capacity(source.len());

        if !self.strip_hop_by_hop {
            for (name, value) in source.iter() {
                copied.append(name.clone(), value.clone());
            }
            return copied;
        }

        let named = connection_tokens(source);
        for (name, value) in source.iter() {
            if HOP_BY_HOP.contains(name) || named.contains(name) {
                continue;
            }
            copied.append(name.clone(), value.clone());
        }
        copied
    }
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        Self::strip_hop_by_hop()
    }
}

/// Header names listed in the `Connection` header(s).
fn connection_tokens(headers: &HeaderMap) -> Vec<HeaderName> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect()
}
