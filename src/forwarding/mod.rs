//! Request forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (built by the http layer)
//!     → operation.rs (pick suffix, body, query; copy headers)
//!     → url.rs (base + suffix + "?" + raw query)
//!     → client.rs (one outbound call, connect/read deadlines)
//!     → BackendOutcome { Success | BackendError | TransportFailure }
//!     → http::response::relay
//! ```
//!
//! # Design Decisions
//! - One outbound call per inbound call, no retries
//! - Backend errors are values, not exceptions
//! - Payloads are opaque bytes, never decoded

pub mod client;
pub mod operation;
pub mod types;
pub mod url;

pub use client::{HyperOutboundClient, OutboundClient};
pub use operation::{ForwardingOperation, Operation, Suffix, ID_VAR};
pub use types::{
    BackendOutcome, BackendResponse, ForwardError, InboundRequest, OutboundCall, TransportError,
};
