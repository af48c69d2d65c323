//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → RequestBodyLimitLayer (server.rs, 413 on oversized bodies)
//!     → headers.rs (copy inbound headers under the propagation policy)
//!     → Outbound call
//!
//! Backend response:
//!     → headers.rs (same policy on the way back)
//!     → Caller
//! ```
//!
//! # Design Decisions
//! - Authentication and authorization belong to the backends
//! - Header policy is symmetric: what is hop-by-hop one way is hop-by-hop the other

pub mod headers;

pub use headers::HeaderPolicy;
