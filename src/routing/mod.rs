//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     GatewayConfig
//!     → router.rs (one Route per method + pattern)
//!     → Group by pattern, attach forwarding handlers
//!     → Freeze as immutable axum Router
//!
//! Incoming Request (method, path):
//!     → axum matcher (static segments before {id})
//!     → forwarding handler with path variables
//!     → no match: 404, wrong method: 405
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - The table is plain data, so it can be inspected and tested without serving

pub mod router;

pub use router::{DispatchTable, Route};
