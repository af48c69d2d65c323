//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, capture InboundRequest)
//!     → [dispatch table picks the forwarding operation]
//!     → [forwarding operation calls the backend]
//!     → response.rs (relay status, headers, body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::relay;
pub use server::{AppState, HttpServer};
