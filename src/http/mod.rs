//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → request.rs (request ID, inbound origin)
//!     → routing: API forwarder | asset router
//!     → response.rs (CORS overrides on relayed responses)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, RequestOrigin, X_REQUEST_ID};
pub use server::{HttpServer, ServerInitError};
