//! Edge layer for the drama catalog client.
//!
//! Serves the compiled single-page client and presents the remote catalog API
//! under the site's own origin.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!   request  ───▶ │ http::server ──▶ routing ──┬─▶ forward ──────┼──▶ upstream API
//!                 │  (request id,              │   (retarget,    │
//!                 │   trace, limits)           │    CORS echo)   │
//!                 │                            └─▶ assets ───────┼──▶ bundle on disk
//!                 │                                (SPA fallback)│
//!                 └──────────────────────────────────────────────┘
//! ```
//!
//! Both destinations are stateless: each request is handled on its own with no
//! shared mutable state. The upstream origin is read once from configuration.

pub mod assets;
pub mod config;
pub mod error;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::EdgeConfig;
pub use error::EdgeError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
