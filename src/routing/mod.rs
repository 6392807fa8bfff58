//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (namespace lookup)
//!     → matcher.rs (segment-aware prefix match)
//!     → Route::Api | Route::Assets
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same path always goes to the same destination

pub mod matcher;
pub mod router;

pub use router::{EdgeRouter, Route};
