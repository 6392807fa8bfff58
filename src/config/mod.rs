//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → edge.toml (optional, loader.rs)
//!     → CLI flags / environment (ConfigOverrides)
//!     → validation.rs (semantic checks)
//!     → EdgeConfig (validated, immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - No hot reload: the upstream origin is fixed once serving starts
//! - All fields have defaults except `upstream.origin`
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ConfigOverrides};
pub use schema::{
    AssetsConfig, EdgeConfig, LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    UpstreamConfig,
};
