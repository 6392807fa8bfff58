//! Static client bundle subsystem.
//!
//! # Data Flow
//! ```text
//! Request outside the API namespace
//!     → router.rs (direct lookup, client-route fallback)
//!     → backend.rs (ServeDir on disk | in-memory bundle)
//! ```

pub mod backend;
pub mod router;

pub use backend::{AssetBackend, DirAssets, MemoryAssets};
pub use router::{looks_like_file, AssetRouter};
