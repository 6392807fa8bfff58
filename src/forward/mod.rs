//! API forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Request under the API prefix
//!     → target.rs (upstream origin + path + query)
//!     → forwarder.rs (method-aware body, headers, one outbound call)
//!     → relayed response (status/headers copied, CORS fixed, body streamed)
//! ```

pub mod forwarder;
pub mod target;

pub use forwarder::{is_bodyless, ApiForwarder, ForwarderInitError};
pub use target::{UpstreamOrigin, UpstreamOriginError};
