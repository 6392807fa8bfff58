//! Response transformation for relayed upstream responses.
//!
//! # Design Decisions
//! - Streaming responses avoid buffering the entire body
//! - Exactly two headers are overridden; everything else the upstream sent
//!   reaches the caller unchanged

use axum::http::{header, HeaderMap, HeaderValue};

use crate::http::request::RequestOrigin;

/// Point the CORS response headers at the calling origin.
///
/// Replaces whatever the upstream returned for these two headers. No other
/// CORS header is touched.
pub fn apply_cors_overrides(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
}

/// Convenience wrapper taking a derived origin.
pub fn apply_cors_for(headers: &mut HeaderMap, origin: &RequestOrigin) -> Result<(), crate::EdgeError> {
    apply_cors_overrides(headers, origin.to_header_value()?);
    Ok(())
}
