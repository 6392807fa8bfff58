//! Inbound request inspection.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for tracing
//! - Derive the origin (scheme + host) the caller addressed
//!
//! # Design Decisions
//! - Request ID added as early as possible; an ID already present is kept
//! - The origin comes from the request target, not the `Origin` header: the
//!   CORS echo names the site the client reached

use axum::http::{header, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::Url;
use uuid::Uuid;

use crate::error::EdgeError;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: &str = "x-request-id";

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID set by the request-id layer.
pub fn request_id<B>(req: &Request<B>) -> &str {
    req.headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Scheme and host of the site the caller addressed, serialized like a URL origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin(String);

impl RequestOrigin {
    /// Derive the origin of an inbound request.
    ///
    /// Scheme: first `X-Forwarded-Proto` value when trusted, else the request
    /// URI scheme, else `http`. Host: the URI authority, else `Host`.
    pub fn from_request<B>(req: &Request<B>, trust_forwarded_proto: bool) -> Result<Self, EdgeError> {
        let forwarded = if trust_forwarded_proto {
            req.headers()
                .get(X_FORWARDED_PROTO)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        } else {
            None
        };
        let scheme = forwarded
            .or_else(|| req.uri().scheme_str())
            .unwrap_or("http");

        let host = req
            .uri()
            .authority()
            .map(|a| a.as_str())
            .or_else(|| req.headers().get(header::HOST).and_then(|v| v.to_str().ok()))
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(EdgeError::MissingHost)?;

        let raw = format!("{scheme}://{host}");
        let url = Url::parse(&raw).map_err(|_| EdgeError::InvalidOrigin(raw.clone()))?;
        if url.host_str().is_none() || !matches!(url.scheme(), "http" | "https") {
            return Err(EdgeError::InvalidOrigin(raw));
        }

        Ok(Self(url.origin().ascii_serialization()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render as a header value for `Access-Control-Allow-Origin`.
    pub fn to_header_value(&self) -> Result<HeaderValue, EdgeError> {
        HeaderValue::from_str(&self.0).map_err(|_| EdgeError::InvalidOrigin(self.0.clone()))
    }
}

impl std::fmt::Display for RequestOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
