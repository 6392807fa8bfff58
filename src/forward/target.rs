//! Upstream target construction.

use axum::http::Uri;
use url::Url;

/// Reasons an upstream origin string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamOriginError {
    #[error("`{0}` is not an absolute URL")]
    Invalid(String),
    #[error("scheme `{0}` is not supported (use http or https)")]
    UnsupportedScheme(String),
    #[error("`{0}` has no host")]
    MissingHost(String),
    #[error("`{0}` must not carry a path, query or fragment")]
    NotAnOrigin(String),
}

/// Scheme + host (+ port) of the upstream API, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamOrigin(String);

impl UpstreamOrigin {
    /// Parse and normalize an origin such as `https://api.example.com`.
    ///
    /// A lone trailing `/` is accepted; any other path is rejected.
    pub fn parse(raw: &str) -> Result<Self, UpstreamOriginError> {
        let raw = raw.trim();
        let url = Url::parse(raw).map_err(|_| UpstreamOriginError::Invalid(raw.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(UpstreamOriginError::UnsupportedScheme(url.scheme().to_string()));
        }
        if url.host_str().is_none() {
            return Err(UpstreamOriginError::MissingHost(raw.to_string()));
        }
        if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(UpstreamOriginError::NotAnOrigin(raw.to_string()));
        }

        Ok(Self(url.origin().ascii_serialization()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Destination URL for an inbound request URI.
    ///
    /// Path and query are carried over byte-for-byte; only scheme, host and
    /// port change. An empty query (`/x?`) is dropped.
    pub fn target_for(&self, uri: &Uri) -> String {
        let path = uri.path();
        match uri.query().filter(|q| !q.is_empty()) {
            Some(query) => format!("{}{}?{}", self.0, path, query),
            None => format!("{}{}", self.0, path),
        }
    }
}

impl std::fmt::Display for UpstreamOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for UpstreamOrigin {
    type Err = UpstreamOriginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
