//! Client-route fallback over an asset backend.
//!
//! # State machine (per request)
//! ```text
//! Start → DirectLookup ─┬─ hit (any status but 404) ──────→ return as-is
//!                       ├─ 404 ∧ path has "." ─────────────→ 404 Not Found
//!                       └─ 404 ∧ no "." → FallbackLookup ──→ return
//! ```
//!
//! # Design Decisions
//! - The "." heuristic is deliberately naive: a client route whose segment
//!   contains a dot (`/users/jane.doe`) is treated as a missing file
//! - The two lookups are sequential; the second only happens after a miss
//! - The fallback keeps method, version and headers, drops the query and body

use axum::{
    body::Body,
    http::{uri::PathAndQuery, HeaderMap, Method, Request, Response, StatusCode, Uri, Version},
    response::IntoResponse,
};

use crate::assets::backend::AssetBackend;
use crate::error::EdgeError;

/// Whether a path looks like a file reference rather than a client route.
pub fn looks_like_file(path: &str) -> bool {
    path.contains('.')
}

/// Serves the client bundle with single-page-application fallback.
#[derive(Debug, Clone)]
pub struct AssetRouter<B> {
    backend: B,
    root_document: PathAndQuery,
}

impl<B: AssetBackend> AssetRouter<B> {
    /// `root_document` must be an absolute path such as `/index.html`.
    pub fn new(backend: B, root_document: PathAndQuery) -> Self {
        Self {
            backend,
            root_document,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn root_document(&self) -> &str {
        self.root_document.as_str()
    }

    /// Resolve a request, falling back to the root document for client routes.
    pub async fn route(&self, req: Request<Body>) -> Result<Response<Body>, EdgeError> {
        let path = req.uri().path().to_owned();
        let seed = FallbackSeed::capture(&req);

        let direct = self.backend.resolve(req).await;
        if direct.status() != StatusCode::NOT_FOUND {
            return Ok(direct);
        }

        if looks_like_file(&path) {
            tracing::debug!(path = %path, "Asset not found");
            return Ok(not_found());
        }

        tracing::debug!(
            path = %path,
            root_document = %self.root_document,
            "Serving root document for client route"
        );
        let fallback = seed.into_request(&self.root_document)?;
        Ok(self.backend.resolve(fallback).await)
    }
}

/// The parts of the original request the fallback lookup reuses.
struct FallbackSeed {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
}

impl FallbackSeed {
    fn capture(req: &Request<Body>) -> Self {
        Self {
            method: req.method().clone(),
            uri: req.uri().clone(),
            version: req.version(),
            headers: req.headers().clone(),
        }
    }

    fn into_request(self, root_document: &PathAndQuery) -> Result<Request<Body>, EdgeError> {
        let mut uri = self.uri.into_parts();
        uri.path_and_query = Some(root_document.clone());
        let uri = Uri::from_parts(uri).map_err(axum::http::Error::from)?;

        let mut req = Request::new(Body::empty());
        *req.method_mut() = self.method;
        *req.uri_mut() = uri;
        *req.version_mut() = self.version;
        *req.headers_mut() = self.headers;
        Ok(req)
    }
}

fn not_found() -> Response<Body> {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
