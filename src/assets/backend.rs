//! Static asset backends.
//!
//! A backend answers "resolve(request) → response", reporting a miss with
//! `404 Not Found`. It knows nothing about client-side routes; the fallback
//! lives in [`crate::assets::AssetRouter`].

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, Method, Request, Response, StatusCode},
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Exact-path lookup against a deployed bundle.
pub trait AssetBackend: Clone + Send + Sync + 'static {
    /// Resolve a request. A miss is a `404` response, never an error.
    fn resolve(&self, req: Request<Body>) -> impl Future<Output = Response<Body>> + Send;
}

/// Serves a bundle from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
    serve: ServeDir,
}

impl DirAssets {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            serve: ServeDir::new(&root),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetBackend for DirAssets {
    async fn resolve(&self, req: Request<Body>) -> Response<Body> {
        match self.serve.clone().oneshot(req).await {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        }
    }
}

/// A single in-memory file.
#[derive(Debug, Clone)]
struct MemoryAsset {
    content_type: HeaderValue,
    body: Bytes,
}

/// An in-memory bundle keyed by request path.
///
/// Useful for embedding a small bundle in the binary and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    files: Arc<HashMap<String, MemoryAsset>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file at `path` (e.g. `/index.html`).
    pub fn with_file(
        mut self,
        path: impl Into<String>,
        content_type: &'static str,
        body: impl Into<Bytes>,
    ) -> Self {
        Arc::make_mut(&mut self.files).insert(
            path.into(),
            MemoryAsset {
                content_type: HeaderValue::from_static(content_type),
                body: body.into(),
            },
        );
        self
    }

    fn lookup(&self, path: &str) -> Option<&MemoryAsset> {
        if path.ends_with('/') {
            return self.files.get(&format!("{path}index.html"));
        }
        self.files.get(path)
    }
}

impl AssetBackend for MemoryAssets {
    async fn resolve(&self, req: Request<Body>) -> Response<Body> {
        let method = req.method().clone();
        if method != Method::GET && method != Method::HEAD {
            return status_response(StatusCode::METHOD_NOT_ALLOWED);
        }

        let Some(asset) = self.lookup(req.uri().path()) else {
            return status_response(StatusCode::NOT_FOUND);
        };

        let body = if method == Method::HEAD {
            Body::empty()
        } else {
            Body::from(asset.body.clone())
        };
        let mut response = Response::new(body);
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, asset.content_type.clone());
        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, HeaderValue::from(asset.body.len()));
        response
    }
}

fn status_response(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn get(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn memory_hit_and_miss() {
        let assets = MemoryAssets::new()
            .with_file("/index.html", "text/html", "<div id=root></div>")
            .with_file("/static/js/main.js", "text/javascript", "boot()");

        let hit = assets.resolve(get("/static/js/main.js")).await;
        assert_eq!(hit.status(), StatusCode::OK);
        assert_eq!(hit.headers()[header::CONTENT_TYPE], "text/javascript");
        let body = to_bytes(hit.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"boot()");

        let miss = assets.resolve(get("/static/js/other.js")).await;
        assert_eq!(miss.status(), StatusCode::NOT_FOUND);

        let root = assets.resolve(get("/")).await;
        assert_eq!(root.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn memory_rejects_writes() {
        let assets = MemoryAssets::new().with_file("/index.html", "text/html", "x");
        let req = Request::builder()
            .method(Method::POST)
            .uri("/index.html")
            .body(Body::empty())
            .unwrap();
        assert_eq!(assets.resolve(req).await.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn dir_serves_files_and_reports_misses() {
        let root = std::env::temp_dir().join(format!("drama-edge-assets-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(root.join("static")).unwrap();
        std::fs::write(root.join("index.html"), "<html>app</html>").unwrap();
        std::fs::write(root.join("static/app.css"), "body{}").unwrap();

        let assets = DirAssets::new(&root);

        let hit = assets.resolve(get("/static/app.css")).await;
        assert_eq!(hit.status(), StatusCode::OK);
        let body = to_bytes(hit.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"body{}");

        let index = assets.resolve(get("/")).await;
        assert_eq!(index.status(), StatusCode::OK);

        let miss = assets.resolve(get("/dashboard")).await;
        assert_eq!(miss.status(), StatusCode::NOT_FOUND);

        std::fs::remove_dir_all(&root).ok();
    }
}
