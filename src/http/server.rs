//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with a single catch-all handler
//! - Wire up middleware (request ID, tracing)
//! - Dispatch requests to the API forwarder or the asset router
//! - Serve until the shutdown signal, then drain

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{
        uri::{InvalidUri, PathAndQuery},
        Request,
    },
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::assets::{AssetBackend, AssetRouter, DirAssets};
use crate::config::EdgeConfig;
use crate::error::EdgeError;
use crate::forward::{ApiForwarder, ForwarderInitError};
use crate::http::request::{request_id, MakeRequestUuidV4, RequestOrigin};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::routing::{EdgeRouter, Route};

/// Errors building the server from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ServerInitError {
    #[error(transparent)]
    Forwarder(#[from] ForwarderInitError),
    #[error("invalid root document: {0}")]
    RootDocument(#[from] InvalidUri),
}

/// Application state injected into handlers.
pub struct AppState<B> {
    pub router: Arc<EdgeRouter>,
    pub forwarder: Arc<ApiForwarder>,
    pub assets: Arc<AssetRouter<B>>,
    pub trust_forwarded_proto: bool,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            router: Arc::clone(&self.router),
            forwarder: Arc::clone(&self.forwarder),
            assets: Arc::clone(&self.assets),
            trust_forwarded_proto: self.trust_forwarded_proto,
        }
    }
}

/// HTTP server for the edge layer.
pub struct HttpServer {
    router: Router,
    config: EdgeConfig,
}

impl HttpServer {
    /// Create a server serving the bundle from `assets.root_dir`.
    pub fn new(config: EdgeConfig) -> Result<Self, ServerInitError> {
        let backend = DirAssets::new(&config.assets.root_dir);
        Self::with_assets(config, backend)
    }

    /// Create a server over any asset backend.
    pub fn with_assets<B: AssetBackend>(
        config: EdgeConfig,
        backend: B,
    ) -> Result<Self, ServerInitError> {
        let root_document: PathAndQuery = config.assets.root_document.parse()?;
        let state = AppState {
            router: Arc::new(EdgeRouter::new(&config.upstream.api_prefix)),
            forwarder: Arc::new(ApiForwarder::from_config(&config.upstream, &config.limits)?),
            assets: Arc::new(AssetRouter::new(backend, root_document)),
            trust_forwarded_proto: config.listener.trust_forwarded_proto,
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Request bodies are bounded by the forwarder, which never reads them for GET/HEAD.
    fn build_router<B: AssetBackend>(state: AppState<B>) -> Router {
        Router::new()
            .route("/{*path}", any(edge_handler::<B>))
            .route("/", any(edge_handler::<B>))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request_id(req),
                    method = %req.method(),
                    uri = %req.uri(),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.origin,
            api_prefix = %self.config.upstream.api_prefix,
            assets = %self.config.assets.root_dir,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }
}

/// Entry point for every request: pick the namespace, then delegate.
async fn edge_handler<B: AssetBackend>(
    State(state): State<AppState<B>>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let route = state.router.match_request(&request);
    let method = request.method().clone();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);

    tracing::debug!(route = route.as_str(), peer = ?peer, "Dispatching request");

    let result = match route {
        Route::Api => forward_api(&state, request).await,
        Route::Assets => state.assets.route(request).await,
    };
    let response = result.unwrap_or_else(IntoResponse::into_response);

    metrics::record_request(route.as_str(), method.as_str(), response.status().as_u16(), start);
    response
}

async fn forward_api<B>(state: &AppState<B>, request: Request<Body>) -> Result<Response, EdgeError> {
    let origin = RequestOrigin::from_request(&request, state.trust_forwarded_proto)?;
    state.forwarder.forward(request, &origin).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    /// An upstream origin nothing listens on.
    fn closed_origin() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    fn server() -> HttpServer {
        let mut config = EdgeConfig::default();
        config.upstream.origin = closed_origin();
        let assets = MemoryAssets::new().with_file("/index.html", "text/html", "<main/>");
        HttpServer::with_assets(config, assets).unwrap()
    }

    #[tokio::test]
    async fn client_route_gets_root_document_and_request_id() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/drama/123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<main/>");
    }

    #[tokio::test]
    async fn incoming_request_id_is_kept() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("x-request-id", "trace-me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "trace-me");
    }

    #[tokio::test]
    async fn unreachable_upstream_is_bad_gateway() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/api/dramas/latest")
                    .header("host", "site.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn api_request_without_host_is_rejected() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/api/dramas/latest")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_body_is_bad_request_with_or_without_length() {
        let mut config = EdgeConfig::default();
        config.upstream.origin = closed_origin();
        config.limits.max_body_bytes = 8;
        let server = HttpServer::with_assets(config, MemoryAssets::new()).unwrap();

        let payload = r#"{"keyword":"love"}"#;
        let with_length = Request::builder()
            .method("POST")
            .uri("/api/dramas/search")
            .header("host", "site.example")
            .header("content-length", payload.len())
            .body(Body::from(payload))
            .unwrap();
        let streamed = Request::builder()
            .method("POST")
            .uri("/api/dramas/search")
            .header("host", "site.example")
            .body(Body::from_stream(chunked(payload)))
            .unwrap();

        for request in [with_length, streamed] {
            let response = server.router().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&body[..], b"Failed to read request body");
        }
    }

    /// A body with no size hint, delivered in two chunks.
    fn chunked(
        payload: &'static str,
    ) -> impl futures_util::Stream<Item = Result<&'static str, std::io::Error>> {
        let (head, tail) = payload.split_at(payload.len() / 2);
        futures_util::stream::iter([Ok(head), Ok(tail)])
    }
}
