//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, Request, Response, StatusCode, Uri},
    Router,
};
use drama_edge::{EdgeConfig, HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// What the mock upstream saw.
#[derive(Debug)]
pub struct CapturedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Canned answer of the mock upstream.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: &'static str,
    pub delay: Option<Duration>,
}

impl MockReply {
    pub fn json(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            headers: vec![("content-type", "application/json")],
            body,
            delay: None,
        }
    }

    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Hold the response back for `delay` after the request is recorded.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone)]
struct MockState {
    tx: mpsc::UnboundedSender<CapturedRequest>,
    reply: Arc<MockReply>,
}

async fn record(State(state): State<MockState>, req: Request<Body>) -> Response<Body> {
    let (parts, body) = req.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let _ = state.tx.send(CapturedRequest {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        body,
    });
    if let Some(delay) = state.reply.delay {
        tokio::time::sleep(delay).await;
    }

    let mut builder = Response::builder().status(state.reply.status);
    for (name, value) in &state.reply.headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(state.reply.body)).unwrap()
}

/// Start an upstream that records every request and answers with `reply`.
pub async fn start_recording_upstream(
    reply: MockReply,
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let state = MockState {
        tx,
        reply: Arc::new(reply),
    };
    let app = Router::new().fallback(record).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, rx)
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Wait for the next captured request.
pub async fn next_captured(rx: &mut mpsc::UnboundedReceiver<CapturedRequest>) -> CapturedRequest {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("upstream was not called")
        .expect("upstream channel closed")
}

/// Config pointing at `upstream`, serving assets from `assets_dir`.
pub fn edge_config(upstream: SocketAddr, assets_dir: &Path) -> EdgeConfig {
    let mut config = EdgeConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.origin = format!("http://{upstream}");
    config.assets.root_dir = assets_dir.display().to_string();
    config
}

/// Start the edge on an ephemeral port. Returns its address and the shutdown handle.
pub async fn start_edge(config: EdgeConfig) -> (SocketAddr, Shutdown) {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    (addr, shutdown)
}

/// A throwaway client bundle on disk.
pub struct Bundle {
    pub root: PathBuf,
}

impl Bundle {
    pub fn create(files: &[(&str, &str)]) -> Self {
        let root = std::env::temp_dir().join(format!("drama-edge-bundle-{}", uuid::Uuid::new_v4()));
        for (path, contents) in files {
            let full = root.join(path.trim_start_matches('/'));
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(full, contents).unwrap();
        }
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }
}

impl Drop for Bundle {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
