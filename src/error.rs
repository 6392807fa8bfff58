//! Request-scoped failures of the edge layer.
//!
//! Every variant is terminal for the request that produced it. Nothing here is
//! retried and no substitute content is synthesized: the caller sees a plain
//! text response with the mapped status.
//!
//! Upstream responses with a non-success status are *not* errors at this layer
//! and never pass through this type.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Errors raised while handling a single inbound request.
#[derive(Debug, thiserror::Error)]
pub enum EdgeError {
    /// The outbound call to the upstream origin failed at the transport level.
    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    /// The upstream did not produce response headers within the configured window.
    #[error("upstream did not respond within {0:?}")]
    UpstreamTimeout(Duration),

    /// The inbound body could not be buffered (client abort or body limit).
    #[error("failed to read request body: {0}")]
    RequestBody(#[source] axum::Error),

    /// Neither the request URI nor the `Host` header names an authority.
    #[error("request carries no host to derive its origin from")]
    MissingHost,

    /// The scheme/host pair of the inbound request is not a valid origin.
    #[error("invalid request origin `{0}`")]
    InvalidOrigin(String),

    /// The root-document request for the client-route fallback could not be built.
    #[error("failed to build root document request: {0}")]
    FallbackRequest(#[from] axum::http::Error),
}

impl EdgeError {
    /// Status code returned to the caller for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            EdgeError::Upstream(_) => StatusCode::BAD_GATEWAY,
            EdgeError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            EdgeError::RequestBody(_)
            | EdgeError::MissingHost
            | EdgeError::InvalidOrigin(_) => StatusCode::BAD_REQUEST,
            EdgeError::FallbackRequest(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            EdgeError::Upstream(_) => "Upstream request failed",
            EdgeError::UpstreamTimeout(_) => "Upstream timed out",
            EdgeError::RequestBody(_) => "Failed to read request body",
            EdgeError::MissingHost | EdgeError::InvalidOrigin(_) => "Invalid request origin",
            EdgeError::FallbackRequest(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
        } else {
            tracing::warn!(error = %self, status = %status, "Request rejected");
        }
        (status, self.public_message()).into_response()
    }
}
