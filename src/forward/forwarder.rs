//! API forwarding.
//!
//! # Responsibilities
//! - Retarget an inbound request at the upstream origin
//! - Re-send method, headers and (for methods with a body) the buffered body
//! - Relay status and headers, stream the body back, fix up CORS
//!
//! # Design Decisions
//! - Exactly one outbound call per request, never retried
//! - Request bodies are buffered (they must be re-sent), response bodies are not
//! - Upstream error statuses are relayed verbatim, only transport failures are errors

use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, Response},
};

use crate::config::{LimitsConfig, UpstreamConfig};
use crate::error::EdgeError;
use crate::forward::target::{UpstreamOrigin, UpstreamOriginError};
use crate::http::request::{request_id, RequestOrigin};
use crate::http::response::apply_cors_for;
use crate::security::headers::{strip_hop_by_hop, strip_request_framing, strip_response_framing};

/// Methods that never carry a meaningful request body.
pub fn is_bodyless(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

/// Errors building the forwarder at startup.
#[derive(Debug, thiserror::Error)]
pub enum ForwarderInitError {
    #[error(transparent)]
    Origin(#[from] UpstreamOriginError),
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Presents the upstream API at the edge's own origin.
#[derive(Debug, Clone)]
pub struct ApiForwarder {
    client: reqwest::Client,
    upstream: UpstreamOrigin,
    strip_hop_by_hop: bool,
    response_timeout: Option<Duration>,
    max_body_bytes: usize,
}

impl ApiForwarder {
    /// Build a forwarder from validated configuration.
    pub fn from_config(
        upstream: &UpstreamConfig,
        limits: &LimitsConfig,
    ) -> Result<Self, ForwarderInitError> {
        let origin = UpstreamOrigin::parse(&upstream.origin)?;

        // Redirects are relayed to the caller, not followed.
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy();
        if let Some(secs) = upstream.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            upstream: origin,
            strip_hop_by_hop: upstream.strip_hop_by_hop,
            response_timeout: upstream.response_timeout_secs.map(Duration::from_secs),
            max_body_bytes: limits.max_body_bytes,
        })
    }

    pub fn upstream(&self) -> &UpstreamOrigin {
        &self.upstream
    }

    /// Forward one request and relay the upstream answer.
    pub async fn forward(
        &self,
        req: Request<Body>,
        origin: &RequestOrigin,
    ) -> Result<Response<Body>, EdgeError> {
        let target = self.upstream.target_for(req.uri());
        let id = request_id(&req).to_owned();
        let (parts, body) = req.into_parts();

        let body = if is_bodyless(&parts.method) {
            None
        } else {
            let bytes = axum::body::to_bytes(body, self.max_body_bytes)
                .await
                .map_err(EdgeError::RequestBody)?;
            Some(bytes)
        };

        let mut headers = parts.headers;
        strip_request_framing(&mut headers);
        if self.strip_hop_by_hop {
            strip_hop_by_hop(&mut headers);
        }

        tracing::debug!(
            request_id = %id,
            method = %parts.method,
            target = %target,
            body_bytes = body.as_ref().map_or(0, |b| b.len()),
            "Forwarding to upstream"
        );

        let mut outbound = self
            .client
            .request(parts.method.clone(), target.as_str())
            .headers(headers);
        if let Some(bytes) = body {
            outbound = outbound.body(bytes);
        }

        let sent = outbound.send();
        let upstream = match self.response_timeout {
            Some(limit) => tokio::time::timeout(limit, sent)
                .await
                .map_err(|_| EdgeError::UpstreamTimeout(limit))?,
            None => sent.await,
        }
        .map_err(EdgeError::Upstream)?;

        let status = upstream.status();
        let mut headers = upstream.headers().clone();
        strip_response_framing(&mut headers);
        if self.strip_hop_by_hop {
            strip_hop_by_hop(&mut headers);
        }
        apply_cors_for(&mut headers, origin)?;

        tracing::debug!(
            request_id = %id,
            status = %status,
            "Upstream responded"
        );

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}
