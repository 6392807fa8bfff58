//! Header manipulation on the forwarding path.
//!
//! # Responsibilities
//! - Drop framing headers the outbound client recomputes for a re-sent message
//! - Strip hop-by-hop headers (optional, both legs)
//!
//! # Design Decisions
//! - Framing removal is unconditional: the body is re-framed by the client, so
//!   the inbound `content-length`/`transfer-encoding` no longer describe it,
//!   and `host` must name the upstream
//! - Hop-by-hop stripping is opt-in so the default stays a verbatim passthrough

use axum::http::{header, HeaderMap, HeaderName};

/// Connection-scoped headers defined by RFC 9110 §7.6.1 plus the legacy
/// `keep-alive`/`proxy-connection` pair.
pub const HOP_BY_HOP: [HeaderName; 9] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Remove request headers describing the inbound message framing.
pub fn strip_request_framing(headers: &mut HeaderMap) {
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);
    headers.remove(header::TRANSFER_ENCODING);
}

/// Remove response headers describing the upstream connection framing.
///
/// `content-length` is kept: the streamed body is relayed byte-for-byte.
pub fn strip_response_framing(headers: &mut HeaderMap) {
    headers.remove(header::TRANSFER_ENCODING);
    headers.remove(header::CONNECTION);
}

/// Remove hop-by-hop headers, including any listed in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
}
