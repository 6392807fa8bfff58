//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge layer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Listener configuration (bind address, origin derivation).
    pub listener: ListenerConfig,

    /// Remote API the `/api` namespace is forwarded to.
    pub upstream: UpstreamConfig,

    /// Static client bundle.
    pub assets: AssetsConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Take the inbound scheme from `X-Forwarded-Proto`.
    ///
    /// Only enable behind a TLS terminator that sets the header itself.
    pub trust_forwarded_proto: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            trust_forwarded_proto: false,
        }
    }
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Scheme and host (and optional port) of the remote API. Required.
    pub origin: String,

    /// Path prefix owned by the forwarder. Forwarded unmodified.
    pub api_prefix: String,

    /// Strip hop-by-hop headers on both legs.
    pub strip_hop_by_hop: bool,

    /// TCP/TLS connect timeout towards the upstream.
    pub connect_timeout_secs: Option<u64>,

    /// Deadline for the upstream response headers. The body stream is not bounded.
    pub response_timeout_secs: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            origin: String::new(),
            api_prefix: "/api".to_string(),
            strip_hop_by_hop: false,
            connect_timeout_secs: None,
            response_timeout_secs: None,
        }
    }
}

/// Static asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory holding the compiled client bundle.
    pub root_dir: String,

    /// Bootstrap document served for client-side routes.
    pub root_document: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root_dir: "frontend/build".to_string(),
            root_document: "/index.html".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
