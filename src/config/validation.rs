//! Configuration validation.
//!
//! Serde handles syntax; this module checks the values make sense together.
//! Validation is a pure function returning every problem at once so a
//! misconfigured deployment can be fixed in one pass.

use std::net::SocketAddr;

use axum::http::uri::PathAndQuery;

use crate::config::schema::EdgeConfig;
use crate::forward::target::UpstreamOrigin;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending key, e.g. `upstream.origin`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.upstream.origin.trim().is_empty() {
        errors.push(ValidationError::new(
            "upstream.origin",
            "is required (set it in the config file, --upstream or UPSTREAM_API)",
        ));
    } else if let Err(e) = UpstreamOrigin::parse(&config.upstream.origin) {
        errors.push(ValidationError::new("upstream.origin", e.to_string()));
    }

    let prefix = &config.upstream.api_prefix;
    if !prefix.starts_with('/') || prefix.len() < 2 {
        errors.push(ValidationError::new(
            "upstream.api_prefix",
            "must start with `/` and name at least one segment",
        ));
    } else if prefix.ends_with('/') {
        errors.push(ValidationError::new(
            "upstream.api_prefix",
            "must not end with `/`",
        ));
    } else if prefix.contains(['?', '#']) {
        errors.push(ValidationError::new(
            "upstream.api_prefix",
            "must be a bare path",
        ));
    }

    let root = &config.assets.root_document;
    if !root.starts_with('/') || root.contains(['?', '#']) || root.parse::<PathAndQuery>().is_err() {
        errors.push(ValidationError::new(
            "assets.root_document",
            "must be an absolute request path such as `/index.html`",
        ));
    }

    if config.assets.root_dir.trim().is_empty() {
        errors.push(ValidationError::new("assets.root_dir", "must not be empty"));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("`{}` is not a socket address", config.listener.bind_address),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "`{}` is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new(
            "limits.max_body_bytes",
            "must be greater than zero",
        ));
    }

    if config.upstream.connect_timeout_secs == Some(0)
        || config.upstream.response_timeout_secs == Some(0)
    {
        errors.push(ValidationError::new(
            "upstream",
            "timeouts must be greater than zero when set",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
