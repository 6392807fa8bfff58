//! Namespace dispatch.
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Exactly two destinations; everything outside the API namespace belongs
//!   to the asset router, so there is no "no match" outcome

use axum::http::Request;

use crate::routing::matcher::{Matcher, PathPrefixMatcher};

/// Destination of an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Forward to the upstream API.
    Api,
    /// Resolve against the static bundle.
    Assets,
}

impl Route {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Api => "api",
            Route::Assets => "assets",
        }
    }
}

/// Splits traffic between the API forwarder and the asset router.
#[derive(Debug, Clone)]
pub struct EdgeRouter {
    api: PathPrefixMatcher,
}

impl EdgeRouter {
    pub fn new(api_prefix: &str) -> Self {
        Self {
            api: PathPrefixMatcher::new(api_prefix),
        }
    }

    /// Find the destination for a request.
    pub fn match_request<B>(&self, req: &Request<B>) -> Route {
        if self.api.matches(req) {
            Route::Api
        } else {
            Route::Assets
        }
    }

    pub fn api_prefix(&self) -> &str {
        self.api.prefix()
    }
}
