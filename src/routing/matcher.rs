//! Route matching logic.
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Prefixes match on segment boundaries: `/api` owns `/api` and `/api/...`
//!   but not `/apiary`
//! - No regex to guarantee O(n) matching

use axum::http::Request;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches<B>(&self, req: &Request<B>) -> bool;
}

/// Matches the request path against a namespace prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher. A trailing `/` on `prefix` is ignored.
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        while prefix.len() > 1 && prefix.ends_with('/') {
            prefix.pop();
        }
        Self { prefix }
    }

    /// The normalized prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `path` lies inside this namespace.
    pub fn matches_path(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || self.prefix == "/",
            None => false,
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches<B>(&self, req: &Request<B>) -> bool {
        self.matches_path(req.uri().path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/api");

        let req1 = Request::builder()
            .uri("http://example.com/api/dramas/latest")
            .body(Body::default())
            .unwrap();
        assert!(matcher.matches(&req1));

        let req2 = Request::builder()
            .uri("http://example.com/images")
            .body(Body::default())
            .unwrap();
        assert!(!matcher.matches(&req2));
    }

    #[test]
    fn prefix_respects_segment_boundary() {
        let matcher = PathPrefixMatcher::new("/api");
        assert!(matcher.matches_path("/api"));
        assert!(matcher.matches_path("/api/"));
        assert!(matcher.matches_path("/api/dramas/search"));
        assert!(!matcher.matches_path("/apiary"));
        assert!(!matcher.matches_path("/API/dramas"));
        assert!(!matcher.matches_path("/static/api"));
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let matcher = PathPrefixMatcher::new("/api/");
        assert_eq!(matcher.prefix(), "/api");
        assert!(matcher.matches_path("/api/x"));
    }

    #[test]
    fn query_does_not_affect_match() {
        let matcher = PathPrefixMatcher::new("/api");
        let req = Request::builder()
            .uri("/api?page=2")
            .body(())
            .unwrap();
        assert!(matcher.matches(&req));
    }
}
