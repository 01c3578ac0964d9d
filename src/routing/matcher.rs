//! Route matching logic.
//!
//! # Responsibilities
//! - Match request method (case-insensitive)
//! - Match the full URL path against a pattern
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Method matching is case-insensitive
//! - Path patterns are anchored: the match must span the whole path
//! - Empty condition = always matches (wildcard)
//! - Patterns compiled once at registration, never per request

use axum::body::Body;
use axum::http::Request;
use regex::Regex;

use crate::routing::RoutingError;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request<Body>) -> bool;
}

/// Matches the request method.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    expected: String,
}

impl MethodMatcher {
    /// Create a new method matcher.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            expected: method.into(),
        }
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        req.method().as_str().eq_ignore_ascii_case(&self.expected)
    }
}

/// Matches the request path against a regular expression spanning the whole path.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    pattern: Regex,
}

impl PathMatcher {
    /// Compile a path matcher. `pattern` is wrapped as `^(?:pattern)$`.
    pub fn new(pattern: &str) -> Result<Self, RoutingError> {
        let anchored = format!("^(?:{})$", pattern);
        let pattern = Regex::new(&anchored).map_err(|e| RoutingError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { pattern })
    }
}

impl Matcher for PathMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.pattern.is_match(req.uri().path())
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug, Default)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    /// True when no conditions are present (catch-all).
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        // All matchers must pass (AND); vacuously true when empty
        self.matchers.iter().all(|m| m.matches(req))
    }
}

/// Predicate: request method equals `name`, case-insensitively.
pub fn method(name: &str) -> MethodMatcher {
    MethodMatcher::new(name)
}

/// Predicate: the whole request path matches `pattern`.
pub fn path(pattern: &str) -> Result<PathMatcher, RoutingError> {
    PathMatcher::new(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_method_matcher() {
        let matcher = method("get");
        assert!(matcher.matches(&request(Method::GET, "/")));
        assert!(!matcher.matches(&request(Method::POST, "/")));

        let upper = method("OPTIONS");
        assert!(upper.matches(&request(Method::OPTIONS, "/")));
    }

    #[test]
    fn test_path_matcher_spans_whole_path() {
        let matcher = path(".*/verify").unwrap();
        assert!(matcher.matches(&request(Method::GET, "http://example.com/api/verify")));
        assert!(matcher.matches(&request(Method::GET, "/verify?id=1")));
        assert!(!matcher.matches(&request(Method::GET, "/api/verify-extra")));
        assert!(!matcher.matches(&request(Method::GET, "/api/verify/")));
        assert!(!matcher.matches(&request(Method::GET, "/api/unverify/x")));
    }

    #[test]
    fn test_root_path() {
        let matcher = path("/").unwrap();
        assert!(matcher.matches(&request(Method::GET, "http://example.com/")));
        assert!(!matcher.matches(&request(Method::GET, "/api")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = path("/verify(").unwrap_err();
        assert!(err.to_string().contains("/verify("));
    }

    #[test]
    fn test_and_matcher() {
        let both = AndMatcher::new(vec![
            Box::new(method("GET")),
            Box::new(path("/api/.*").unwrap()),
        ]);
        assert!(both.matches(&request(Method::GET, "/api/x")));
        assert!(!both.matches(&request(Method::HEAD, "/api/x")));
        assert!(!both.matches(&request(Method::GET, "/x")));

        let empty = AndMatcher::default();
        assert!(empty.is_empty());
        assert!(empty.matches(&request(Method::DELETE, "/anything")));
    }
}
