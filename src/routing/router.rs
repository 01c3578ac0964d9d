//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store routes in registration order
//! - Look up the first route whose conditions all hold
//! - Dispatch to the matched handler or answer 404
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - O(n) scan over routes (acceptable for a handful of routes)
//! - First full match wins, not best match
//! - Explicit NoMatch (`None`) from `resolve`; `dispatch` owns the fallback

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::http::response::text_response;
use crate::routing::matcher::{method, path, AndMatcher, Matcher};
use crate::routing::RoutingError;

/// Type-erased async request handler.
pub type Handler = Arc<dyn Fn(Request<Body>) -> BoxFuture<'static, Response> + Send + Sync>;

/// A condition set bound to a handler.
pub struct Route {
    conditions: AndMatcher,
    handler: Handler,
}

impl Route {
    /// True if every condition of this route holds for `req`.
    pub fn matches(&self, req: &Request<Body>) -> bool {
        self.conditions.matches(req)
    }

    /// True if this route has no conditions.
    pub fn is_catch_all(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Invoke the handler.
    pub fn call(&self, req: Request<Body>) -> BoxFuture<'static, Response> {
        (self.handler)(req)
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("conditions", &self.conditions)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of routes.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route with an arbitrary condition set.
    pub fn handle<F, Fut>(&mut self, conditions: Vec<Box<dyn Matcher>>, handler: F) -> &mut Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let erased: Handler = Arc::new(
            move |req: Request<Body>| -> BoxFuture<'static, Response> { Box::pin(handler(req)) },
        );
        self.routes.push(Route {
            conditions: AndMatcher::new(conditions),
            handler: erased,
        });
        self
    }

    /// Append a route for `GET` requests whose path fully matches `pattern`.
    pub fn get<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RoutingError>
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.method_route("GET", pattern, handler)
    }

    /// Append a route for `HEAD` requests whose path fully matches `pattern`.
    pub fn head<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RoutingError>
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.method_route("HEAD", pattern, handler)
    }

    /// Append a route for `POST` requests whose path fully matches `pattern`.
    pub fn post<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RoutingError>
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.method_route("POST", pattern, handler)
    }

    /// Append a catch-all route. Register it last.
    pub fn all<F, Fut>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.handle(Vec::new(), handler)
    }

    fn method_route<F, Fut>(
        &mut self,
        name: &str,
        pattern: &str,
        handler: F,
    ) -> Result<&mut Self, RoutingError>
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let conditions: Vec<Box<dyn Matcher>> =
            vec![Box::new(method(name)), Box::new(path(pattern)?)];
        Ok(self.handle(conditions, handler))
    }

    /// First route, in registration order, whose conditions all hold.
    pub fn resolve(&self, req: &Request<Body>) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(req))
    }

    /// Run the matched handler, or answer `404 not found`.
    pub async fn dispatch(&self, req: Request<Body>) -> Response {
        match self.resolve(&req) {
            Some(route) => route.call(req).await,
            None => {
                tracing::debug!(
                    method = %req.method(),
                    path = %req.uri().path(),
                    "No route matched"
                );
                text_response(StatusCode::NOT_FOUND, "not found", "resource not found")
            }
        }
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
