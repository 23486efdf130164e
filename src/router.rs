//! Ordered route table.
//!
//! Routes are kept in registration order and scanned front to back. The first
//! route whose method and path both equal the request's wins. Nothing is
//! normalised: `/about` and `/about/` are different paths, and registering the
//! same pair twice leaves the second registration unreachable.

use std::fmt;
use std::sync::Arc;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;

/// One `(method, path) → handler` binding.
#[derive(Clone)]
pub struct Route {
    method: Method,
    path: String,
    handler: BoxedHandler,
}

impl Route {
    pub fn new(method: Method, path: impl Into<String>, handler: impl Handler) -> Self {
        Self { method, path: path.into(), handler: Arc::new(handler) }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }

    pub(crate) fn handler(&self) -> &BoxedHandler { &self.handler }

    fn matches(&self, method: &str, path: &str) -> bool {
        self.method.as_str() == method && self.path == path
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// The application's route table.
///
/// Build it once at startup and hand it to [`Server::serve`](crate::Server::serve).
/// Anything it does not match is served from the static root.
#[derive(Clone, Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// ```rust
    /// # use lightserve::{Method, Request, Response, Router};
    /// # async fn status(_: Request) -> Response { Response::text("") }
    /// # async fn submit(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get,  "/status", status)
    ///     .on(Method::Post, "/submit", submit);
    /// ```
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(Route::new(method, path, handler));
        self
    }

    /// Append an already-built route.
    pub fn add(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// First route, in registration order, matching `method` and `path` exactly.
    pub fn lookup(&self, method: &str, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(method, path))
    }

    pub fn routes(&self) -> &[Route] { &self.routes }
    pub fn len(&self) -> usize { self.routes.len() }
    pub fn is_empty(&self) -> bool { self.routes.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;

    async fn first(_: Request) -> &'static str { "first" }
    async fn second(_: Request) -> &'static str { "second" }

    #[test]
    fn lookup_requires_exact_method_and_path() {
        let router = Router::new().on(Method::Get, "/request", first);
        assert!(router.lookup("GET", "/request").is_some());
        assert!(router.lookup("POST", "/request").is_none());
        assert!(router.lookup("get", "/request").is_none());
        assert!(router.lookup("GET", "/request/").is_none());
        assert!(router.lookup("GET", "/Request").is_none());
    }

    #[tokio::test]
    async fn first_registration_wins() {
        let router = Router::new()
            .on(Method::Get, "/dup", first)
            .on(Method::Get, "/dup", second);
        assert_eq!(router.len(), 2);
        let route = router.lookup("GET", "/dup").expect("route");
        let res = route.handler().call(Request::new("GET", "/dup")).await;
        assert_eq!(res.body(), b"first");
    }

    #[test]
    fn same_path_different_methods_are_distinct() {
        let mut router = Router::new().on(Method::Get, "/item", first);
        router.add(Route::new(Method::Delete, "/item", second));
        assert_eq!(router.lookup("DELETE", "/item").map(Route::method), Some(Method::Delete));
        assert_eq!(router.lookup("GET", "/item").map(Route::method), Some(Method::Get));
    }

    #[test]
    fn unknown_methods_never_match() {
        let router = Router::new().on(Method::Get, "/", first);
        assert!(router.lookup("BREW", "/").is_none());
        assert!(Router::new().is_empty());
    }
}
