//! Radix-tree request router.
//!
//! One tree per HTTP method. A literal segment always beats a parameter in
//! the same position, so `/file/index` wins over `/file/{name}` regardless of
//! registration order. Lookup is a pure function of the table and the
//! request line.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use matchit::Router as MatchitRouter;

use crate::error::Rejection;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve);
/// it is read-only from then on. Registrations chain:
///
/// ```rust
/// # use wicket::{Request, Response, Router};
/// # async fn info(_: Request) -> Response { Response::text("") }
/// # async fn echo(_: Request) -> Response { Response::text("") }
/// Router::new()
///     .get("/project/{projectID}/info", info)
///     .post("/headers", echo);
/// ```
///
/// # Panics
///
/// Registering the same method and pattern twice, or a pattern the radix
/// tree rejects, panics with the offending route. Route tables are built at
/// startup, so this surfaces on the first run.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + pattern pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` reads them.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn head(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Head, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    /// Finds the handler for `method` and `path` and extracts parameters.
    ///
    /// `HEAD` falls back to the `GET` route when no `HEAD` route exists. A
    /// path that only matches under another method is
    /// [`Rejection::MethodNotAllowed`]; anything else is
    /// [`Rejection::NotFound`].
    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Result<(BoxedHandler, HashMap<String, String>), Rejection> {
        if let Some(found) = self.find(method, path) {
            return Ok(found);
        }
        if method == Method::Head {
            if let Some(found) = self.find(Method::Get, path) {
                return Ok(found);
            }
        }

        let elsewhere = Method::ALL.iter()
            .filter(|&&m| m != method)
            .any(|&m| self.find(m, path).is_some());
        if elsewhere {
            Err(Rejection::MethodNotAllowed)
        } else {
            Err(Rejection::NotFound)
        }
    }

    fn find(&self, method: Method, path: &str) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let matched = self.routes.get(&method)?.at(path).ok()?;
        if matched.params.iter().any(|(_, v)| v.is_empty()) {
            return None;
        }
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((Arc::clone(matched.value), params))
    }

    /// Runs one request through the whole pipeline without a socket.
    ///
    /// This is what the server calls for every request once the body has
    /// been read, and it is the easiest way to exercise a router in tests.
    /// Replies to `HEAD` come back with an empty body.
    pub async fn handle(&self, req: http::Request<Bytes>) -> Response {
        let (parts, body) = req.into_parts();
        self.dispatch(parts, body).await
    }

    pub(crate) async fn dispatch(&self, parts: http::request::Parts, body: Bytes) -> Response {
        // Methods outside the route table get the same answer as unknown paths.
        let Ok(method) = Method::try_from(&parts.method) else {
            return Rejection::MethodNotAllowed.into_response();
        };

        let mut response = match self.lookup(method, parts.uri.path()) {
            Ok((handler, params)) => {
                let req = Request::new(method, parts, body).with_params(params);
                handler.call(req).await
            }
            Err(rejection) => rejection.into_response(),
        };

        if method == Method::Head {
            response.strip_body();
        }
        response
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
