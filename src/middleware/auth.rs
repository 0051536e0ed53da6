//! Cookie gate for guarded routes.

use std::sync::Arc;

use tracing::debug;

use crate::error::Rejection;
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler, ready, sealed};
use crate::request::Request;
use crate::response::IntoResponse;

/// Header stamped on every response that passed the gate.
const TRUST_HEADER: &str = "xauth";
const TRUST_VALUE: &str = "secret";

/// Rejects requests whose cookie `name` is missing or not exactly `secret`.
///
/// Accepted requests reach the wrapped handler marked as trusted
/// ([`Request::is_trusted`]) and their response carries `xauth: secret`.
/// Rejected requests get [`Rejection::Unauthorized`] and the wrapped handler
/// never runs. The check ignores the method, so the same gate can wrap GET,
/// HEAD and POST routes alike.
///
/// Nothing is remembered between requests: the cookie is checked anew every
/// time.
#[derive(Clone, Debug)]
pub struct RequireCookie {
    name: Arc<str>,
    secret: Arc<str>,
}

impl RequireCookie {
    pub fn new(name: impl Into<Arc<str>>, secret: impl Into<Arc<str>>) -> Self {
        Self { name: name.into(), secret: secret.into() }
    }

    /// `true` if the request carries the expected cookie value.
    pub fn allows(&self, req: &Request) -> bool {
        req.cookie(&self.name) == Some(&*self.secret)
    }

    /// Wraps `handler` behind this gate.
    pub fn wrap(&self, handler: impl Handler) -> Gated {
        Gated { gate: self.clone(), inner: handler.into_boxed_handler() }
    }
}

/// A handler behind a [`RequireCookie`] gate. Built by
/// [`RequireCookie::wrap`].
pub struct Gated {
    gate: RequireCookie,
    inner: BoxedHandler,
}

impl ErasedHandler for Gated {
    fn call(&self, req: Request) -> BoxFuture {
        if !self.gate.allows(&req) {
            debug!(path = req.path(), cookie = %self.gate.name, "auth cookie missing or wrong");
            return ready(Rejection::Unauthorized.into_response());
        }

        let fut = self.inner.call(req.into_trusted());
        Box::pin(async move {
            let mut res = fut.await;
            res.set_header(TRUST_HEADER, TRUST_VALUE);
            res
        })
    }
}

impl sealed::Sealed for Gated {}

impl Handler for Gated {
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(self)
    }
}
