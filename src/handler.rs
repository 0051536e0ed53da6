//! Handler trait and type erasure.
//!
//! A route stores its handler as a [`BoxedHandler`], an `Arc` around
//! `dyn ErasedHandler`. Two kinds of value get there:
//!
//! - plain async functions and closures, which are [`ErasedHandler`]s
//!   themselves through the blanket impl below;
//! - middleware wrappers such as
//!   [`Gated`](crate::middleware::Gated), which hold an already-boxed inner
//!   handler and implement [`ErasedHandler`] by hand.
//!
//! ```text
//! async fn inspect(req) -> Response
//!        ↓ gate.wrap(inspect)         inner boxed once, at registration
//! Gated { gate, inner: BoxedHandler }
//!        ↓ router.get("/headers", ..)
//! Arc<Gated>                          stored in the route table
//!        ↓ per request
//! Gated::call → inner.call            no Arc clones, one box per layer
//! ```

use std::future::{self, Future};
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Object-safe dispatch interface behind every route.
///
/// `#[doc(hidden)] pub` because it appears in the return type of
/// [`Handler::into_boxed_handler`].
#[doc(hidden)]
pub trait ErasedHandler: Send + Sync + 'static {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler>;

impl<F, Fut, R> ErasedHandler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = self(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// Anything that can be registered on a route.
///
/// Satisfied by any function or closure of the shape
///
/// ```text
/// Fn(Request) -> impl Future<Output = impl IntoResponse>
/// ```
///
/// and by the wrappers the [`middleware`](crate::middleware) module returns.
/// The trait is sealed.
pub trait Handler: sealed::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

pub(crate) mod sealed {
    pub trait Sealed {}
}

impl<F, Fut, R> sealed::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(self)
    }
}

/// A future that is already resolved, for layers that answer without
/// calling the inner handler.
pub(crate) fn ready(res: Response) -> BoxFuture {
    Box::pin(future::ready(res))
}
