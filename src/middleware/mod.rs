//! Middleware layer.
//!
//! Middleware wraps a single handler and returns a new one, so it composes
//! per route rather than per router:
//!
//! ```rust
//! use wicket::{Request, Response, Router};
//! use wicket::middleware::RequireCookie;
//!
//! async fn inspect(_req: Request) -> Response { Response::text("") }
//!
//! let gate = RequireCookie::new("pass", "1234567890");
//! let app = Router::new().get("/headers", gate.wrap(inspect));
//! ```
//!
//! Request logging is not a middleware; the server records one event per
//! request with method, path, status and latency.

mod auth;

pub use auth::{Gated, RequireCookie};
