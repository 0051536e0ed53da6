//! # wicket
//!
//! A small HTTP/1.1 router for services that need a handful of routes, a
//! cookie gate in front of some of them, and a directory of static files.
//!
//! ## What is in the box
//!
//! - Radix-tree routing with `{name}` parameters via [`matchit`]; a path
//!   that exists only for another method is told apart from an unknown one
//! - Permissive query-string and `Cookie` parsing ([`parse_query`],
//!   [`parse_cookies`])
//! - [`middleware::RequireCookie`], a per-route cookie gate
//! - [`StaticFiles`], a traversal-proof file responder
//! - [`redirect::see_other`] for fixed redirects
//! - A hyper-backed [`Server`] with bounded body reads and graceful shutdown
//!
//! What it leaves to the proxy in front: TLS, HTTP/2, connection pooling.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use wicket::middleware::RequireCookie;
//! use wicket::{Rejection, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let gate = RequireCookie::new("pass", "1234567890");
//!     let app = Router::new()
//!         .get("/users/{id}", get_user)
//!         .post("/users", gate.wrap(create_user));
//!
//!     Server::bind(([0, 0, 0, 0], 3000).into()).serve(app).await.unwrap();
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
//! }
//!
//! #[derive(serde::Deserialize)]
//! struct NewUser { name: String }
//!
//! async fn create_user(req: Request) -> Result<String, Rejection> {
//!     let user: NewUser = req.json()?;
//!     Ok(user.name)
//! }
//! ```

mod error;
mod fs;
mod handler;
mod method;
mod parse;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod app;
pub mod config;
pub mod health;
pub mod middleware;
pub mod redirect;

pub use config::Config;
pub use error::{Error, Rejection};
pub use fs::StaticFiles;
pub use handler::Handler;
pub use method::Method;
pub use parse::{parse_cookies, parse_query};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
