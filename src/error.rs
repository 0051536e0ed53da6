//! Error types.
//!
//! Two families live here and they never mix:
//!
//! - [`Error`] surfaces infrastructure failures: binding the listener,
//!   loading or validating configuration. These end the process.
//! - [`Rejection`] is the per-request failure taxonomy. Every variant maps to
//!   a concrete status code, so a rejection always becomes a response and
//!   never crosses the connection boundary as a fault.

use thiserror::Error;

use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// The error type returned by wicket's fallible setup operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// A request that could not be served.
///
/// Return it from a handler (directly or as the `Err` side of a `Result`)
/// and the response builder renders the matching status.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    /// No route, no file, or a path that tried to leave the static root.
    #[error("not found")]
    NotFound,

    /// The path exists for another method. Rendered as 404 as well.
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("unauthorized")]
    Unauthorized,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("payload too large")]
    PayloadTooLarge,

    #[error("timed out")]
    Timeout,

    #[error("internal error: {0}")]
    Internal(String),
}

impl Rejection {
    pub fn status(&self) -> Status {
        match self {
            Self::NotFound | Self::MethodNotAllowed => Status::NotFound,
            Self::Unauthorized => Status::Unauthorized,
            Self::BadRequest(_) => Status::BadRequest,
            Self::PayloadTooLarge => Status::ContentTooLarge,
            Self::Timeout => Status::RequestTimeout,
            Self::Internal(_) => Status::InternalServerError,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        if let Self::Internal(reason) = &self {
            tracing::error!(%reason, "internal error while handling request");
        }
        Response::status(self.status())
    }
}

impl<T: IntoResponse> IntoResponse for Result<T, Rejection> {
    fn into_response(self) -> Response {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}
