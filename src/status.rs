//! HTTP status codes as a typed enum.
//!
//! Only the codes this server can emit are listed. Anything a handler wants
//! to send goes through one of these, so a typo'd number cannot reach the
//! wire.
//!
//! ```rust
//! use wicket::{Response, Status};
//!
//! Response::status(Status::Unauthorized);
//!
//! Response::builder()
//!     .status(Status::SeeOther)
//!     .header("location", "/inline")
//!     .no_body();
//! ```

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                  // 200

    // ── 3xx Redirection ───────────────────────────────────────────────────────
    SeeOther,            // 303

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,          // 400
    Unauthorized,        // 401
    NotFound,            // 404
    RequestTimeout,      // 408
    ContentTooLarge,     // 413

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError, // 500
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        match s {
            Status::Ok                  => 200,
            Status::SeeOther            => 303,
            Status::BadRequest          => 400,
            Status::Unauthorized        => 401,
            Status::NotFound            => 404,
            Status::RequestTimeout      => 408,
            Status::ContentTooLarge     => 413,
            Status::InternalServerError => 500,
        }
    }
}
