//! Liveness probe.
//!
//! ```rust
//! use wicket::{Router, health};
//!
//! let app = Router::new().get("/healthz", health::liveness);
//! ```

use crate::{Request, Response};

/// Always `200 OK` with body `"ok"`. If the process can answer HTTP at all,
/// it is alive.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}
