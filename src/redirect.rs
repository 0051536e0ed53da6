//! Fixed-target redirects.

use std::sync::Arc;

use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Handler answering every request with `303 See Other` to `target`.
///
/// The client follows the `Location` with a fresh `GET`; this handler never
/// sees that second request.
///
/// ```rust
/// use wicket::{Router, redirect};
///
/// let app = Router::new().get("/redirect", redirect::see_other("/inline"));
/// ```
pub fn see_other(target: &str) -> impl Handler + use<> {
    let target: Arc<str> = Arc::from(target);
    move |_req: Request| {
        let target = Arc::clone(&target);
        async move {
            Response::builder()
                .status(Status::SeeOther)
                .header("location", &target)
                .no_body()
        }
    }
}
