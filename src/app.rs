//! The demo application: the routes the browser test script exercises.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/project/{projectID}/info` | [`project_info`] |
//! | GET | `/redirect` | 303 to `redirect_target` |
//! | GET, HEAD | `/headers` | cookie-gated [`inspect_headers`] |
//! | POST | `/headers` | [`echo_msg`], gated only with `guard_echo` |
//! | GET | `/file/{name}` | static files under `static_root` |
//! | GET | `/inline` | [`inline`] |
//! | GET | `/healthz` | [`health::liveness`] |

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Rejection;
use crate::fs::StaticFiles;
use crate::middleware::RequireCookie;
use crate::{Request, Response, Router, health, redirect};

/// Name of the cookie checked on `/headers`.
pub const AUTH_COOKIE: &str = "pass";

/// Builds the route table from `config`.
pub fn router(config: &Config) -> Router {
    let gate = RequireCookie::new(AUTH_COOKIE, config.secret.as_str());
    let files = StaticFiles::new(&config.static_root)
        .max_bytes(config.max_file_bytes)
        .timeout(config.file_timeout());

    let router = Router::new()
        .get("/project/{projectID}/info", project_info)
        .get("/redirect", redirect::see_other(&config.redirect_target))
        .get("/headers", gate.wrap(inspect_headers))
        .head("/headers", gate.wrap(inspect_headers))
        .get("/file/{name}", files.handler("name"))
        .get("/inline", inline)
        .get("/healthz", health::liveness);

    if config.guard_echo {
        router.post("/headers", gate.wrap(echo_msg))
    } else {
        router.post("/headers", echo_msg)
    }
}

#[derive(Serialize)]
struct ProjectInfo<'a> {
    #[serde(rename = "projectID")]
    project_id: &'a str,
    #[serde(rename = "invoiceID")]
    invoice_id: &'a str,
}

/// Echoes the `projectID` path parameter and `invoiceID` query value as
/// JSON strings. A missing `invoiceID` echoes as `""`.
pub async fn project_info(req: Request) -> Response {
    Response::to_json(&ProjectInfo {
        project_id: req.param("projectID").unwrap_or_default(),
        invoice_id: req.query("invoiceID").unwrap_or_default(),
    })
}

/// Bare 200. Sits behind the cookie gate, which adds `xauth`.
pub async fn inspect_headers(_req: Request) -> Response {
    Response::builder().no_body()
}

#[derive(Deserialize)]
struct Echo {
    msg: String,
}

/// `{"msg": S}` in, `S` out as plain text.
pub async fn echo_msg(req: Request) -> Result<String, Rejection> {
    let Echo { msg } = req.json()?;
    Ok(msg)
}

pub async fn inline(_req: Request) -> &'static str {
    "Hello"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::request::test_request;
    use crate::response::IntoResponse;

    #[tokio::test]
    async fn project_info_without_invoice_echoes_empty_string() {
        let req = test_request(Method::Get, "/project/7/info", None, "")
            .with_params([("projectID".to_owned(), "7".to_owned())].into());
        let res = project_info(req).await;
        assert_eq!(res.body(), br#"{"projectID":"7","invoiceID":""}"#);
    }

    #[tokio::test]
    async fn echo_rejects_non_string_msg() {
        let req = test_request(Method::Post, "/headers", None, r#"{"msg": 5}"#);
        let res = echo_msg(req).await.into_response();
        assert_eq!(res.status_code(), 400);
    }

    #[tokio::test]
    async fn echo_ignores_extra_fields() {
        let req = test_request(Method::Post, "/headers", None, r#"{"msg":"hi","x":1}"#);
        assert_eq!(echo_msg(req).await.unwrap(), "hi");
    }
}
