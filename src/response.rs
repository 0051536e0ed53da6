//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Handlers build a [`Response`] and return it. The server finalizes it into
//! an `http::Response` exactly once, right before the write.

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, HeaderName, HeaderValue};
use http_body_util::Full;
use serde::Serialize;

use crate::status::Status;

const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK)
///
/// ```rust
/// use wicket::{Response, Status};
///
/// Response::json(br#"{"id":1}"#.to_vec());
/// Response::text("hello");
/// Response::status(Status::Unauthorized);
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use wicket::{Response, Status};
///
/// Response::builder()
///     .status(Status::SeeOther)
///     .header("location", "/inline")
///     .no_body();
///
/// Response::builder().bytes("image/jpeg", vec![0xff, 0xd8]);
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) body: Bytes,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: u16,
}

impl Response {
    /// `200 OK` — `application/json`, body passed through untouched.
    pub fn json(body: Vec<u8>) -> Self {
        Self::builder().json(body)
    }

    /// `200 OK` — `application/json`, serialized with serde.
    ///
    /// A value that fails to serialize becomes a bare 500.
    pub fn to_json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => Self::json(bytes),
            Err(e) => {
                tracing::error!(error = %e, "response serialization failed");
                Self::status(Status::InternalServerError)
            }
        }
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(code: Status) -> Self {
        Self { body: Bytes::new(), headers: Vec::new(), status: code.into() }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: Status::Ok.into() }
    }

    pub fn status_code(&self) -> u16 { self.status }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup, first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Sets a header, replacing any existing value with the same name.
    pub(crate) fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.to_owned()));
    }

    /// Drops the body for a `HEAD` reply while keeping the `content-length`
    /// a `GET` would have produced.
    pub(crate) fn strip_body(&mut self) {
        let len = self.body.len();
        self.set_header("content-length", &len.to_string());
        self.body = Bytes::new();
    }

    /// Finalizes into the wire type.
    ///
    /// Headers whose name or value is not valid on the wire are dropped with
    /// a warning.
    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let len = self.body.len();
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = http::StatusCode::from_u16(self.status)
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

        let headers = res.headers_mut();
        for (name, value) in self.headers {
            match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
                (Ok(n), Ok(v)) => { headers.append(n, v); }
                _ => tracing::warn!(header = %name, "dropping invalid response header"),
            }
        }
        if !headers.contains_key(CONTENT_LENGTH) {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
        }
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `Status::Ok` (200).
/// Terminated by a typed body method.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: u16,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code.into();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: Vec<u8>) -> Response {
        self.finish(JSON, body.into())
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(TEXT, body.into().into())
    }

    /// Terminate with a body of any content type (images, HTML, binary).
    pub fn bytes(self, content_type: &str, body: impl Into<Bytes>) -> Response {
        self.finish(content_type, body.into())
    }

    /// Terminate with no body (e.g. a redirect or a bare 200 to `HEAD`).
    pub fn no_body(self) -> Response {
        Response { body: Bytes::new(), headers: self.headers, status: self.status }
    }

    fn finish(self, content_type: &str, body: Bytes) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.to_owned())];
        headers.extend(self.headers);
        Response { body, headers, status: self.status }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implemented for responses, strings, bare statuses, and
/// `Result<impl IntoResponse, Rejection>`, so handlers can use `?` on
/// anything that yields a [`Rejection`](crate::Rejection).
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a [`Status`] directly from a handler: `return Status::Unauthorized`
impl IntoResponse for Status {
    fn into_response(self) -> Response { Response::status(self) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_puts_content_type_first() {
        let res = Response::builder()
            .header("xauth", "secret")
            .text("hi");
        assert_eq!(res.headers[0], ("content-type".into(), TEXT.into()));
        assert_eq!(res.header("XAUTH"), Some("secret"));
    }

    #[test]
    fn set_header_replaces() {
        let mut res = Response::builder().header("xauth", "old").no_body();
        res.set_header("XAuth", "secret");
        assert_eq!(res.headers.len(), 1);
        assert_eq!(res.header("xauth"), Some("secret"));
    }

    #[test]
    fn to_json_serializes() {
        let res = Response::to_json(&serde_json::json!({ "a": "1" }));
        assert_eq!(res.header("content-type"), Some(JSON));
        assert_eq!(res.body(), br#"{"a":"1"}"#);
    }

    #[tokio::test]
    async fn stripped_body_keeps_length() {
        use http_body_util::BodyExt;

        let mut res = Response::text("Hello");
        res.strip_body();
        let res = res.into_http();
        assert_eq!(res.headers()[CONTENT_LENGTH], "5");
        assert_eq!(res.headers().get_all(CONTENT_LENGTH).iter().count(), 1);
        assert_eq!(res.status(), http::StatusCode::OK);
        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[test]
    fn invalid_headers_are_dropped() {
        let res = Response::builder()
            .header("bad header", "x")
            .header("ok", "fine")
            .no_body()
            .into_http();
        assert_eq!(res.headers()["ok"], "fine");
        assert_eq!(res.headers().len(), 2);
    }
}
