//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::HeaderMap;
use http::header::COOKIE;
use serde::de::DeserializeOwned;

use crate::error::Rejection;
use crate::method::Method;
use crate::parse::{extend_cookies, parse_query};

/// An incoming HTTP request, parsed once and read-only afterwards.
///
/// The router attaches path parameters; the auth middleware may attach the
/// trust marker. Neither is reachable through the public API as a setter.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    query: HashMap<String, String>,
    headers: HeaderMap,
    cookies: HashMap<String, String>,
    body: Bytes,
    params: HashMap<String, String>,
    trusted: bool,
}

impl Request {
    pub(crate) fn new(method: Method, parts: http::request::Parts, body: Bytes) -> Self {
        let query = parts.uri.query().map(parse_query).unwrap_or_default();

        let mut cookies = HashMap::new();
        for value in parts.headers.get_all(COOKIE) {
            // Non-ASCII cookie headers are skipped, same as any other
            // fragment the parser cannot read.
            if let Ok(raw) = value.to_str() {
                extend_cookies(&mut cookies, raw);
            }
        }

        Self {
            method,
            path: parts.uri.path().to_owned(),
            query,
            headers: parts.headers,
            cookies,
            body,
            params: HashMap::new(),
            trusted: false,
        }
    }

    pub(crate) fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub(crate) fn into_trusted(mut self) -> Self {
        self.trusted = true;
        self
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Values that are not visible ASCII
    /// are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/project/{projectID}/info` on `/project/112/info`,
    /// `req.param("projectID")` returns `Some("112")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns a decoded query-string value.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Returns a cookie value from the `Cookie` header(s).
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// `true` once an auth middleware has accepted this request.
    pub fn is_trusted(&self) -> bool {
        self.trusted
    }

    /// Decodes the body as JSON.
    ///
    /// Malformed JSON and shape mismatches (missing fields, wrong types) are
    /// both a [`Rejection::BadRequest`].
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Rejection> {
        serde_json::from_slice(&self.body).map_err(|e| Rejection::BadRequest(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) fn test_request(method: Method, uri: &str, cookie: Option<&str>, body: &str) -> Request {
    let mut builder = http::Request::builder().method(method.as_str()).uri(uri);
    if let Some(c) = cookie {
        builder = builder.header(COOKIE, c);
    }
    let (parts, ()) = builder.body(()).expect("valid test request").into_parts();
    Request::new(method, parts, Bytes::from(body.to_owned()))
}
