//! HTTP request descriptor and transport-agnostic response wrapper.
//!
//! # Design
//! Requests and responses are described as plain data so that any
//! `Transport` can execute them and tests can inspect them without a
//! network. `NormalizedResponse` pairs the request that was sent with
//! whatever raw response the transport produced, and is the value carried
//! by every HTTP-level error.

use std::borrow::Cow;

use serde_json::Value;

use crate::error::LenddoError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `path` is relative to the base URI of the `RequestHandler` that issued
/// it. Query and header pairs keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup. Returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A raw HTTP response as returned by a transport.
///
/// The body is kept as received; nothing assumes it is UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// The request that was sent together with the raw response, if any.
///
/// `raw` is `None` only when the transport never obtained a response
/// (DNS failure, refused connection, timeout). Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedResponse {
    request: HttpRequest,
    raw: Option<HttpResponse>,
}

impl NormalizedResponse {
    pub fn new(request: HttpRequest, raw: Option<HttpResponse>) -> Self {
        Self { request, raw }
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn raw(&self) -> Option<&HttpResponse> {
        self.raw.as_ref()
    }

    pub fn status(&self) -> Option<u16> {
        self.raw.as_ref().map(|r| r.status)
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.raw.as_ref().map(|r| r.body.as_slice())
    }

    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.raw.as_ref().map(HttpResponse::text)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.raw.as_ref().and_then(|r| r.header(name))
    }

    /// Parse the response body as JSON.
    ///
    /// A missing response is treated like an empty body. On failure the
    /// error carries a copy of this response for diagnostics.
    pub fn json(&self) -> Result<Value, LenddoError> {
        let body = self.body().unwrap_or_default();
        serde_json::from_slice(body).map_err(|e| LenddoError::ResponseParsing {
            message: e.to_string(),
            response: Box::new(self.clone()),
        })
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
