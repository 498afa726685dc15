//! HTTP transport abstraction for the Chimpvine session client.
//!
//! Provides the [`HttpTransport`] trait that the session layer talks to,
//! plus the plain request/response values that cross it. Keeping the
//! trait small means tests can swap in an in-memory transport, and the
//! real client can be replaced without touching session code.
//!
//! # Feature Flags
//!
//! - `reqwest` (default): HTTP transport via `reqwest`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "reqwest")]
mod http;

pub use error::{BoxError, TransportError};
#[cfg(feature = "reqwest")]
pub use http::ReqwestTransport;

use std::borrow::Cow;
use std::fmt;

/// The HTTP methods the backend contract uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// A single outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Header name/value pairs, sent in insertion order.
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a `GET` request with no headers.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a `POST` request carrying `body`.
    pub fn post(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    /// Appends a header.
    pub fn header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the first value of header `name` (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response as seen by the session layer: status plus raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Sends HTTP requests and hands back the response.
///
/// Implementations must return `Ok` for every response that arrived,
/// whatever its status code. `Err` is reserved for failures where no
/// response exists at all.
pub trait HttpTransport: Send + Sync + 'static {
    /// Sends `request` and waits for the full response body.
    async fn send(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
    }

    #[test]
    fn test_get_has_no_body() {
        let req = HttpRequest::get("http://test/a");
        assert_eq!(req.method, Method::Get);
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn test_post_carries_body_and_headers() {
        let req = HttpRequest::post("http://test/b", b"{}".to_vec())
            .header("Content-Type", "application/json")
            .header("X-WP-Nonce", "abc");
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.body.as_deref(), Some(&b"{}"[..]));
        assert_eq!(req.headers.len(), 2);
    }

    #[test]
    fn test_header_value_is_case_insensitive() {
        let req = HttpRequest::get("http://test").header("X-WP-Nonce", "n1");
        assert_eq!(req.header_value("x-wp-nonce"), Some("n1"));
        assert_eq!(req.header_value("Content-Type"), None);
    }

    #[test]
    fn test_header_value_keeps_empty_values() {
        // An empty nonce is still a header the server gets to see.
        let req = HttpRequest::get("http://test").header("X-WP-Nonce", "");
        assert_eq!(req.header_value("X-WP-Nonce"), Some(""));
    }

    #[test]
    fn test_response_success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(199, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
        assert!(!HttpResponse::new(403, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }

    #[test]
    fn test_response_text_is_lossy() {
        let resp = HttpResponse::new(200, vec![b'o', b'k', 0xff]);
        assert_eq!(resp.text(), "ok\u{fffd}");
    }
}
