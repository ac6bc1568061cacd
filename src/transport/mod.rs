//! HTTP transport layer for the citbbs client.
//!
//! The transport only moves bytes: status mapping and JSON decoding happen
//! in [`crate::client::CitbbsClient`], so any [`HttpTransport`] sees the same
//! requests the API would.

mod http_transport;

pub use http_transport::ReqwestTransport;

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;

use crate::errors::CitbbsResult;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET request.
    Get,
    /// POST request.
    Post,
    /// DELETE request.
    Delete,
}

impl Method {
    /// Returns the method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully built HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL, including the query string.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Returns the URL path and query relative to `base_url`.
    ///
    /// Returns the full URL if it does not start with `base_url`.
    pub fn relative_path(&self, base_url: &str) -> &str {
        let base = base_url.trim_end_matches('/');
        self.url
            .strip_prefix(base)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(&self.url)
    }

    /// Gets a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parses the body as JSON, if there is one and it is valid.
    pub fn body_json(&self) -> Option<serde_json::Value> {
        self.body
            .as_ref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

/// HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, lowercase names.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP transport implementations.
///
/// Implementations return every response, whatever its status; only
/// failures to complete the exchange are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends an HTTP request and returns the response.
    async fn send(&self, request: HttpRequest) -> CitbbsResult<HttpResponse>;
}
