//! HTTP request builder.

use crate::FetchError;
use serde::Serialize;
use shop_observability::{TraceContext, TRACEPARENT_HEADER};
use std::collections::HashMap;

/// HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A builder for constructing HTTP requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Option<Vec<u8>>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        let json = serde_json::to_vec(value)?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(json);
        Ok(self)
    }

    /// Propagate a trace context via the `traceparent` header.
    pub fn trace(self, context: &TraceContext) -> Self {
        self.header(TRACEPARENT_HEADER, context.to_traceparent())
    }

    /// Get the request method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Get the target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get a header value (case-insensitive).
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn has_header(&self, key: &str) -> bool {
        self.header_value(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body_sets_content_type() {
        #[derive(Serialize)]
        struct Patch {
            stock: i64,
        }

        let req = RequestBuilder::new(Method::Patch, "http://products/api/products/p1")
            .json(&Patch { stock: 4 })
            .unwrap();

        assert_eq!(req.header_value("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(br#"{"stock":4}"#.as_slice()));
    }

    #[test]
    fn test_trace_header() {
        let ctx = TraceContext::new();
        let req = RequestBuilder::new(Method::Get, "http://products/api/products").trace(&ctx);
        assert_eq!(
            req.header_value(TRACEPARENT_HEADER),
            Some(ctx.to_traceparent().as_str())
        );
    }

    #[test]
    fn test_method_strings() {
        assert_eq!(Method::Patch.as_str(), "PATCH");
        assert_eq!(Method::Delete.to_reqwest(), reqwest::Method::DELETE);
    }
}
