//! HTTP client utilities for the shopfront services.
//!
//! Provides a small builder API over `reqwest` with JSON helpers, a
//! per-client timeout, and W3C trace propagation on every request. A
//! client given a parent context sends a fresh child span per request;
//! otherwise each request starts its own trace.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_data::FetchClient;
//!
//! let client = FetchClient::new().with_base_url("http://products-service:8080");
//!
//! let products: Vec<Product> = client
//!     .get("/api/products")
//!     .send_json()
//!     .await?;
//! ```

mod error;
mod request;
mod response;

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use shop_observability::TRACEPARENT_HEADER;

pub use shop_observability::TraceContext;

pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;

/// Timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for making outbound requests.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: Option<String>,
    trace_parent: Option<TraceContext>,
    timeout: Duration,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a new HTTP client.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: None,
            trace_parent: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a client with a base URL that will be prepended to relative paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Join an existing trace: every request carries a child span of `parent`.
    pub fn with_trace_parent(mut self, parent: TraceContext) -> Self {
        self.trace_parent = Some(parent);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured base URL.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a PATCH request.
    pub fn patch(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Patch, url)
    }

    /// Create a DELETE request.
    pub fn delete(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Delete, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let full_url = self.resolve(url.into());

        let mut builder = RequestBuilder::new(method, full_url);
        if let Some(parent) = &self.trace_parent {
            builder = builder.trace(&parent.child());
        }

        ClientRequestBuilder {
            http: self.http.clone(),
            timeout: self.timeout,
            builder,
        }
    }

    fn resolve(&self, url: String) -> String {
        match &self.base_url {
            Some(base) if !url.starts_with("http://") && !url.starts_with("https://") => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url,
        }
    }
}

/// A request builder bound to a client.
#[derive(Debug)]
pub struct ClientRequestBuilder {
    http: reqwest::Client,
    timeout: Duration,
    builder: RequestBuilder,
}

impl ClientRequestBuilder {
    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// The request as built so far.
    pub fn request(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Send the request and return the response, whatever its status.
    pub async fn send(self) -> Result<Response, FetchError> {
        let Self {
            http,
            timeout,
            mut builder,
        } = self;

        if !builder.has_header(TRACEPARENT_HEADER) {
            builder = builder.trace(&TraceContext::new());
        }

        let url = reqwest::Url::parse(&builder.url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", builder.url, e)))?;

        let mut request = http
            .request(builder.method.to_reqwest(), url)
            .timeout(timeout);
        for (key, value) in &builder.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(body) = builder.body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(
                method = builder.method.as_str(),
                url = %builder.url,
                error = %e,
                "request failed before a response arrived"
            );
            FetchError::from_transport(e)
        })?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(FetchError::from_transport)?
            .to_vec();

        tracing::debug!(
            method = builder.method.as_str(),
            url = %builder.url,
            status,
            bytes = body.len(),
            "fetch completed"
        );

        Ok(Response::new(status, headers, body))
    }

    /// Send the request, fail on non-2xx, and parse the body as JSON.
    pub async fn send_json<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        self.send().await?.error_for_status()?.json()
    }

    /// Send the request and fail on non-2xx, ignoring the body.
    pub async fn send_empty(self) -> Result<(), FetchError> {
        self.send().await?.error_for_status()?;
        Ok(())
    }
}
