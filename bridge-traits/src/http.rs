//! HTTP Client Abstraction
//!
//! [`HttpClient`] is the interface application code sends requests through.
//! Requests and responses are plain values so they cross the adapter
//! boundary without exposing any client library types.
//!
//! The desktop implementation borrows a shared `reqwest::Client`;
//! `core_interop::unwrap` on a `&dyn HttpClient` hands that client back for
//! anything this interface does not model. Hand-written clients (test fakes,
//! mocks) have no native object and are rejected by `unwrap`.

use async_trait::async_trait;
use bytes::Bytes;
use core_interop::{Adapter, InteropError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

/// Outgoing request, assembled with the consuming builder methods.
///
/// A `timeout` set here overrides the client-wide request timeout for this
/// request only.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Serialize `body` as the request payload and mark it as JSON.
    ///
    /// # Errors
    ///
    /// [`InteropError::OperationFailed`] when `body` cannot be serialized.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let encoded = serde_json::to_vec(body).map_err(|e| {
            InteropError::OperationFailed(format!("Failed to encode request body: {}", e))
        })?;
        self.body = Some(Bytes::from(encoded));
        Ok(self.header("Content-Type", "application/json"))
    }

    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }
}

/// Fully buffered response.
///
/// Header names are stored as the client reports them; the desktop adapter
/// reports them lower-cased. Use [`HttpResponse::header`] for lookups.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            InteropError::OperationFailed(format!("Failed to decode response body: {}", e))
        })
    }

    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| InteropError::OperationFailed(format!("Invalid UTF-8: {}", e)))
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx status into [`InteropError::Http`].
    ///
    /// `execute` itself only fails on transport errors, so callers that treat
    /// any other status as a failure chain this after it.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(InteropError::Http(format!(
                "Unexpected status {}",
                self.status
            )))
        }
    }
}

/// Async HTTP client interface.
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
///
/// async fn fetch_manifest(client: &dyn HttpClient) -> core_interop::Result<String> {
///     let request = HttpRequest::new(HttpMethod::Get, "https://updates.example.com/manifest")
///         .header("Accept", "application/json");
///
///     client.execute(request).await?.error_for_status()?.text()
/// }
/// ```
#[async_trait]
pub trait HttpClient: Adapter {
    /// Send `request` and buffer the whole response.
    ///
    /// # Errors
    ///
    /// [`InteropError::Http`] when the request cannot be sent or the body
    /// cannot be read. Non-2xx statuses are returned as responses.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;

    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.execute(HttpRequest::new(HttpMethod::Get, url)).await
    }
}
