//! HTTP Client Adapter using Reqwest

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_interop::{Adapter, FromNative, InteropError, Result, Wrapper};
use reqwest::Client;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Borrowed adapter over a `reqwest::Client`.
///
/// The client is reference-counted and shared; disposing the adapter never
/// shuts it down. Use `core_interop::unwrap` to reach the raw client for
/// features the interface does not cover (streaming, cookies, ...).
pub struct ReqwestHttpClient {
    inner: Wrapper<Client>,
}

impl ReqwestHttpClient {
    /// Create an adapter over a default client
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create an adapter over a client with a request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("platform-interop/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InteropError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client))
    }

    /// Wrap an existing client
    pub fn with_client(client: Client) -> Self {
        Self::from_native(Arc::new(client))
    }

    /// Convert bridge HttpMethod to reqwest Method
    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
        }
    }

    /// Build reqwest request from bridge request
    fn build_request(&self, request: HttpRequest) -> reqwest::RequestBuilder {
        let method = Self::convert_method(request.method);
        let mut req = self.inner.raw_native().request(method, &request.url);

        for (key, value) in request.headers {
            req = req.header(key, value);
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        req
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FromNative<Client> for ReqwestHttpClient {
    fn from_native(native: Arc<Client>) -> Self {
        Self {
            inner: Wrapper::borrowed(native),
        }
    }
}

impl Adapter for ReqwestHttpClient {
    fn raw_native_any(&self) -> Option<&(dyn Any + Send + Sync)> {
        Some(self.inner.as_native_any())
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let url = request.url.clone();

        let response = self
            .build_request(request)
            .send()
            .await
            .map_err(|e| InteropError::Http(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| InteropError::Http(format!("Failed to read response body: {}", e)))?;

        debug!(method = ?method, url = %url, status, size = body.len(), "HTTP request completed");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
