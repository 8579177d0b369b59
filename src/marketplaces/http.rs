//! HTTP client with bounded retries and exponential backoff.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as ReqwestClient, Method, Response};
use serde_json::Value;
use tracing::{debug, warn};

use super::{MarketplaceError, Result};
use crate::config::HttpConfig;

/// A single request description, replayed on every attempt.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP client shared by the marketplace readers.
///
/// 5xx responses, timeouts and connection errors are retried up to
/// `max_attempts` times in total. Any other response, 4xx included, is
/// handed back to the caller as-is.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http_client: ReqwestClient,
    config: HttpConfig,
}

impl HttpClient {
    /// Creates a new client with the configured request timeout.
    pub fn new(config: HttpConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http_client,
            config,
        })
    }

    /// Sends the request, retrying retryable failures with backoff.
    /// The last failure is returned once attempts are exhausted.
    pub async fn send(&self, request: &HttpRequest) -> Result<Response> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.send_once(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.config.backoff_delay(attempt);
                    warn!(
                        error = %e,
                        url = %request.url,
                        delay = ?delay,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(&self, request: &HttpRequest) -> Result<Response> {
        let mut builder = self
            .http_client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, url = %request.url, "sending request");

        let response = builder.send().await?;
        let status = response.status();

        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketplaceError::Server { status, body });
        }

        Ok(response)
    }
}
