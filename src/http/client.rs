//! HTTP client shared by HTTP executors and the HTTP worker channel

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client, Method,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// HTTP client errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Thin wrapper over `reqwest::Client` with a fixed timeout
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout_secs: u64,
}

impl HttpClient {
    /// Create a client with the default 30 second timeout
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(30)
    }

    /// Create client with custom timeout
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| HttpError::RequestFailed(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    /// Send HTTP request
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        debug!("Sending {} request to {}", request.method, request.url);

        let method = Method::from_bytes(request.method.to_uppercase().as_bytes())
            .map_err(|_| HttpError::InvalidRequest(format!("method '{}'", request.method)))?;

        let mut headers = HeaderMap::new();
        for (key, value) in &request.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| HttpError::InvalidRequest(format!("header name '{key}'")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| HttpError::InvalidRequest(format!("header value for '{key}'")))?;
            headers.insert(name, value);
        }

        let mut req_builder = self.client.request(method, &request.url).headers(headers);
        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let start = std::time::Instant::now();

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                HttpError::ConnectionRefused(request.url.clone())
            } else if e.is_builder() {
                HttpError::InvalidRequest(e.to_string())
            } else {
                HttpError::RequestFailed(e.to_string())
            }
        })?;

        let duration_ms = start.elapsed().as_millis() as u64;
        let status = response.status();

        let mut response_headers = BTreeMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                response_headers.insert(key.to_string(), v.to_string());
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| HttpError::RequestFailed(format!("Failed to read response body: {e}")))?;

        debug!(
            "Response: {} {} in {}ms",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            duration_ms
        );

        Ok(HttpResponse {
            status_code: status.as_u16(),
            headers: response_headers,
            body,
            duration_ms,
        })
    }

    /// POST a JSON document
    pub async fn post_json(&self, url: &str, body: impl Into<String>) -> Result<HttpResponse, HttpError> {
        self.send(
            HttpRequest::post(url)
                .header("Content-Type", "application/json")
                .body(body),
        )
        .await
    }
}

/// HTTP request builder
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// HTTP response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub duration_ms: u64,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Body parsed as JSON, falling back to a JSON string
    pub fn body_value(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|_| serde_json::Value::String(self.body.clone()))
    }
}
