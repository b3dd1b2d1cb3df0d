//! HTTP and GraphQL executors

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::debug;

use super::{parse_params, ActionExecutor};
use crate::http::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::models::DataError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct RequestParams {
    url: String,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default)]
    body: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQlParams {
    url: String,
    query: String,
    #[serde(default)]
    variables: Option<Value>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
}

fn client(timeout_secs: u64) -> Result<HttpClient, DataError> {
    HttpClient::with_timeout(timeout_secs).map_err(transport_error)
}

fn transport_error(err: HttpError) -> DataError {
    DataError::new("HttpError", err.to_string())
}

/// Status >= 400 is an executor failure carrying the status and body
fn check_status(response: &HttpResponse) -> Result<(), DataError> {
    if response.status_code < 400 {
        return Ok(());
    }
    Err(DataError::new(
        "HttpStatusError",
        format!("Request failed with status code {}", response.status_code),
    )
    .with_field("statusCode", response.status_code)
    .with_field("body", response.body_value()))
}

/// `httpRequest`: `{url, method?, headers?, body?}` → `{statusCode, headers, body}`
pub struct HttpRequestExecutor {
    timeout_secs: u64,
}

impl HttpRequestExecutor {
    pub fn new() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl Default for HttpRequestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionExecutor for HttpRequestExecutor {
    async fn execute(&self, params: &Value) -> Result<Value, DataError> {
        let params: RequestParams = parse_params(params, &["url"])?;
        let method = params.method.as_deref().unwrap_or("GET");
        debug!("httpRequest: {} {}", method, params.url);

        let mut request = HttpRequest::new(method, &params.url).headers(params.headers);
        match params.body {
            None | Some(Value::Null) => {}
            Some(Value::String(text)) => request = request.body(text),
            Some(other) => {
                if !request.headers.keys().any(|k| k.eq_ignore_ascii_case("content-type")) {
                    request = request.header("Content-Type", "application/json");
                }
                request = request.body(other.to_string());
            }
        }

        let response = client(self.timeout_secs)?
            .send(request)
            .await
            .map_err(transport_error)?;
        check_status(&response)?;

        Ok(json!({
            "statusCode": response.status_code,
            "headers": response.headers,
            "body": response.body_value(),
        }))
    }
}

/// `queryGraphQlApi`: `{url, query, variables?, headers?}` → response `data`
pub struct GraphQlExecutor {
    timeout_secs: u64,
}

impl GraphQlExecutor {
    pub fn new() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl Default for GraphQlExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionExecutor for GraphQlExecutor {
    async fn execute(&self, params: &Value) -> Result<Value, DataError> {
        let params: GraphQlParams = parse_params(params, &["url", "query"])?;
        debug!("queryGraphQlApi: {}", params.url);

        let payload = json!({
            "query": params.query,
            "variables": params.variables.unwrap_or_else(|| json!({})),
        });
        let request = HttpRequest::post(&params.url)
            .header("Content-Type", "application/json")
            .headers(params.headers)
            .body(payload.to_string());

        let response = client(self.timeout_secs)?
            .send(request)
            .await
            .map_err(transport_error)?;
        check_status(&response)?;

        graphql_data(response.body_value())
    }
}

/// Unwrap a GraphQL envelope; a non-empty `errors` list is a failure
fn graphql_data(mut body: Value) -> Result<Value, DataError> {
    match body.get("errors") {
        Some(Value::Array(errors)) if !errors.is_empty() => {
            return Err(DataError::new("GraphQlError", "GraphQL query returned errors.")
                .with_field("errors", Value::Array(errors.clone())));
        }
        _ => {}
    }
    Ok(body.get_mut("data").map(Value::take).unwrap_or(Value::Null))
}
