//! HTTP worker: POST the batch to a worker endpoint

use async_trait::async_trait;
use tracing::debug;

use super::WorkerInvoker;
use crate::error::{EngineError, Result};
use crate::http::HttpClient;

/// Treats `worker_ref` as a URL that accepts a batch and replies with its
/// result
#[derive(Clone)]
pub struct HttpWorker {
    client: HttpClient,
}

impl HttpWorker {
    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client =
            HttpClient::with_timeout(timeout_secs).map_err(|e| EngineError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WorkerInvoker for HttpWorker {
    async fn invoke(&self, worker_ref: &str, payload: &str) -> Result<String> {
        debug!("Posting batch to worker endpoint {}", worker_ref);

        let response = self
            .client
            .post_json(worker_ref, payload)
            .await
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(EngineError::Worker {
                worker: worker_ref.to_string(),
                message: format!("HTTP {}: {}", response.status_code, response.body),
            });
        }
        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_transport_error() {
        let worker = HttpWorker::with_timeout(2).unwrap();
        let err = worker.invoke("http://127.0.0.1:1/run", "{}").await.unwrap_err();
        assert_eq!(err.kind(), "TransportError");
    }
}
