//! In-process worker

use async_trait::async_trait;

use super::WorkerInvoker;
use crate::error::Result;
use crate::models::TestBatch;
use crate::runner::BatchRunner;

/// Runs batches in the coordinator process, still going through the JSON
/// payload so results match what a remote worker would return
#[derive(Clone)]
pub struct LocalWorker {
    batches: BatchRunner,
}

impl LocalWorker {
    pub fn new(batches: BatchRunner) -> Self {
        Self { batches }
    }
}

#[async_trait]
impl WorkerInvoker for LocalWorker {
    async fn invoke(&self, _worker_ref: &str, payload: &str) -> Result<String> {
        let batch: Option<TestBatch> = serde_json::from_str(payload)?;
        let result = self.batches.run_batch(batch).await;
        Ok(serde_json::to_string(&result)?)
    }
}
