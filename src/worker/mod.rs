//! Worker invocation channel
//!
//! The coordinator sends one serialized batch to a worker and waits for the
//! serialized batch result. Which transport carries it is chosen at startup
//! with [`WorkerMode`].

mod http;
mod local;
#[cfg(test)]
pub(crate) mod mock;
mod process;

pub use http::HttpWorker;
pub use local::LocalWorker;
pub use process::ProcessWorker;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::runner::BatchRunner;

/// Call-and-await primitive to a separately running worker
#[async_trait]
pub trait WorkerInvoker: Send + Sync {
    /// Send `payload` (a JSON batch) to `worker_ref`, return the raw reply
    async fn invoke(&self, worker_ref: &str, payload: &str) -> Result<String>;
}

/// Worker transport selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerMode {
    /// Spawn `<worker_ref> worker` per batch
    #[default]
    Process,
    /// POST each batch to the URL `worker_ref`
    Http,
    /// Run batches inside the coordinator
    Local,
}

impl WorkerMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "process" => Some(WorkerMode::Process),
            "http" => Some(WorkerMode::Http),
            "local" | "in-process" => Some(WorkerMode::Local),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WorkerMode::Process => "process",
            WorkerMode::Http => "http",
            WorkerMode::Local => "local",
        }
    }

    /// Build the invoker for this mode. Local workers run batches with `batches`.
    pub fn invoker(self, batches: BatchRunner, timeout_secs: u64) -> Result<Arc<dyn WorkerInvoker>> {
        Ok(match self {
            WorkerMode::Process => Arc::new(ProcessWorker::new()),
            WorkerMode::Http => Arc::new(HttpWorker::with_timeout(timeout_secs)?),
            WorkerMode::Local => Arc::new(LocalWorker::new(batches)),
        })
    }
}

impl fmt::Display for WorkerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_mode_from_str() {
        assert_eq!(WorkerMode::from_str("HTTP"), Some(WorkerMode::Http));
        assert_eq!(WorkerMode::from_str("local"), Some(WorkerMode::Local));
        assert_eq!(WorkerMode::from_str("lambda"), None);
        assert_eq!(WorkerMode::default(), WorkerMode::Process);
    }

    #[test]
    fn test_worker_mode_serde() {
        let mode: WorkerMode = serde_json::from_str("\"http\"").unwrap();
        assert_eq!(mode, WorkerMode::Http);
        assert_eq!(serde_json::to_string(&WorkerMode::Local).unwrap(), "\"local\"");
        assert_eq!(WorkerMode::Process.to_string(), "process");
    }
}
