//! Recording worker for delegation tests

use async_trait::async_trait;
use std::sync::Mutex;

use super::WorkerInvoker;
use crate::error::{EngineError, Result};

/// Records every invocation and answers with a fixed reply
pub struct RecordingInvoker {
    reply: std::result::Result<String, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingInvoker {
    /// A reply of `Err` is returned as a transport error carrying its message
    pub fn replying(reply: Result<String>) -> Self {
        Self {
            reply: reply.map_err(|e| match e {
                EngineError::Transport(message) => message,
                other => other.to_string(),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(worker_ref, payload)` of every call, in order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkerInvoker for RecordingInvoker {
    async fn invoke(&self, worker_ref: &str, payload: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((worker_ref.to_string(), payload.to_string()));
        self.reply.clone().map_err(EngineError::Transport)
    }
}
