//! Scripted executor for runner tests

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::ActionExecutor;
use crate::models::DataError;

/// Replays a fixed script of outcomes; the last one repeats forever
pub struct ScriptedExecutor {
    script: Mutex<Vec<Result<Value, DataError>>>,
    calls: AtomicUsize,
    params: Mutex<Vec<Value>>,
}

impl ScriptedExecutor {
    pub fn new(script: Vec<Result<Value, DataError>>) -> Self {
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
            params: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(response: Value) -> Self {
        Self::new(vec![Ok(response)])
    }

    pub fn err(error: DataError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Params of every call, in order
    pub fn seen_params(&self) -> Vec<Value> {
        self.params.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionExecutor for ScriptedExecutor {
    async fn execute(&self, params: &Value) -> Result<Value, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.params.lock().unwrap().push(params.clone());

        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.remove(0)
        } else {
            script
                .first()
                .cloned()
                .unwrap_or_else(|| Err(DataError::new("Error", "empty script")))
        }
    }
}
