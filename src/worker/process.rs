//! Subprocess worker: one child process per batch

use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::WorkerInvoker;
use crate::error::{EngineError, Result};

/// Runs `<worker_ref> <args...>` with the batch on stdin and reads the
/// result from stdout
#[derive(Clone, Debug)]
pub struct ProcessWorker {
    args: Vec<String>,
}

impl ProcessWorker {
    /// Invokes the `worker` subcommand of the given executable
    pub fn new() -> Self {
        Self {
            args: vec!["worker".to_string()],
        }
    }

    /// Replace the arguments passed to the worker executable
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ProcessWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkerInvoker for ProcessWorker {
    async fn invoke(&self, worker_ref: &str, payload: &str) -> Result<String> {
        debug!("Spawning worker process: {} {:?}", worker_ref, self.args);

        let mut child = Command::new(worker_ref)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::Worker {
                worker: worker_ref.to_string(),
                message: format!("failed to spawn: {e}"),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A worker that exits early closes its end; its exit status says why
            if let Err(e) = stdin.write_all(payload.as_bytes()).await {
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(EngineError::Worker {
                worker: worker_ref.to_string(),
                message: format!(
                    "exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        String::from_utf8(output.stdout)
            .map_err(|e| EngineError::Transport(format!("worker output is not UTF-8: {e}")))
    }
}
