//! Local command executor

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::{parse_params, ActionExecutor};
use crate::models::DataError;

#[derive(Debug, Deserialize)]
struct CommandParams {
    program: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    stdin: Option<String>,
    #[serde(default)]
    env: BTreeMap<String, String>,
}

/// `shellCommand`: `{program, args?, stdin?, env?}` → `{exitCode, stdout, stderr}`
pub struct ShellCommandExecutor;

#[async_trait]
impl ActionExecutor for ShellCommandExecutor {
    async fn execute(&self, params: &Value) -> Result<Value, DataError> {
        let params: CommandParams = parse_params(params, &["program"])?;
        debug!("shellCommand: {} {:?}", params.program, params.args);

        let mut child = Command::new(&params.program)
            .args(&params.args)
            .envs(&params.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DataError::new("CommandError", format!("Failed to spawn '{}': {e}", params.program))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Some(input) = &params.stdin {
                stdin
                    .write_all(input.as_bytes())
                    .await
                    .map_err(|e| DataError::new("CommandError", format!("Failed to write stdin: {e}")))?;
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| DataError::new("CommandError", e.to_string()))?;

        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(DataError::new(
                "CommandError",
                format!("Command exited with code {exit_code}"),
            )
            .with_field("exitCode", exit_code)
            .with_field("stdout", stdout)
            .with_field("stderr", stderr));
        }

        Ok(json!({
            "exitCode": exit_code,
            "stdout": stdout,
            "stderr": stderr,
        }))
    }
}
