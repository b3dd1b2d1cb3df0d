//! Engine error types
//!
//! `EngineError` covers the fallible plumbing around the engine (config
//! loading, worker transport, result persistence). Runners themselves never
//! fail: they fold every failure into a result object.

use thiserror::Error;

/// Errors raised outside the structured result path
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Worker '{worker}' failed: {message}")]
    Worker { worker: String, message: String },
}

impl EngineError {
    /// Short, stable name used when the error is recorded in a result
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Config(_) => "ConfigError",
            EngineError::Io(_) => "IoError",
            EngineError::Json(_) => "JsonError",
            EngineError::Yaml(_) => "YamlError",
            EngineError::Transport(_) => "TransportError",
            EngineError::Worker { .. } => "WorkerError",
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        assert_eq!(EngineError::Config("x".into()).kind(), "ConfigError");
        let err = EngineError::Worker {
            worker: "w".into(),
            message: "exit 1".into(),
        };
        assert_eq!(err.kind(), "WorkerError");
        assert_eq!(err.to_string(), "Worker 'w' failed: exit 1");
    }
}
