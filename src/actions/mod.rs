//! Action executors
//!
//! An executor performs the real work behind an action type. Executors are
//! looked up by lower-cased type name in an [`ExecutorRegistry`], which is
//! assembled once at startup and shared read-only by the runners.

mod command;
mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use command::ShellCommandExecutor;
pub use http::{GraphQlExecutor, HttpRequestExecutor};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::models::{DataError, ACTION_VALIDATION_FAILED};

/// Performs one action type given its parameters
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Execute with the action's `params`; the error is what `expectedError`
    /// is compared against
    async fn execute(&self, params: &Value) -> Result<Value, DataError>;
}

/// Mapping from lower-cased action type to executor
#[derive(Clone, Default)]
pub struct ExecutorRegistry {
    executors: BTreeMap<String, Arc<dyn ActionExecutor>>,
}

impl ExecutorRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in executors
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("httpRequest", Arc::new(HttpRequestExecutor::new()));
        registry.register("queryGraphQlApi", Arc::new(GraphQlExecutor::new()));
        registry.register("shellCommand", Arc::new(ShellCommandExecutor));
        registry
    }

    /// Built-in executors with a custom HTTP timeout
    pub fn with_http_timeout(timeout_secs: u64) -> Self {
        Self::with_defaults()
            .with(
                "httpRequest",
                Arc::new(HttpRequestExecutor::new().with_timeout(timeout_secs)),
            )
            .with(
                "queryGraphQlApi",
                Arc::new(GraphQlExecutor::new().with_timeout(timeout_secs)),
            )
    }

    /// Register an executor, replacing any previous one with the same name
    pub fn register(&mut self, action_type: &str, executor: Arc<dyn ActionExecutor>) {
        debug!("Registering action executor: {}", action_type);
        self.executors.insert(action_type.to_lowercase(), executor);
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, action_type: &str, executor: Arc<dyn ActionExecutor>) -> Self {
        self.register(action_type, executor);
        self
    }

    pub fn unregister(&mut self, action_type: &str) -> Option<Arc<dyn ActionExecutor>> {
        self.executors.remove(&action_type.to_lowercase())
    }

    pub fn get(&self, action_type: &str) -> Option<Arc<dyn ActionExecutor>> {
        self.executors.get(&action_type.to_lowercase()).cloned()
    }

    pub fn contains(&self, action_type: &str) -> bool {
        self.executors.contains_key(&action_type.to_lowercase())
    }

    /// Registered type names, lower-cased and sorted
    pub fn names(&self) -> Vec<&str> {
        self.executors.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.executors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }
}

/// Deserialize executor params, reporting missing required fields the same
/// way every executor does
pub(crate) fn parse_params<T: DeserializeOwned>(
    params: &Value,
    required: &[&str],
) -> Result<T, DataError> {
    let errors: Vec<String> = required
        .iter()
        .filter(|key| params.get(**key).map_or(true, Value::is_null))
        .map(|key| format!("Missing required parameter: {key}"))
        .collect();
    if !errors.is_empty() {
        return Err(DataError::with_messages(ACTION_VALIDATION_FAILED, errors));
    }

    serde_json::from_value(params.clone()).map_err(|e| {
        DataError::with_messages(ACTION_VALIDATION_FAILED, vec![format!("Invalid parameters: {e}")])
    })
}

#[cfg(test)]
mod tests {
    use super::mock::ScriptedExecutor;
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_registry_is_case_insensitive() {
        let registry = ExecutorRegistry::new().with("dynamoGet", Arc::new(ScriptedExecutor::ok(json!({}))));

        assert!(registry.contains("DYNAMOGET"));
        assert!(registry.get("dynamoget").is_some());
        assert_eq!(registry.names(), vec!["dynamoget"]);
    }

    #[test]
    fn test_register_and_unregister() {
        let mut registry = ExecutorRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec!["httprequest", "querygraphqlapi", "shellcommand"]
        );

        assert!(registry.unregister("ShellCommand").is_some());
        assert!(!registry.contains("shellCommand"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_http_timeout_keeps_builtin_names() {
        let registry = ExecutorRegistry::with_http_timeout(5);
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("httpRequest"));
    }

    #[derive(Deserialize)]
    struct Params {
        url: String,
    }

    #[test]
    fn test_parse_params_reports_missing() {
        let err = parse_params::<Params>(&json!({"url": null}), &["url"]).err().unwrap();
        assert_eq!(err.message, ACTION_VALIDATION_FAILED);
        assert_eq!(err.messages(), vec!["Missing required parameter: url"]);

        let ok: Params = parse_params(&json!({"url": "http://x"}), &["url"]).unwrap();
        assert_eq!(ok.url, "http://x");
    }
}
