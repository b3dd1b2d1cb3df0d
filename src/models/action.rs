//! Action model
//!
//! An action is one call to an executor, with an optional assertion on its
//! outcome and an optional retry policy. The runner records every attempt on
//! the action itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::DataError;
use crate::utils::json::non_negative;

/// Message attached to actions rejected by validation
pub const ACTION_VALIDATION_FAILED: &str = "Action config validation failed.";

/// A single declarative action
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Executor type name, matched case-insensitively
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub params: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_response: Option<ExpectedResponse>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<ExpectedError>,

    /// Retry settings stay raw so validation can report malformed values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_wait_ms: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_num_retries: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_between_retries_ms: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ActionResult>,
}

/// Assertion on a successful executor response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_type: Option<String>,
}

/// Assertion on an executor failure
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_type: Option<String>,
}

/// Outcome of exactly one execution attempt
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<DataError>,

    #[serde(default)]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AttemptOutcome {
    pub fn succeeded(response: Option<Value>, error: Option<DataError>) -> Self {
        Self {
            response,
            error,
            success: true,
            message: None,
        }
    }

    pub fn failed(
        response: Option<Value>,
        error: Option<DataError>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            response,
            error,
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Attempt history plus the fields of the terminal attempt
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_attempts: Option<Vec<AttemptOutcome>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<DataError>,

    #[serde(default)]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResult {
    /// Number of failed attempts recorded so far
    pub fn attempts_failed(&self) -> usize {
        self.failed_attempts.as_ref().map_or(0, Vec::len)
    }

    /// Merge the terminal attempt's fields onto the result. Fields the
    /// attempt did not set are left untouched.
    pub fn merge(&mut self, outcome: AttemptOutcome) {
        self.success = outcome.success;
        if outcome.response.is_some() {
            self.response = outcome.response;
        }
        if outcome.error.is_some() {
            self.error = outcome.error;
        }
        if outcome.message.is_some() {
            self.message = outcome.message;
        }
    }
}

impl Action {
    pub fn new(action_type: impl Into<String>, params: Value) -> Self {
        Self {
            action_type: Some(action_type.into()),
            params,
            ..Default::default()
        }
    }

    pub fn expect_response(mut self, response: Value, comparison_type: &str) -> Self {
        self.expected_response = Some(ExpectedResponse {
            response: Some(response),
            comparison_type: Some(comparison_type.to_string()),
        });
        self
    }

    pub fn expect_error(mut self, error: Value, comparison_type: &str) -> Self {
        self.expected_error = Some(ExpectedError {
            error: Some(error),
            comparison_type: Some(comparison_type.to_string()),
        });
        self
    }

    pub fn with_retries(mut self, max_num_retries: u64, wait_between_retries_ms: u64) -> Self {
        self.max_num_retries = Some(max_num_retries.into());
        self.wait_between_retries_ms = Some(wait_between_retries_ms.into());
        self
    }

    pub fn with_initial_wait(mut self, initial_wait_ms: u64) -> Self {
        self.initial_wait_ms = Some(initial_wait_ms.into());
        self
    }

    /// The shape an action collapses to when it fails validation: only the
    /// result survives.
    pub fn rejected(errors: Vec<String>) -> Self {
        Self {
            result: Some(ActionResult {
                error: Some(DataError::with_messages(ACTION_VALIDATION_FAILED, errors)),
                success: false,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn type_name(&self) -> &str {
        self.action_type.as_deref().unwrap_or("")
    }

    pub fn has_failed_attempts(&self) -> bool {
        self.result
            .as_ref()
            .map_or(false, |r| r.attempts_failed() > 0)
    }

    pub fn initial_wait(&self) -> Option<Duration> {
        non_negative(self.initial_wait_ms.as_ref()).map(Duration::from_millis)
    }

    pub fn wait_between_retries(&self) -> Option<Duration> {
        non_negative(self.wait_between_retries_ms.as_ref()).map(Duration::from_millis)
    }

    /// Configured retry budget; unset, zero or invalid means no retries
    pub fn retry_budget(&self) -> usize {
        non_negative(self.max_num_retries.as_ref())
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0)
    }

    /// Whether the action carries a successful terminal result
    pub fn succeeded(&self) -> bool {
        self.result.as_ref().map_or(false, |r| r.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_camel_case() {
        let action: Action = serde_json::from_value(json!({
            "type": "dynamoGet",
            "params": {"TableName": "users"},
            "expectedResponse": {"response": {"Item": {}}, "comparisonType": "equals"},
            "maxNumRetries": 2,
            "waitBetweenRetriesMs": "50"
        }))
        .unwrap();

        assert_eq!(action.type_name(), "dynamoGet");
        assert_eq!(action.retry_budget(), 2);
        assert_eq!(action.wait_between_retries(), Some(Duration::from_millis(50)));
        assert_eq!(
            action.expected_response.unwrap().comparison_type.as_deref(),
            Some("equals")
        );
    }

    #[test]
    fn test_retry_budget_defaults() {
        let action = Action::new("x", json!({}));
        assert_eq!(action.retry_budget(), 0);
        assert!(action.initial_wait().is_none());

        let negative = Action {
            max_num_retries: Some(json!(-3)),
            ..Action::new("x", json!({}))
        };
        assert_eq!(negative.retry_budget(), 0);
    }

    #[test]
    fn test_merge_keeps_history() {
        let mut result = ActionResult {
            failed_attempts: Some(vec![AttemptOutcome::failed(None, None, "first")]),
            ..Default::default()
        };
        result.merge(AttemptOutcome::succeeded(Some(json!({"ok": true})), None));

        assert!(result.success);
        assert_eq!(result.attempts_failed(), 1);
        assert_eq!(result.response, Some(json!({"ok": true})));
        assert!(result.message.is_none());
    }

    #[test]
    fn test_rejected_discards_fields() {
        let action = Action::rejected(vec!["bad".into()]);
        assert!(action.action_type.is_none());
        let result = action.result.unwrap();
        assert!(!result.success);
        assert!(result.failed_attempts.is_none());
        assert_eq!(result.error.unwrap().message, ACTION_VALIDATION_FAILED);
    }
}
