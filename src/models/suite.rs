//! Suite-level configuration and result models

use serde::{Deserialize, Serialize};

use super::{Action, ActionSetResult, BatchSetResult, DataError, PhaseCounts, TestBatch};

/// Whole test configuration: global setup, batches, global teardown
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteConfig {
    #[serde(default)]
    pub setup_actions: Vec<Option<Action>>,

    #[serde(default)]
    pub test_batches: Vec<Option<TestBatch>>,

    #[serde(default)]
    pub teardown_actions: Vec<Option<Action>>,

    /// Configuration files that could not be parsed, with the reason
    #[serde(skip)]
    pub load_errors: Vec<String>,
}

impl SuiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn setup(mut self, actions: Vec<Action>) -> Self {
        self.setup_actions = actions.into_iter().map(Some).collect();
        self
    }

    pub fn batches(mut self, batches: Vec<TestBatch>) -> Self {
        self.test_batches = batches.into_iter().map(Some).collect();
        self
    }

    pub fn teardown(mut self, actions: Vec<Action>) -> Self {
        self.teardown_actions = actions.into_iter().map(Some).collect();
        self
    }

    /// Append another configuration fragment
    pub fn extend(&mut self, other: SuiteConfig) {
        self.setup_actions.extend(other.setup_actions);
        self.test_batches.extend(other.test_batches);
        self.teardown_actions.extend(other.teardown_actions);
        self.load_errors.extend(other.load_errors);
    }
}

/// Result of one suite execution, written to the result sink
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteResult {
    pub id: String,

    #[serde(default)]
    pub config: Option<SuiteConfig>,

    #[serde(default)]
    pub config_validation_errors: Option<Vec<String>>,

    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub error: Option<DataError>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub setup: Option<ActionSetResult>,

    #[serde(default)]
    pub test_batches: Option<BatchSetResult>,

    #[serde(default)]
    pub teardown: Option<ActionSetResult>,
}

impl SuiteResult {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            config: None,
            config_validation_errors: None,
            success: true,
            error: None,
            message: None,
            setup: None,
            test_batches: None,
            teardown: None,
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.success = false;
        self.message = Some(message.into());
    }

    pub fn summary(&self) -> SuiteSummary {
        SuiteSummary {
            success: self.success,
            message: self.message.clone(),
            error: self.error.clone(),
            setup: PhaseCounts::of(self.setup.as_ref()),
            test_batches: PhaseCounts::of(self.test_batches.as_ref()),
            teardown: PhaseCounts::of(self.teardown.as_ref()),
        }
    }
}

/// Per-phase counts of a suite execution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteSummary {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<DataError>,
    pub setup: PhaseCounts,
    pub test_batches: PhaseCounts,
    pub teardown: PhaseCounts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extend_concatenates() {
        let mut config = SuiteConfig::new().batches(vec![TestBatch::new("a", "d")]);
        let mut other = SuiteConfig::new()
            .setup(vec![Action::new("httpRequest", json!({}))])
            .batches(vec![TestBatch::new("b", "d")]);
        other.load_errors.push("broken.json".to_string());
        config.extend(other);

        assert_eq!(config.setup_actions.len(), 1);
        let names: Vec<_> = config
            .test_batches
            .iter()
            .flatten()
            .map(|b| b.display_name())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(config.load_errors, vec!["broken.json"]);
    }

    #[test]
    fn test_null_batches_are_kept() {
        let config: SuiteConfig = serde_json::from_value(json!({
            "setupActions": [null],
            "testBatches": [{"name": "a"}, null]
        }))
        .unwrap();
        assert_eq!(config.setup_actions, vec![None]);
        assert!(config.test_batches[1].is_none());
    }

    #[test]
    fn test_summary_counts_missing_phases_as_zero() {
        let result = SuiteResult::new("id");
        let summary = result.summary();
        assert!(summary.success);
        assert_eq!(summary.test_batches, PhaseCounts::default());
    }
}
