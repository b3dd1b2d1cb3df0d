//! Test batch and batch result models

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Action, ActionSetResult, DataError, PhaseCounts, Test, TestSetResult, NO_NAME_FOUND};

/// A named group of tests sharing setup and teardown, run by one worker
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestBatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_actions: Option<Vec<Option<Action>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<Option<Test>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teardown_actions: Option<Vec<Option<Action>>>,

    /// Suite execution this batch belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
}

impl TestBatch {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
            ..Default::default()
        }
    }

    pub fn setup(mut self, actions: Vec<Action>) -> Self {
        self.setup_actions = Some(actions.into_iter().map(Some).collect());
        self
    }

    pub fn tests(mut self, tests: Vec<Test>) -> Self {
        self.tests = Some(tests.into_iter().map(Some).collect());
        self
    }

    pub fn teardown(mut self, actions: Vec<Action>) -> Self {
        self.teardown_actions = Some(actions.into_iter().map(Some).collect());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(NO_NAME_FOUND)
    }
}

/// Result of running one batch, as returned by a worker
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    #[serde(default)]
    pub batch_name: Option<String>,

    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub error: Option<DataError>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub setup: Option<ActionSetResult>,

    #[serde(default)]
    pub tests: Option<TestSetResult>,

    #[serde(default)]
    pub teardown: Option<ActionSetResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<String>>,
}

impl BatchResult {
    /// Result with nothing recorded yet
    pub fn new(batch_name: impl Into<String>) -> Self {
        Self {
            batch_name: Some(batch_name.into()),
            success: true,
            error: None,
            message: None,
            setup: None,
            tests: None,
            teardown: None,
            validation_errors: None,
        }
    }

    /// Canned failure with empty phase results, used when a batch never ran
    pub fn not_run(
        batch_name: impl Into<String>,
        error: DataError,
        message: impl Into<String>,
    ) -> Self {
        Self {
            batch_name: Some(batch_name.into()),
            success: false,
            error: Some(error),
            message: Some(message.into()),
            setup: Some(ActionSetResult::new()),
            tests: Some(TestSetResult::new()),
            teardown: Some(ActionSetResult::new()),
            validation_errors: None,
        }
    }

    /// Record a phase failure; later failures overwrite the message
    pub fn fail(&mut self, message: impl Into<String>) {
        self.success = false;
        self.message = Some(message.into());
    }

    pub fn name(&self) -> &str {
        self.batch_name.as_deref().unwrap_or(NO_NAME_FOUND)
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            success: self.success,
            message: self.message.clone(),
            error: self.error.clone(),
            setup: PhaseCounts::of(self.setup.as_ref()),
            tests: PhaseCounts::of(self.tests.as_ref()),
            teardown: PhaseCounts::of(self.teardown.as_ref()),
        }
    }
}

impl fmt::Display for BatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = if self.success { "✓" } else { "✗" };
        write!(f, "{} {}", symbol, self.name())?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Per-phase counts logged at the end of a batch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<DataError>,
    pub setup: PhaseCounts,
    pub tests: PhaseCounts,
    pub teardown: PhaseCounts,
}
