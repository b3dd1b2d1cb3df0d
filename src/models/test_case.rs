//! Test and test result models

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Action, ActionSetResult, DataError};

/// Test name reported when a test has none
pub const NO_NAME_FOUND: &str = "no-name-found";

/// A test: setup, test actions and teardown, run top-down
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_actions: Option<Vec<Option<Action>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_actions: Option<Vec<Option<Action>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teardown_actions: Option<Vec<Option<Action>>>,
}

impl Test {
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

    pub fn actions(mut self, actions: Vec<Action>) -> Self {
        self.test_actions = Some(actions.into_iter().map(Some).collect());
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

/// Result of running one test
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub test_name: String,

    pub success: bool,

    #[serde(default)]
    pub error: Option<DataError>,

    #[serde(default)]
    pub message: Option<String>,

    /// `None` when the phase was skipped
    #[serde(default)]
    pub setup: Option<ActionSetResult>,

    #[serde(default)]
    pub test_actions: Option<ActionSetResult>,

    #[serde(default)]
    pub teardown: Option<ActionSetResult>,
}

impl TestResult {
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            success: true,
            error: None,
            message: None,
            setup: None,
            test_actions: None,
            teardown: None,
        }
    }

    /// Record a phase failure; later failures overwrite the message
    pub fn fail(&mut self, message: impl Into<String>) {
        self.success = false;
        self.message = Some(message.into());
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = if self.success { "✓" } else { "✗" };
        write!(f, "{} {}", symbol, self.test_name)?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}
