//! Completed/failed partition shared by every aggregation level

use serde::{Deserialize, Serialize};

use super::{Action, BatchResult, TestResult};

/// Ordered partition of executed items into completed and failed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ResultSet<T> {
    #[serde(default)]
    pub completed: Vec<T>,

    #[serde(default)]
    pub failed: Vec<T>,

    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

pub type ActionSetResult = ResultSet<Action>;
pub type TestSetResult = ResultSet<TestResult>;
pub type BatchSetResult = ResultSet<BatchResult>;

impl<T> ResultSet<T> {
    /// Empty, successful set
    pub fn new() -> Self {
        Self {
            completed: Vec::new(),
            failed: Vec::new(),
            success: true,
        }
    }

    /// Record an item, keeping `success == failed.is_empty()`
    pub fn record(&mut self, item: T, succeeded: bool) {
        if succeeded {
            self.completed.push(item);
        } else {
            self.failed.push(item);
            self.success = false;
        }
    }

    pub fn total(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    pub fn counts(&self) -> PhaseCounts {
        PhaseCounts {
            completed: self.completed.len(),
            failed: self.failed.len(),
        }
    }
}

impl<T> Default for ResultSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Completed/failed counts of one phase, used in result summaries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCounts {
    pub completed: usize,
    pub failed: usize,
}

impl PhaseCounts {
    pub fn of<T>(set: Option<&ResultSet<T>>) -> Self {
        set.map(ResultSet::counts).unwrap_or_default()
    }
}
