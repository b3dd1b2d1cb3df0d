//! Data models for declarative functional tests
//!
//! Actions, tests, batches and suites as they appear in configuration, plus
//! the result objects each level produces. Everything serializes as
//! camelCase JSON.

mod action;
mod batch;
mod error;
mod result_set;
mod suite;
mod test_case;

pub use action::{
    Action, ActionResult, AttemptOutcome, ExpectedError, ExpectedResponse,
    ACTION_VALIDATION_FAILED,
};
pub use batch::{BatchResult, BatchSummary, TestBatch};
pub use error::DataError;
pub use result_set::{ActionSetResult, BatchSetResult, PhaseCounts, ResultSet, TestSetResult};
pub use suite::{SuiteConfig, SuiteResult, SuiteSummary};
pub use test_case::{Test, TestResult, NO_NAME_FOUND};
