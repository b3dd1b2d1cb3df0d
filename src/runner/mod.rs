//! Execution engine
//!
//! Runners for every level of the hierarchy, leaves first:
//! actions, tests, batches (worker side and delegation), suites.
//! Every runner is total: failures end up in the returned result object.

mod action;
mod batch;
mod suite;

pub use action::ActionRunner;
pub use batch::{BatchDelegator, BatchRunner};
pub use suite::{generate_execution_id, SuiteRunner};
pub use test::TestRunner;
