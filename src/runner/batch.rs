//! Test batch execution
//!
//! [`BatchRunner`] is the worker side: it runs one batch in the current
//! process. [`BatchDelegator`] is the coordinator side: it validates a batch
//! and hands it to a worker through a [`WorkerInvoker`].

use std::sync::Arc;
use tracing::{debug, error, info};

use super::TestRunner;
use crate::actions::ExecutorRegistry;
use crate::error::EngineError;
use crate::models::{BatchResult, BatchSetResult, DataError, TestBatch, NO_NAME_FOUND};
use crate::utils::timer::Timer;
use crate::validation::Validator;
use crate::worker::WorkerInvoker;

const BATCH_MISSING: &str = "Test Batch is undefined or empty.";
const GLOBAL_ERROR: &str = "Test Batch Failure: Caught global error.";

/// Runs a batch in-process
#[derive(Clone)]
pub struct BatchRunner {
    tests: TestRunner,
}

impl BatchRunner {
    pub fn new(tests: TestRunner) -> Self {
        Self { tests }
    }

    /// Validate and run a batch: setup, tests, then teardown
    pub async fn run_batch(&self, batch: Option<TestBatch>) -> BatchResult {
        let Some(batch) = batch else {
            let mut result = BatchResult::new(NO_NAME_FOUND);
            let err = DataError::new("Error", BATCH_MISSING);
            log_global_error(&err);
            result.error = Some(err);
            result.fail(GLOBAL_ERROR);
            log_summary(&result);
            return result;
        };

        let mut result = BatchResult::new(batch.display_name());
        info!(
            "Running test batch: {} with Test Execution ID {}.",
            batch.display_name(),
            batch.execution_id.as_deref().unwrap_or("none")
        );
        let timer = Timer::start(format!("Batch '{}'", batch.display_name()));

        let actions = self.tests.action_runner();
        let errors = Validator::new(actions.registry()).test_batch(Some(&batch));
        if !errors.is_empty() {
            let err = DataError::with_messages(
                format!("Test configuration contains {} validation error(s).", errors.len()),
                errors.clone(),
            );
            log_global_error(&err);
            result.validation_errors = Some(errors);
            result.error = Some(err);
            result.fail("Test Batch Failed: Configuration is invalid.");
            log_summary(&result);
            return result;
        }

        let TestBatch {
            setup_actions,
            tests,
            teardown_actions,
            ..
        } = batch;

        if let Some(setup_actions) = setup_actions.filter(|a| !a.is_empty()) {
            info!("Running batch setup.");
            let count = setup_actions.len();
            let setup = actions.perform_actions(Some(setup_actions)).await;
            if !setup.success {
                result.fail("Setup failed");
            }
            result.setup = Some(setup);
            info!("Ran {} setup actions.", count);
        }

        if result.success {
            info!("Running tests.");
            let count = tests.as_ref().map_or(0, Vec::len);
            let test_results = self.tests.run_tests(tests).await;
            if !test_results.success {
                result.fail("Test(s) failed");
            }
            result.tests = Some(test_results);
            info!("Ran {} tests.", count);
        }

        if let Some(teardown_actions) = teardown_actions.filter(|a| !a.is_empty()) {
            info!("Running batch teardown.");
            let count = teardown_actions.len();
            let teardown = actions.perform_actions(Some(teardown_actions)).await;
            if !teardown.success {
                result.fail("Teardown failed");
            }
            result.teardown = Some(teardown);
            info!("Ran {} teardown actions.", count);
        }

        if result.success {
            result.message = Some("Test Success".to_string());
        }

        timer.stop();
        log_summary(&result);
        result
    }
}

fn log_global_error(err: &DataError) {
    info!("WARNING: GLOBAL ERROR CAUGHT");
    error!("{}", err.message);
    for message in err.messages() {
        info!("{}", message);
    }
}

fn log_summary(result: &BatchResult) {
    info!("Result Summary for batch {}: {:?}", result.name(), result.summary());
}

/// Hands batches to workers and collects their results
#[derive(Clone)]
pub struct BatchDelegator {
    invoker: Arc<dyn WorkerInvoker>,
    registry: Arc<ExecutorRegistry>,
}

impl BatchDelegator {
    /// Batches are validated against `registry` before they are sent
    pub fn new(invoker: Arc<dyn WorkerInvoker>, registry: Arc<ExecutorRegistry>) -> Self {
        Self { invoker, registry }
    }

    /// Validate `batch`, then run it on the worker `worker_ref` and return the
    /// worker's result unchanged
    pub async fn delegate_execution(&self, batch: Option<TestBatch>, worker_ref: &str) -> BatchResult {
        let batch_name = batch
            .as_ref()
            .map_or(NO_NAME_FOUND, TestBatch::display_name)
            .to_string();
        let errors = Validator::new(&self.registry).test_batch(batch.as_ref());
        let batch = match batch {
            Some(batch) if errors.is_empty() => batch,
            _ => {
                return BatchResult::not_run(
                    batch_name,
                    DataError::with_messages(
                        "Failed to run test batch. Test batch contains validation errors.",
                        errors,
                    ),
                    "Test batch contains validation errors.",
                );
            }
        };

        debug!("Executing {} using {}.", batch_name, worker_ref);
        match self.invoke(&batch, worker_ref).await {
            Ok(result) => result,
            Err(err) => {
                error!("Unexpected error executing batch {}: {}", batch_name, err);
                BatchResult::not_run(batch_name, err.into(), "Unexpected error executing batch.")
            }
        }
    }

    async fn invoke(&self, batch: &TestBatch, worker_ref: &str) -> Result<BatchResult, EngineError> {
        let payload = serde_json::to_string(batch)?;
        let raw = self.invoker.invoke(worker_ref, &payload).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Delegate batches in order, stamping each with `suite_id` when given
    pub async fn delegate_executions(
        &self,
        batches: Option<Vec<Option<TestBatch>>>,
        suite_id: Option<&str>,
        worker_ref: &str,
    ) -> BatchSetResult {
        let mut results = BatchSetResult::new();
        for mut batch in batches.unwrap_or_default() {
            if let (Some(batch), Some(id)) = (batch.as_mut(), suite_id) {
                batch.execution_id = Some(id.to_string());
            }

            let result = self.delegate_execution(batch, worker_ref).await;
            let succeeded = result.success;
            results.record(result, succeeded);
        }
        results
    }
}
