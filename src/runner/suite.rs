//! Suite orchestration
//!
//! The coordinator: validates a whole configuration, runs global setup,
//! delegates every batch to a worker, runs global teardown and hands the
//! result to the results store.

use chrono::{DateTime, Utc};
use tracing::{error, info};

use super::{ActionRunner, BatchDelegator};
use crate::error::EngineError;
use crate::models::{DataError, SuiteConfig, SuiteResult};
use crate::results::ResultsStorage;
use crate::utils::timer::Timer;
use crate::validation::Validator;

/// Unique id for one suite execution: timestamp plus a random suffix
pub fn generate_execution_id() -> String {
    execution_id(Utc::now(), rand::random::<u32>() % 10000)
}

fn execution_id(at: DateTime<Utc>, suffix: u32) -> String {
    format!("{}-{:04}", at.format("%Y-%m-%d-%H-%M-%S-%3f"), suffix)
}

/// Runs a suite configuration end to end
pub struct SuiteRunner {
    actions: ActionRunner,
    delegator: BatchDelegator,
    worker_ref: String,
    storage: Option<ResultsStorage>,
}

impl SuiteRunner {
    pub fn new(actions: ActionRunner, delegator: BatchDelegator, worker_ref: impl Into<String>) -> Self {
        Self {
            actions,
            delegator,
            worker_ref: worker_ref.into(),
            storage: None,
        }
    }

    /// Persist every result to `storage`
    pub fn with_storage(mut self, storage: ResultsStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Run a suite. `config` is the outcome of loading the configuration;
    /// a load error becomes a failed result rather than an `Err`.
    pub async fn run(&self, config: Result<SuiteConfig, EngineError>) -> SuiteResult {
        let mut result = SuiteResult::new(generate_execution_id());
        info!("Running test suite with Test Execution ID '{}'.", result.id);
        let timer = Timer::start(format!("Suite '{}'", result.id));

        match config {
            Ok(config) => self.execute(config, &mut result).await,
            Err(err) => {
                error!("Failed to get configuration: {}", err);
                result.error = Some(err.into());
                result.fail("Test Failure: Failed to get configuration.");
            }
        }

        timer.stop();
        info!("Result Summary: {:?}", result.summary());
        self.store(&result);
        result
    }

    async fn execute(&self, config: SuiteConfig, result: &mut SuiteResult) {
        result.config = Some(config.clone());

        let errors = Validator::new(self.actions.registry()).suite(&config);
        if !errors.is_empty() {
            let err = DataError::with_messages(
                format!("Test configuration contains {} validation error(s).", errors.len()),
                errors.clone(),
            );
            info!("WARNING: GLOBAL ERROR CAUGHT");
            error!("{}", err.message);
            for message in &errors {
                info!("{}", message);
            }
            result.config_validation_errors = Some(errors);
            result.error = Some(err);
            result.fail("Test Failed: Configuration is invalid.");
            return;
        }

        let SuiteConfig {
            setup_actions,
            test_batches,
            teardown_actions,
            ..
        } = config;

        if !setup_actions.is_empty() {
            info!("Running global setup.");
            let count = setup_actions.len();
            let setup = self.actions.perform_actions(Some(setup_actions)).await;
            if !setup.success {
                result.fail("Setup failed.");
            }
            result.setup = Some(setup);
            info!("Ran {} setup action(s).", count);
        }

        if result.success {
            info!("Running test batches.");
            let count = test_batches.len();
            let batches = self
                .delegator
                .delegate_executions(Some(test_batches), Some(result.id.as_str()), &self.worker_ref)
                .await;
            if !batches.success {
                result.fail("One or more test batches failed.");
            }
            result.test_batches = Some(batches);
            info!("Ran {} test batch(es).", count);
        }

        if !teardown_actions.is_empty() {
            info!("Running global teardown.");
            let count = teardown_actions.len();
            let teardown = self.actions.perform_actions(Some(teardown_actions)).await;
            if !teardown.success {
                result.fail("Teardown failed.");
            }
            result.teardown = Some(teardown);
            info!("Ran {} teardown action(s).", count);
        }

        if result.success {
            result.message = Some("Test Success".to_string());
        }
    }

    /// Write the result; a failed write is logged, never fatal
    fn store(&self, result: &SuiteResult) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(err) = storage.save(result) {
            error!("Failed to write results: {}", err);
        }
    }
}
