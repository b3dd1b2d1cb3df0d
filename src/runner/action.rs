//! Action runner
//!
//! Executes one action with retry and expected-result checks, and folds
//! ordered action lists into an [`ActionSetResult`].

use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, error};

use crate::actions::ExecutorRegistry;
use crate::compare::is_expected;
use crate::models::{Action, ActionSetResult, AttemptOutcome, DataError};
use crate::validation::Validator;

/// Comparison mode used when an expectation names none
const DEFAULT_COMPARISON: &str = "contains-same-values";

/// Runs actions against a shared executor registry
#[derive(Clone)]
pub struct ActionRunner {
    registry: Arc<ExecutorRegistry>,
}

impl ActionRunner {
    pub fn new(registry: Arc<ExecutorRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ExecutorRegistry {
        &self.registry
    }

    /// Perform one action, retrying failed attempts up to `maxNumRetries`
    /// times. The returned action carries its attempt history in `result`.
    pub async fn perform_action(&self, mut action: Action) -> Action {
        if !action.has_failed_attempts() {
            let errors = Validator::new(&self.registry).action(Some(&action), None);
            if !errors.is_empty() {
                debug!("Action rejected with {} validation error(s).", errors.len());
                return Action::rejected(errors);
            }
        }

        let mut result = action.result.take().unwrap_or_default();
        let history = result.failed_attempts.get_or_insert_with(Vec::new);
        let max_retries = action.retry_budget();

        if history.is_empty() {
            if let Some(wait) = action.initial_wait() {
                debug!("Initial wait period: {}ms.", wait.as_millis());
                sleep(wait).await;
            }
        }

        loop {
            let outcome = self.attempt(&action).await;

            if outcome.success || result.attempts_failed() >= max_retries {
                result.merge(outcome);
                action.result = Some(result);
                return action;
            }

            debug!("Action failed. Retrying...");
            result.failed_attempts.get_or_insert_with(Vec::new).push(outcome);

            if let Some(wait) = action.wait_between_retries() {
                debug!("Waiting before retry: {}ms.", wait.as_millis());
                sleep(wait).await;
            }
        }
    }

    /// One executor call plus the expectation check
    async fn attempt(&self, action: &Action) -> AttemptOutcome {
        debug!("Running action {}.", action.type_name());

        let executed = match self.registry.get(action.type_name()) {
            Some(executor) => executor.execute(&action.params).await,
            None => Err(DataError::new(
                "Error",
                format!("No action executor registered for '{}'.", action.type_name()),
            )),
        };

        match executed {
            Ok(response) => {
                if let Some(expected) = &action.expected_response {
                    debug!("Validating action result against expected response.");
                    let mode = expected.comparison_type.as_deref().unwrap_or(DEFAULT_COMPARISON);
                    if is_expected(Some(&response), expected.response.as_ref(), mode) {
                        AttemptOutcome::succeeded(Some(response), None)
                    } else {
                        AttemptOutcome::failed(
                            Some(response),
                            None,
                            "Comparison with expected response failed.",
                        )
                    }
                } else if action.expected_error.is_some() {
                    debug!("Action succeeded, but expected an error.");
                    AttemptOutcome::failed(Some(response), None, "Action succeeded, but expected an error.")
                } else {
                    AttemptOutcome::succeeded(Some(response), None)
                }
            }
            Err(err) => {
                if let Some(expected) = &action.expected_error {
                    debug!("Validating action error against expected error.");
                    let mode = expected.comparison_type.as_deref().unwrap_or(DEFAULT_COMPARISON);
                    if is_expected(Some(&err.to_value()), expected.error.as_ref(), mode) {
                        AttemptOutcome::succeeded(None, Some(err))
                    } else {
                        AttemptOutcome::failed(None, Some(err), "Comparison with expected error failed.")
                    }
                } else {
                    error!("Unexpected error executing action: {}", err);
                    AttemptOutcome::failed(None, Some(err), "Unexpected error executing action.")
                }
            }
        }
    }

    /// Perform actions in order; a missing list is an empty, successful set
    /// and a missing entry is rejected like any other invalid action
    pub async fn perform_actions(&self, actions: Option<Vec<Option<Action>>>) -> ActionSetResult {
        let mut results = ActionSetResult::new();
        for action in actions.unwrap_or_default() {
            let performed = match action {
                Some(action) => self.perform_action(action).await,
                None => Action::rejected(Validator::new(&self.registry).action(None, None)),
            };
            let succeeded = performed.succeeded();
            results.record(performed, succeeded);
        }
        results
    }
}
