//! Configuration validation
//!
//! One validator per level of the hierarchy. Each returns an ordered list of
//! human-readable errors prefixed with a `|`-joined scope chain such as
//! `Batch:orders|Test:create`. Validators are pure: they never execute
//! anything and return the same list for the same input.

use serde_json::Value;

use crate::actions::ExecutorRegistry;
use crate::compare::{ComparisonMode, COMPARISON_TYPES};
use crate::models::{Action, SuiteConfig, Test, TestBatch};
use crate::utils::json::{is_truthy, parse_int};

/// Scope of suite-level actions
pub const GLOBAL_SCOPE: &str = "Global";

/// Name used in scopes when an entity has none
const NAME_NOT_FOUND: &str = "name-not-found";

/// Prefix `message` with `scope`, if any
pub fn scoped(message: &str, scope: Option<&str>) -> String {
    match scope {
        Some(scope) if !scope.is_empty() => format!("{scope}|{message}"),
        _ => message.to_string(),
    }
}

fn present(value: Option<&str>) -> bool {
    value.map_or(false, |v| !v.is_empty())
}

/// A retry setting is invalid if it is set but not a non-negative integer
fn invalid_retry_setting(value: Option<&Value>) -> bool {
    match value {
        Some(v) if is_truthy(v) => parse_int(v).map_or(true, |n| n < 0),
        _ => false,
    }
}

/// Validates configuration against a set of registered executors
#[derive(Clone, Copy)]
pub struct Validator<'a> {
    registry: &'a ExecutorRegistry,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a ExecutorRegistry) -> Self {
        Self { registry }
    }

    /// Validate one action. A missing action or type stops validation early.
    pub fn action(&self, action: Option<&Action>, scope: Option<&str>) -> Vec<String> {
        let mut errors = Vec::new();
        let Some(action) = action else {
            errors.push(scoped("Action is null or undefined.", scope));
            return errors;
        };

        let action_type = match action.action_type.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => {
                errors.push(scoped("Action's actionType is null or undefined.", scope));
                return errors;
            }
        };

        if !self.registry.contains(action_type) {
            errors.push(scoped(
                &format!(
                    "Received actionType '{}', but did not find an action executor. Valid executors: {}",
                    action_type,
                    self.registry.names().join(", ")
                ),
                scope,
            ));
        }

        let expected_response = action.expected_response.as_ref();
        let expected_error = action.expected_error.as_ref();

        if let Some(expected) = expected_response {
            if expected.response.as_ref().map_or(true, Value::is_null) {
                errors.push(scoped(
                    "Action has expected response config, but no 'response' property.",
                    scope,
                ));
            }
        }

        if let Some(expected) = expected_error {
            if expected.error.as_ref().map_or(true, Value::is_null) {
                errors.push(scoped(
                    "Action has expected error config, but no 'error' property.",
                    scope,
                ));
            }
        }

        if let Some(expected) = expected_response {
            if let Some(invalid) = invalid_comparison(expected.comparison_type.as_deref()) {
                errors.push(scoped(
                    &format!(
                        "Action has expected response with invalid comparison type '{}'. Valid comparison types: {}",
                        invalid,
                        COMPARISON_TYPES.join(", ")
                    ),
                    scope,
                ));
            }
        }

        if let Some(expected) = expected_error {
            if let Some(invalid) = invalid_comparison(expected.comparison_type.as_deref()) {
                errors.push(scoped(
                    &format!(
                        "Action has expected error with invalid comparison type '{}'. Valid comparison types: {}",
                        invalid,
                        COMPARISON_TYPES.join(", ")
                    ),
                    scope,
                ));
            }
        }

        if expected_response.is_some() && expected_error.is_some() {
            errors.push(scoped(
                "Action has both expected response and expected error defined.",
                scope,
            ));
        }

        if invalid_retry_setting(action.initial_wait_ms.as_ref()) {
            errors.push(scoped(
                "initialWaitMs must be a non-negative number if defined.",
                scope,
            ));
        }
        if invalid_retry_setting(action.max_num_retries.as_ref()) {
            errors.push(scoped(
                "maxNumRetries must be non-negative number if defined.",
                scope,
            ));
        }
        if invalid_retry_setting(action.wait_between_retries_ms.as_ref()) {
            errors.push(scoped(
                "waitBetweenRetriesMs must be non-negative number if defined.",
                scope,
            ));
        }

        errors
    }

    fn actions(&self, actions: Option<&Vec<Option<Action>>>, scope: &str) -> Vec<String> {
        actions
            .into_iter()
            .flatten()
            .flat_map(|action| self.action(action.as_ref(), Some(scope)))
            .collect()
    }

    /// Validate a test and every action in it
    pub fn test(&self, test: Option<&Test>, parent_scope: Option<&str>) -> Vec<String> {
        let test_name = test
            .and_then(|t| t.name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or(NAME_NOT_FOUND);
        let scope = match parent_scope {
            Some(parent) if !parent.is_empty() => format!("{parent}|Test:{test_name}"),
            _ => format!("Test:{test_name}"),
        };

        let mut errors = Vec::new();
        let Some(test) = test else {
            errors.push(scoped("Test is null or undefined.", Some(&scope)));
            return errors;
        };

        if !present(test.name.as_deref()) {
            errors.push(scoped("Test's name is null or undefined.", Some(&scope)));
        }
        if !present(test.description.as_deref()) {
            errors.push(scoped("Test's description is null or undefined.", Some(&scope)));
        }

        errors.extend(self.actions(test.setup_actions.as_ref(), &scope));

        match test.test_actions.as_ref().filter(|a| !a.is_empty()) {
            Some(actions) => errors.extend(self.actions(Some(actions), &scope)),
            None => errors.push(scoped("Test has no test actions.", Some(&scope))),
        }

        errors.extend(self.actions(test.teardown_actions.as_ref(), &scope));
        errors
    }

    /// Validate a batch, its actions and its tests
    pub fn test_batch(&self, batch: Option<&TestBatch>) -> Vec<String> {
        let batch_name = batch
            .and_then(|b| b.name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or(NAME_NOT_FOUND);
        let scope = format!("Batch:{batch_name}");

        let mut errors = Vec::new();
        let Some(batch) = batch else {
            errors.push(scoped("Test Batch is null or undefined.", Some(&scope)));
            return errors;
        };

        if !present(batch.name.as_deref()) {
            errors.push(scoped("Batch's name is null or undefined.", Some(&scope)));
        }
        if !present(batch.description.as_deref()) {
            errors.push(scoped("Batch's description is null or undefined.", Some(&scope)));
        }

        errors.extend(self.actions(batch.setup_actions.as_ref(), &scope));

        match batch.tests.as_ref().filter(|t| !t.is_empty()) {
            Some(tests) => {
                for test in tests {
                    errors.extend(self.test(test.as_ref(), Some(&scope)));
                }
            }
            None => errors.push(scoped("Batch has no tests.", Some(&scope))),
        }

        errors.extend(self.actions(batch.teardown_actions.as_ref(), &scope));
        errors
    }

    /// Validate a whole suite configuration, including files that failed to load
    pub fn suite(&self, config: &SuiteConfig) -> Vec<String> {
        let mut errors = config.load_errors.clone();
        for action in &config.setup_actions {
            errors.extend(self.action(action.as_ref(), Some(GLOBAL_SCOPE)));
        }

        if config.test_batches.is_empty() {
            errors.push("Test configuration has no test batches.".to_string());
        } else {
            for batch in &config.test_batches {
                errors.extend(self.test_batch(batch.as_ref()));
            }
        }

        for action in &config.teardown_actions {
            errors.extend(self.action(action.as_ref(), Some(GLOBAL_SCOPE)));
        }
        errors
    }
}

/// The offending value (or `undefined`) when a comparison type is not accepted
fn invalid_comparison(comparison_type: Option<&str>) -> Option<&str> {
    match comparison_type {
        Some(c) if ComparisonMode::is_known(c) => None,
        Some(c) => Some(c),
        None => Some("undefined"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::mock::ScriptedExecutor;
    use crate::models::{ExpectedError, ExpectedResponse};
    use serde_json::json;
    use std::sync::Arc;

    fn registry() -> ExecutorRegistry {
        ExecutorRegistry::new()
            .with("dynamoGet", Arc::new(ScriptedExecutor::ok(json!({}))))
            .with("dynamoPut", Arc::new(ScriptedExecutor::ok(json!({}))))
    }

    fn valid_test(name: &str) -> Test {
        Test::new(name, "desc").actions(vec![Action::new("dynamoGet", json!({}))])
    }

    #[test]
    fn test_scoped() {
        assert_eq!(scoped("msg", Some("Global")), "Global|msg");
        assert_eq!(scoped("msg", None), "msg");
    }

    #[test]
    fn test_missing_action_and_type() {
        let registry = registry();
        let validator = Validator::new(&registry);

        assert_eq!(
            validator.action(None, Some("Global")),
            vec!["Global|Action is null or undefined."]
        );
        assert_eq!(
            validator.action(Some(&Action::default()), None),
            vec!["Action's actionType is null or undefined."]
        );
    }

    #[test]
    fn test_unknown_type_lists_executors() {
        let registry = registry();
        let errors = Validator::new(&registry).action(Some(&Action::new("s3Put", json!({}))), None);
        assert_eq!(
            errors,
            vec!["Received actionType 's3Put', but did not find an action executor. Valid executors: dynamoget, dynamoput"]
        );
    }

    #[test]
    fn test_type_is_case_insensitive() {
        let registry = registry();
        let errors = Validator::new(&registry).action(Some(&Action::new("DYNAMOGET", json!({}))), None);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_expectation_errors_accumulate() {
        let registry = registry();
        let action = Action {
            expected_response: Some(ExpectedResponse::default()),
            expected_error: Some(ExpectedError {
                error: Some(json!({"code": "E"})),
                comparison_type: Some("fuzzy".into()),
            }),
            ..Action::new("dynamoGet", json!({}))
        };

        let errors = Validator::new(&registry).action(Some(&action), Some("Batch:b"));
        assert_eq!(
            errors,
            vec![
                "Batch:b|Action has expected response config, but no 'response' property.",
                "Batch:b|Action has expected response with invalid comparison type 'undefined'. Valid comparison types: contains-same-values, equals",
                "Batch:b|Action has expected error with invalid comparison type 'fuzzy'. Valid comparison types: contains-same-values, equals",
                "Batch:b|Action has both expected response and expected error defined.",
            ]
        );
    }

    #[test]
    fn test_comparison_type_accepts_legacy_and_case() {
        let registry = registry();
        let validator = Validator::new(&registry);
        let legacy = Action::new("dynamoGet", json!({})).expect_response(json!({}), "conatins-same-values");
        let upper = Action::new("dynamoGet", json!({})).expect_error(json!({}), "EQUALS");
        assert!(validator.action(Some(&legacy), None).is_empty());
        assert!(validator.action(Some(&upper), None).is_empty());
    }

    #[test]
    fn test_retry_settings() {
        let registry = registry();
        let validator = Validator::new(&registry);
        let action = Action {
            initial_wait_ms: Some(json!("abc")),
            max_num_retries: Some(json!(-1)),
            wait_between_retries_ms: Some(json!("25ms")),
            ..Action::new("dynamoGet", json!({}))
        };
        assert_eq!(
            validator.action(Some(&action), None),
            vec![
                "initialWaitMs must be a non-negative number if defined.",
                "maxNumRetries must be non-negative number if defined.",
            ]
        );

        let zero = Action {
            max_num_retries: Some(json!(0)),
            initial_wait_ms: Some(json!("")),
            ..Action::new("dynamoGet", json!({}))
        };
        assert!(validator.action(Some(&zero), None).is_empty());
    }

    #[test]
    fn test_empty_test_actions() {
        let registry = registry();
        let test = Test::new("t1", "d").actions(vec![]);
        let errors = Validator::new(&registry).test(Some(&test), None);
        assert_eq!(errors, vec!["Test:t1|Test has no test actions."]);
    }

    #[test]
    fn test_missing_test_is_scoped() {
        let registry = registry();
        let errors = Validator::new(&registry).test(None, Some("Batch:b"));
        assert_eq!(errors, vec!["Batch:b|Test:name-not-found|Test is null or undefined."]);
    }

    #[test]
    fn test_nested_scopes() {
        let registry = registry();
        let test = Test::default()
            .setup(vec![Action::default()])
            .actions(vec![Action::new("dynamoGet", json!({}))]);
        let batch = TestBatch::new("orders", "d").tests(vec![test]);

        let errors = Validator::new(&registry).test_batch(Some(&batch));
        assert_eq!(
            errors,
            vec![
                "Batch:orders|Test:name-not-found|Test's name is null or undefined.",
                "Batch:orders|Test:name-not-found|Test's description is null or undefined.",
                "Batch:orders|Test:name-not-found|Action's actionType is null or undefined.",
            ]
        );
    }

    #[test]
    fn test_batch_requirements() {
        let registry = registry();
        let validator = Validator::new(&registry);
        assert_eq!(
            validator.test_batch(None),
            vec!["Batch:name-not-found|Test Batch is null or undefined."]
        );

        let batch = TestBatch::default().teardown(vec![Action::new("nope", json!({}))]);
        let errors = validator.test_batch(Some(&batch));
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[2], "Batch:name-not-found|Batch has no tests.");
        assert!(errors[3].starts_with("Batch:name-not-found|Received actionType 'nope'"));
    }

    #[test]
    fn test_suite_validation() {
        let registry = registry();
        let validator = Validator::new(&registry);
        let empty = SuiteConfig::new().setup(vec![Action::default()]);
        assert_eq!(
            validator.suite(&empty),
            vec![
                "Global|Action's actionType is null or undefined.",
                "Test configuration has no test batches.",
            ]
        );

        let config = SuiteConfig::new().batches(vec![TestBatch::new("b", "d").tests(vec![valid_test("t")])]);
        assert!(validator.suite(&config).is_empty());
    }

    #[test]
    fn test_null_entries_are_scoped_errors() {
        let registry = registry();
        let validator = Validator::new(&registry);
        let config: SuiteConfig = serde_json::from_value(json!({
            "teardownActions": [null],
            "testBatches": [
                {"name": "b", "description": "d", "tests": [
                    {"name": "t", "description": "d", "testActions": [null]},
                    null
                ]},
                null
            ]
        }))
        .unwrap();

        assert_eq!(
            validator.suite(&config),
            vec![
                "Batch:b|Test:t|Action is null or undefined.",
                "Batch:b|Test:name-not-found|Test is null or undefined.",
                "Batch:name-not-found|Test Batch is null or undefined.",
                "Global|Action is null or undefined.",
            ]
        );
    }

    #[test]
    fn test_load_errors_come_first() {
        let registry = registry();
        let mut config = SuiteConfig::new().batches(vec![TestBatch::new("b", "d").tests(vec![valid_test("t")])]);
        config.load_errors.push("File:bad-functional-test.json|Failed to parse configuration file.".into());

        assert_eq!(
            Validator::new(&registry).suite(&config),
            vec!["File:bad-functional-test.json|Failed to parse configuration file."]
        );
    }

    #[test]
    fn test_validation_is_idempotent() {
        let registry = registry();
        let validator = Validator::new(&registry);
        let batch = TestBatch::new("b", "").tests(vec![valid_test(""), Test::default()]);

        let first = validator.test_batch(Some(&batch));
        let second = validator.test_batch(Some(&batch));
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }
}
