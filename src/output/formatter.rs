//! Output formatters for suite and batch results
//!
//! Provides JSON and human-readable summary output.

use serde::Serialize;

use crate::models::{BatchResult, PhaseCounts, SuiteResult, TestResult};

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "summary" => Some(OutputFormat::Summary),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format a whole suite result
    pub fn format_suite(&self, result: &SuiteResult) -> String {
        match self.format {
            OutputFormat::Summary => self.format_suite_summary(result),
            _ => self.to_json(result),
        }
    }

    /// Format a single batch result
    pub fn format_batch(&self, result: &BatchResult) -> String {
        match self.format {
            OutputFormat::Summary => {
                let mut output = String::new();
                self.push_batch(&mut output, result);
                output
            }
            _ => self.to_json(result),
        }
    }

    /// Format configuration validation errors
    pub fn format_validation(&self, errors: &[String]) -> String {
        match self.format {
            OutputFormat::Summary => {
                if errors.is_empty() {
                    return format!("{} Configuration is valid.\n", self.status(true));
                }
                let mut output = format!(
                    "{} Configuration contains {} validation error(s):\n",
                    self.status(false),
                    errors.len()
                );
                for error in errors {
                    output.push_str(&format!("  - {error}\n"));
                }
                output
            }
            _ => self.to_json(&errors),
        }
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> String {
        if self.format == OutputFormat::JsonPretty {
            serde_json::to_string_pretty(value).unwrap_or_default()
        } else {
            serde_json::to_string(value).unwrap_or_default()
        }
    }

    fn format_suite_summary(&self, result: &SuiteResult) -> String {
        let summary = result.summary();
        let mut output = String::new();

        output.push_str("\n══════════════════════════════════════════════════════════════\n");
        output.push_str(&format!("  Test Execution {}\n", result.id));
        output.push_str("══════════════════════════════════════════════════════════════\n");

        output.push_str(&format!(
            "  {} {}\n",
            self.status(result.success),
            result.message.as_deref().unwrap_or("")
        ));
        if let Some(err) = &result.error {
            output.push_str(&format!("  {}: {}\n", err.name, err.message));
        }
        if let Some(errors) = &result.config_validation_errors {
            for error in errors {
                output.push_str(&format!("    - {error}\n"));
            }
        }

        output.push_str(&self.counts_line("Setup", &summary.setup));
        output.push_str(&self.counts_line("Batches", &summary.test_batches));
        output.push_str(&self.counts_line("Teardown", &summary.teardown));

        if let Some(batches) = &result.test_batches {
            output.push_str("──────────────────────────────────────────────────────────────\n");
            for batch in batches.completed.iter().chain(&batches.failed) {
                self.push_batch(&mut output, batch);
            }
        }

        output.push_str("══════════════════════════════════════════════════════════════\n");
        output
    }

    fn push_batch(&self, output: &mut String, batch: &BatchResult) {
        output.push_str(&format!(
            "  {} {} - {}\n",
            self.status(batch.success),
            batch.name(),
            batch.message.as_deref().unwrap_or("")
        ));
        if let Some(err) = &batch.error {
            output.push_str(&format!("      {}: {}\n", err.name, err.message));
        }
        if let Some(tests) = &batch.tests {
            for test in tests.completed.iter().chain(&tests.failed) {
                self.push_test(output, test);
            }
        }
    }

    fn push_test(&self, output: &mut String, test: &TestResult) {
        output.push_str(&format!(
            "      {} {} - {}\n",
            self.status(test.success),
            test.test_name,
            test.message.as_deref().unwrap_or("")
        ));
    }

    fn counts_line(&self, label: &str, counts: &PhaseCounts) -> String {
        let failed = if self.colorize && counts.failed > 0 {
            format!("\x1b[31m{}\x1b[0m", counts.failed)
        } else {
            counts.failed.to_string()
        };
        format!(
            "  {:9} completed: {:3} | failed: {}\n",
            label, counts.completed, failed
        )
    }

    fn status(&self, success: bool) -> &'static str {
        match (success, self.colorize) {
            (true, true) => "\x1b[32m✓ PASS\x1b[0m",
            (false, true) => "\x1b[31m✗ FAIL\x1b[0m",
            (true, false) => "✓ PASS",
            (false, false) => "✗ FAIL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchSetResult, DataError};

    fn suite() -> SuiteResult {
        let mut batches = BatchSetResult::new();
        let mut ok = BatchResult::new("orders");
        ok.message = Some("Test Success".to_string());
        batches.record(ok, true);

        let mut bad = BatchResult::new("payments");
        bad.fail("Test(s) failed");
        batches.record(bad, false);

        let mut result = SuiteResult::new("2024-01-01-00-00-00-000-0042");
        result.test_batches = Some(batches);
        result.fail("One or more test batches failed.");
        result
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("summary"), Some(OutputFormat::Summary));
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("json-pretty"), Some(OutputFormat::JsonPretty));
        assert_eq!(OutputFormat::from_str("table"), None);
    }

    #[test]
    fn test_suite_summary() {
        let output = ResultFormatter::new(OutputFormat::Summary)
            .no_color()
            .format_suite(&suite());

        assert!(output.contains("Test Execution 2024-01-01-00-00-00-000-0042"));
        assert!(output.contains("✗ FAIL One or more test batches failed."));
        assert!(output.contains("Batches   completed:   1 | failed: 1"));
        assert!(output.contains("✓ PASS orders - Test Success"));
        assert!(output.contains("✗ FAIL payments - Test(s) failed"));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_suite_json() {
        let output = ResultFormatter::new(OutputFormat::Json).format_suite(&suite());
        let parsed: SuiteResult = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, suite());
    }

    #[test]
    fn test_batch_error_is_shown() {
        let batch = BatchResult::not_run(
            "orders",
            DataError::new("Error", "worker unreachable"),
            "Unexpected error executing batch.",
        );
        let output = ResultFormatter::new(OutputFormat::Summary)
            .no_color()
            .format_batch(&batch);
        assert!(output.contains("✗ FAIL orders - Unexpected error executing batch."));
        assert!(output.contains("Error: worker unreachable"));
    }

    #[test]
    fn test_format_validation() {
        let formatter = ResultFormatter::new(OutputFormat::Summary).no_color();
        assert_eq!(formatter.format_validation(&[]), "✓ PASS Configuration is valid.\n");

        let output = formatter.format_validation(&["Test configuration has no test batches.".to_string()]);
        assert!(output.contains("1 validation error(s)"));
        assert!(output.contains("  - Test configuration has no test batches."));

        let json = ResultFormatter::new(OutputFormat::Json).format_validation(&["a".to_string()]);
        assert_eq!(json, r#"["a"]"#);
    }
}
