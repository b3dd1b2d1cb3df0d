//! Suite configuration files
//!
//! A suite is assembled from every `*functional-test*` JSON or YAML file in a
//! configuration directory, concatenated in file-name order. A file that
//! cannot be parsed is carried as a load error, so the suite fails validation
//! instead of running without it.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::error::{EngineError, Result};
use crate::models::SuiteConfig;
use crate::validation::scoped;

/// Substring a file name must contain to be picked up
pub const CONFIG_FILE_MARKER: &str = "functional-test";

/// Whether `path` names a suite configuration file
pub fn is_suite_config_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    name.contains(CONFIG_FILE_MARKER) && (is_yaml(path) || has_extension(path, "json"))
}

fn is_yaml(path: &Path) -> bool {
    has_extension(path, "yaml") || has_extension(path, "yml")
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// Suite configuration files in `dir`, sorted by file name
pub fn find_suite_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    debug!(
        "Searching for configuration files in {} matching '*{}*'",
        dir.display(),
        CONFIG_FILE_MARKER
    );

    let entries = fs::read_dir(dir).map_err(|e| {
        EngineError::Config(format!(
            "Cannot read configuration directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_suite_config_file(&path) {
            files.push(path);
        }
    }
    files.sort();

    info!("Found {} configuration files.", files.len());
    Ok(files)
}

/// Parse one configuration file; YAML or JSON by extension
pub fn load_suite_file(path: impl AsRef<Path>) -> Result<SuiteConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let config = if is_yaml(path) {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };

    Ok(config)
}

/// Assemble the suite configuration from a directory. Files that fail to
/// parse are logged and recorded in [`SuiteConfig::load_errors`].
pub fn load_suite_config(dir: impl AsRef<Path>) -> Result<SuiteConfig> {
    let mut config = SuiteConfig::default();

    for path in find_suite_files(dir)? {
        match load_suite_file(&path) {
            Ok(fragment) => {
                debug!(
                    "Adding {} setup action(s), {} test batch(es), {} teardown action(s) from {}",
                    fragment.setup_actions.len(),
                    fragment.test_batches.len(),
                    fragment.teardown_actions.len(),
                    path.display()
                );
                config.extend(fragment);
            }
            Err(e) => {
                error!(
                    "Failed to get configuration data from file: {}: {}",
                    path.display(),
                    e
                );
                let file_name = path.file_name().map_or_else(
                    || path.display().to_string(),
                    |n| n.to_string_lossy().into_owned(),
                );
                config.load_errors.push(scoped(
                    &format!("Failed to parse configuration file: {e}"),
                    Some(&format!("File:{file_name}")),
                ));
            }
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ExecutorRegistry;
    use crate::validation::Validator;
    use tempfile::tempdir;

    #[test]
    fn test_is_suite_config_file() {
        assert!(is_suite_config_file(Path::new("functional-tests.json")));
        assert!(is_suite_config_file(Path::new("conf/api-functional-test.yml")));
        assert!(is_suite_config_file(Path::new("my-functional-tests.YAML")));
        assert!(!is_suite_config_file(Path::new("functional-tests.txt")));
        assert!(!is_suite_config_file(Path::new("settings.json")));
    }

    #[test]
    fn test_load_concatenates_in_name_order() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("b-functional-tests.yaml"),
            "testBatches:\n  - name: second\n    tests: []\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("a-functional-tests.json"),
            r#"{
                "setupActions": [{"type": "httpRequest", "params": {"url": "http://x"}}],
                "testBatches": [{"name": "first", "tests": []}]
            }"#,
        )
        .unwrap();
        fs::write(dir.path().join("ignored.json"), r#"{"testBatches": [{"name": "no"}]}"#)
            .unwrap();

        let config = load_suite_config(dir.path()).unwrap();
        assert_eq!(config.setup_actions.len(), 1);
        let names: Vec<_> = config
            .test_batches
            .iter()
            .flatten()
            .map(|b| b.display_name())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
        assert!(config.load_errors.is_empty());
    }

    #[test]
    fn test_unparsable_file_is_recorded() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("broken-functional-test.json"), "{ nope").unwrap();
        fs::write(
            dir.path().join("typed-functional-test.json"),
            r#"{"testBatches": [{"name": 42}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("good-functional-test.json"),
            r#"{"testBatches": [{"name": "ok"}]}"#,
        )
        .unwrap();

        let config = load_suite_config(dir.path()).unwrap();
        assert_eq!(config.test_batches.len(), 1);
        assert_eq!(config.load_errors.len(), 2);
        assert!(config.load_errors[0]
            .starts_with("File:broken-functional-test.json|Failed to parse configuration file: "));
        assert!(config.load_errors[1].starts_with("File:typed-functional-test.json|"));

        let registry = ExecutorRegistry::new();
        let errors = Validator::new(&registry).suite(&config);
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[2], "Batch:ok|Batch's description is null or undefined.");
        assert_eq!(errors[3], "Batch:ok|Batch has no tests.");
    }

    #[test]
    fn test_null_entries_reach_validation() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("a-functional-tests.json"),
            r#"{"testBatches": [{"name": "ok", "description": "d", "tests": [
                {"name": "t", "description": "d", "testActions": [{"type": "shellCommand", "params": {"command": "true"}}]}
            ]}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("b-functional-tests.json"),
            r#"{"testBatches": [{"name": "bad", "description": "d", "tests": [
                {"name": "t", "description": "d", "testActions": [null]}
            ]}]}"#,
        )
        .unwrap();

        let config = load_suite_config(dir.path()).unwrap();
        assert_eq!(config.test_batches.len(), 2);
        assert!(config.load_errors.is_empty());

        let registry = ExecutorRegistry::with_defaults();
        assert_eq!(
            Validator::new(&registry).suite(&config),
            vec!["Batch:bad|Test:t|Action is null or undefined."]
        );
    }

    #[test]
    fn test_missing_directory_is_config_error() {
        let dir = tempdir().unwrap();
        let err = load_suite_config(dir.path().join("absent")).unwrap_err();
        assert_eq!(err.kind(), "ConfigError");
    }

    #[test]
    fn test_empty_directory_gives_empty_config() {
        let dir = tempdir().unwrap();
        let config = load_suite_config(dir.path()).unwrap();
        assert_eq!(config, SuiteConfig::default());
    }
}
