//! Configuration module
//!
//! Application settings are layered: defaults, an optional YAML/JSON file,
//! environment variables, then CLI flags (applied by the binary). Suite
//! definitions are loaded separately by [`file`].

pub mod env;
pub mod file;

pub use env::EnvConfig;
pub use file::load_suite_config;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{EngineError, Result};
use crate::results::ResultsStorage;
use crate::worker::WorkerMode;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding suite configuration files
    pub config_dir: PathBuf,

    /// Where suite results are written; the user data dir when unset
    pub results_dir: Option<PathBuf>,

    /// Transport used to reach workers
    pub worker_mode: WorkerMode,

    /// Worker executable (process mode) or URL (http mode)
    pub worker_ref: Option<String>,

    /// Log level name
    pub log_level: String,

    /// Disable all logging
    pub silent: bool,

    /// HTTP timeout in seconds, for executors and the HTTP worker channel
    pub http_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("./configuration"),
            results_dir: None,
            worker_mode: WorkerMode::default(),
            worker_ref: None,
            log_level: "info".to_string(),
            silent: false,
            http_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: Self = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Ok(config)
    }

    /// Defaults, overlaid with `file` (or the file named by FT_APP_CONFIG),
    /// then with the environment
    pub fn resolve(file: Option<&Path>, env: &EnvConfig) -> Result<Self> {
        let file = file
            .map(Path::to_path_buf)
            .or_else(|| env.app_config.as_ref().map(PathBuf::from));

        let mut config = match file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(env);
        Ok(config)
    }

    /// Overlay environment values
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(dir) = &env.config_dir {
            self.config_dir = PathBuf::from(dir);
        }
        if let Some(dir) = &env.results_dir {
            self.results_dir = Some(PathBuf::from(dir));
        }
        if let Some(mode) = &env.worker_mode {
            match WorkerMode::from_str(mode) {
                Some(mode) => self.worker_mode = mode,
                None => warn!("Ignoring unknown worker mode '{}'", mode),
            }
        }
        if let Some(worker_ref) = &env.worker_ref {
            self.worker_ref = Some(worker_ref.clone());
        }
        if let Some(level) = &env.log_level {
            self.log_level = level.clone();
        }
        if let Some(silent) = env.silent {
            self.silent = silent;
        }
    }

    /// Result sink for this configuration
    pub fn storage(&self) -> ResultsStorage {
        match &self.results_dir {
            Some(dir) => ResultsStorage::new(dir),
            None => ResultsStorage::default_dir(),
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
