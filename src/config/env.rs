//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "FT";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvConfig {
    /// Suite configuration directory from FT_CONFIG_DIR
    pub config_dir: Option<String>,
    /// Results directory from FT_RESULTS_DIR
    pub results_dir: Option<String>,
    /// Worker transport from FT_WORKER_MODE
    pub worker_mode: Option<String>,
    /// Worker executable or URL from FT_WORKER_REF
    pub worker_ref: Option<String>,
    /// Application config file from FT_APP_CONFIG
    pub app_config: Option<String>,
    /// Log level from LOG_LEVEL
    pub log_level: Option<String>,
    /// Silence all logging from SILENT_LOGGING
    pub silent: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| non_empty(lookup(&format!("{ENV_PREFIX}_{name}")));

        Self {
            config_dir: get("CONFIG_DIR"),
            results_dir: get("RESULTS_DIR"),
            worker_mode: get("WORKER_MODE"),
            worker_ref: get("WORKER_REF"),
            app_config: get("APP_CONFIG"),
            log_level: non_empty(lookup("LOG_LEVEL")),
            silent: non_empty(lookup("SILENT_LOGGING")).map(|v| parse_bool(&v)),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Interpret an environment value as boolean
fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}

/// Print all recognised environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_CONFIG_DIR    Directory holding *functional-test*.json|yaml files");
    println!("  {ENV_PREFIX}_RESULTS_DIR   Directory suite results are written to");
    println!("  {ENV_PREFIX}_WORKER_MODE   Worker transport (process, http, local)");
    println!("  {ENV_PREFIX}_WORKER_REF    Worker executable path or URL");
    println!("  {ENV_PREFIX}_APP_CONFIG    Path to application config file");
    println!("  LOG_LEVEL         Log level (trace, debug, info, warn, error)");
    println!("  SILENT_LOGGING    Disable all logging (true/false)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_CONFIG_DIR=./configuration");
    println!("  export LOG_LEVEL=DEBUG");
    println!("  functional-tester run");
}
