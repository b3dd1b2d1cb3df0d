//! Logging setup
//!
//! Logs go to stderr: a worker's stdout carries only its result JSON.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log level configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Filter directive for this crate at `level`, or `off` when silenced
pub fn filter_directive(level: LogLevel, silent: bool) -> String {
    if silent {
        "off".to_string()
    } else {
        format!(
            "functional_tester={}",
            level.to_tracing_level().as_str().to_lowercase()
        )
    }
}

/// Initialize the logger with specified level
pub fn init_logger(level: LogLevel, silent: bool) {
    let filter = EnvFilter::new(filter_directive(level, silent));

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
