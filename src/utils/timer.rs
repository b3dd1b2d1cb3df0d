//! Phase timing
//!
//! Runners time each test, batch and suite and log the duration at debug
//! level when the phase completes.

use std::time::{Duration, Instant};
use tracing::debug;

/// Measures one named phase
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    label: String,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            label: label.into(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Stop the timer, log and return the elapsed time
    pub fn stop(self) -> Duration {
        let elapsed = self.elapsed();
        debug!("{} finished in {}ms", self.label, elapsed.as_millis());
        elapsed
    }
}
