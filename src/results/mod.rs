//! Results module
//!
//! Persistent storage for suite results.

mod storage;

pub use storage::ResultsStorage;
