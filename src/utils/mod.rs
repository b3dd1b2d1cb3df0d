//! Shared helpers

pub mod json;
pub mod logger;
pub mod timer;
