//! Output formatting module
//!
//! Renders suite results, batch results and validation errors for the terminal.

mod formatter;

pub use formatter::{OutputFormat, ResultFormatter};
