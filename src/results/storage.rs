//! Results storage and retrieval
//!
//! Suite results are written as pretty JSON to `<base_dir>/<id>/results.json`.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::SuiteResult;

const RESULTS_FILE: &str = "results.json";

/// Directory-backed result sink
#[derive(Clone, Debug)]
pub struct ResultsStorage {
    base_dir: PathBuf,
}

impl ResultsStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Storage under the user's data directory
    pub fn default_dir() -> Self {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("functional-tester")
            .join("results");
        Self::new(base_dir)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the results file for a suite execution
    pub fn result_path(&self, id: &str) -> PathBuf {
        self.base_dir.join(id).join(RESULTS_FILE)
    }

    /// Save a suite result
    pub fn save(&self, result: &SuiteResult) -> Result<PathBuf> {
        let path = self.result_path(&result.id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, result)?;

        info!("Saved test results to {}", path.display());
        Ok(path)
    }

    /// Load a suite result by execution id
    pub fn load(&self, id: &str) -> Result<SuiteResult> {
        let path = self.result_path(id);
        let reader = BufReader::new(File::open(&path)?);
        let result = serde_json::from_reader(reader)?;

        debug!("Loaded test results from {}", path.display());
        Ok(result)
    }

    /// Stored execution ids, newest first
    pub fn list_runs(&self) -> Result<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if entry.path().join(RESULTS_FILE).is_file() {
                ids.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        // Ids start with a timestamp
        ids.sort_by(|a, b| b.cmp(a));
        Ok(ids)
    }
}
