//! Per-format outcome of a pipeline run.

use qbank_core::OutputFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Which output files were written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReport {
    /// Number of questions in the sorted collection.
    pub record_count: usize,

    /// Success flag per attempted format.
    pub results: BTreeMap<OutputFormat, bool>,

    /// Target path per attempted format.
    pub paths: BTreeMap<OutputFormat, PathBuf>,
}

impl SaveReport {
    /// Empty report for a collection of `record_count` questions.
    pub fn new(record_count: usize) -> Self {
        Self {
            record_count,
            ..Self::default()
        }
    }

    /// Record the outcome of one format.
    pub fn record(&mut self, format: OutputFormat, path: PathBuf, saved: bool) {
        self.results.insert(format, saved);
        self.paths.insert(format, path);
    }

    /// Outcome for `format`, or `None` if it was not attempted.
    pub fn succeeded(&self, format: OutputFormat) -> Option<bool> {
        self.results.get(&format).copied()
    }

    /// Where `format` was written to (or attempted).
    pub fn path(&self, format: OutputFormat) -> Option<&Path> {
        self.paths.get(&format).map(PathBuf::as_path)
    }

    pub fn success_count(&self) -> usize {
        self.results.values().filter(|saved| **saved).count()
    }

    /// True when every format was attempted and written.
    pub fn all_succeeded(&self) -> bool {
        OutputFormat::ALL
            .iter()
            .all(|format| self.succeeded(*format) == Some(true))
    }

    pub fn any_succeeded(&self) -> bool {
        self.success_count() > 0
    }
}
