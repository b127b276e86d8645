//! Output handler traits and types
//!
//! This module defines the trait interface for report writers and the data
//! structures behind the run summary.

use crate::output::stats::RunStatistics;
use crate::rediscovery::RediscoveryResult;
use crate::state::Action;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything the run summary reports on
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    // Run metadata
    pub started_at: String,
    pub finished_at: Option<String>,
    pub duration_seconds: Option<u64>,
    pub config_hash: String,
    pub input_path: String,

    /// Set when the run was limited to one record
    pub town_filter: Option<String>,

    pub statistics: RunStatistics,

    /// One entry per processed record, in dataset order
    pub results: Vec<RediscoveryResult>,
}

impl RunSummary {
    /// Creates a new empty run summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that were updated
    pub fn updated(&self) -> impl Iterator<Item = &RediscoveryResult> {
        self.results.iter().filter(|r| r.action == Action::Updated)
    }

    /// Records deferred to human review
    pub fn needs_review(&self) -> impl Iterator<Item = &RediscoveryResult> {
        self.results.iter().filter(|r| r.action == Action::NeedsReview)
    }

    /// Updated records as a percentage of attempted ones (updated + needs review)
    pub fn update_rate(&self) -> f64 {
        let attempted = self.statistics.updated + self.statistics.needs_review;
        if attempted == 0 {
            return 0.0;
        }
        (self.statistics.updated as f64 / attempted as f64) * 100.0
    }
}

/// Trait for report writers
///
/// A handler receives every record's result in dataset order, then is
/// finalized once.
pub trait OutputHandler {
    /// Records one record's result
    fn record_result(&mut self, result: &RediscoveryResult) -> OutputResult<()>;

    /// Records every result in order
    fn record_all(&mut self, results: &[RediscoveryResult]) -> OutputResult<()> {
        results.iter().try_for_each(|r| self.record_result(r))
    }

    /// Flushes any buffered output
    fn finalize(&mut self) -> OutputResult<()>;
}
