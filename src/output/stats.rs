//! Run statistics
//!
//! Counts of record outcomes plus the number of requests issued.

use crate::rediscovery::RediscoveryResult;
use crate::state::Action;

/// Run statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Records that produced a result
    pub processed: u64,

    pub updated: u64,
    pub needs_review: u64,
    pub skipped: u64,
    pub no_change: u64,

    /// HTTP requests issued during the run
    pub fetches: u64,
}

impl RunStatistics {
    /// Counts one record's outcome
    pub fn record(&mut self, action: Action) {
        self.processed += 1;
        match action {
            Action::Updated => self.updated += 1,
            Action::NeedsReview => self.needs_review += 1,
            Action::Skipped => self.skipped += 1,
            Action::NoChange => self.no_change += 1,
        }
    }

    /// Builds statistics from a list of results
    pub fn from_results(results: &[RediscoveryResult]) -> Self {
        let mut stats = Self::default();
        for result in results {
            stats.record(result.action);
        }
        stats
    }

    /// Count for one action
    pub fn count(&self, action: Action) -> u64 {
        match action {
            Action::Updated => self.updated,
            Action::NeedsReview => self.needs_review,
            Action::Skipped => self.skipped,
            Action::NoChange => self.no_change,
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Rediscovery Statistics ===\n");

    println!("Records processed: {}", stats.processed);
    for action in Action::all() {
        let count = stats.count(action);
        let percentage = if stats.processed > 0 {
            (count as f64 / stats.processed as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", action, count, percentage);
    }
    println!();
    println!("Requests issued: {}", stats.fetches);
}
