//! Output module for run reports and summaries
//!
//! This module handles:
//! - Writing the per-record CSV report
//! - Generating the markdown run summary
//! - Recording run statistics

mod markdown;
mod report;
pub mod stats;
mod traits;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use report::{write_report, CsvReport, REPORT_COLUMNS};
pub use stats::{print_statistics, RunStatistics};
pub use traits::{OutputError, OutputHandler, OutputResult, RunSummary};
