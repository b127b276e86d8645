//! CSV report writer
//!
//! One row per processed record. Columns are fixed so reports from different
//! runs line up.

use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use crate::rediscovery::RediscoveryResult;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Report columns, in order
pub const REPORT_COLUMNS: [&str; 11] = [
    "town",
    "action",
    "reason",
    "platform",
    "old_employment_url",
    "new_employment_url",
    "confidence",
    "source",
    "employment_page_type",
    "blocked_reason",
    "application_note",
];

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    town: &'a str,
    action: &'a str,
    reason: &'a str,
    platform: &'a str,
    old_employment_url: &'a str,
    new_employment_url: &'a str,
    confidence: Option<u8>,
    source: &'a str,
    employment_page_type: &'a str,
    blocked_reason: &'a str,
    application_note: &'a str,
}

impl<'a> From<&'a RediscoveryResult> for ReportRow<'a> {
    fn from(result: &'a RediscoveryResult) -> Self {
        Self {
            town: &result.name,
            action: result.action.as_str(),
            reason: &result.reason,
            platform: result.platform.map(|p| p.as_str()).unwrap_or(""),
            old_employment_url: result.old_url.as_deref().unwrap_or(""),
            new_employment_url: result.new_url.as_deref().unwrap_or(""),
            confidence: result.confidence,
            source: result.source.as_deref().unwrap_or(""),
            employment_page_type: result.page_type.map(|p| p.as_str()).unwrap_or(""),
            blocked_reason: result.blocked_reason.as_deref().unwrap_or(""),
            application_note: result.application_note.as_deref().unwrap_or(""),
        }
    }
}

/// Writes results as CSV
pub struct CsvReport<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvReport<File> {
    /// Creates the report file and writes the header
    pub fn create(path: &Path) -> OutputResult<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvReport<W> {
    /// Wraps a writer and writes the header
    pub fn from_writer(inner: W) -> OutputResult<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(REPORT_COLUMNS)?;
        Ok(Self { writer })
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| OutputError::Write(e.to_string()))
    }
}

impl<W: Write> OutputHandler for CsvReport<W> {
    fn record_result(&mut self, result: &RediscoveryResult) -> OutputResult<()> {
        self.writer.serialize(ReportRow::from(result))?;
        Ok(())
    }

    fn finalize(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes a complete report file
pub fn write_report(results: &[RediscoveryResult], path: &Path) -> OutputResult<()> {
    let mut report = CsvReport::create(path)?;
    report.record_all(results)?;
    report.finalize()
}
