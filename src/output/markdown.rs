//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a run: outcome
//! counts, the links that were rewritten and the records left for review.

use crate::output::traits::{OutputResult, RunSummary};
use crate::state::Action;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary to `output_path`
pub fn generate_markdown_summary(summary: &RunSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Escapes a value for use inside a table cell
fn cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(summary: &RunSummary) -> String {
    let mut md = String::new();

    md.push_str("# Job-Relink Run Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished));
    }
    if let Some(duration) = summary.duration_seconds {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push_str(&format!("- **Input**: {}\n", summary.input_path));
    if let Some(town) = &summary.town_filter {
        md.push_str(&format!("- **Town filter**: {}\n", town));
    }
    let hash = if summary.config_hash.is_empty() {
        "(built-in defaults)"
    } else {
        summary.config_hash.as_str()
    };
    md.push_str(&format!("- **Config Hash**: {}\n\n", hash));

    // Outcome counts
    let stats = &summary.statistics;
    md.push_str("## Outcomes\n\n");
    md.push_str("| Action | Count |\n");
    md.push_str("|--------|-------|\n");
    for action in Action::all() {
        md.push_str(&format!("| {} | {} |\n", action, stats.count(action)));
    }
    md.push_str(&format!("| **Total** | {} |\n\n", stats.processed));
    md.push_str(&format!("- **Requests issued**: {}\n", stats.fetches));
    md.push_str(&format!("- **Update rate**: {:.2}%\n\n", summary.update_rate()));

    // Updated links
    let updated: Vec<_> = summary.updated().collect();
    if !updated.is_empty() {
        md.push_str("## Updated Links\n\n");
        md.push_str("| Town | New URL | Confidence | Source | Page Type |\n");
        md.push_str("|------|---------|------------|--------|-----------|\n");
        for result in updated {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                cell(&result.name),
                cell(result.new_url.as_deref().unwrap_or("")),
                result.confidence.map(|c| c.to_string()).unwrap_or_default(),
                result.source.as_deref().unwrap_or(""),
                result.page_type.map(|p| p.as_str()).unwrap_or(""),
            ));
        }
        md.push('\n');
    }

    // Needs review
    let review: Vec<_> = summary.needs_review().collect();
    if !review.is_empty() {
        md.push_str("## Needs Review\n\n");
        for result in review {
            match &result.blocked_reason {
                Some(block) => md.push_str(&format!(
                    "- {} ({}; blocked: {})\n",
                    result.name, result.reason, block
                )),
                None => md.push_str(&format!("- {} ({})\n", result.name, result.reason)),
            }
        }
        md.push('\n');
    }

    md
}
