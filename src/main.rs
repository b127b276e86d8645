//! Job-Relink main entry point
//!
//! This is the command-line interface for the employment link rediscovery
//! engine.

use anyhow::Context;
use clap::Parser;
use job_relink::config::{load_config_with_hash, Config};
use job_relink::output::{
    generate_markdown_summary, print_statistics, write_report, RunSummary,
};
use job_relink::rediscovery::{gate, Gate, Rediscoverer};
use job_relink::storage::{load_dataset, save_dataset, Dataset, Entry};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Job-Relink: rediscovers decayed employment page links
///
/// Reads a JSON dataset of organization records, looks for replacement links
/// for the ones marked broken, and writes the updated dataset plus a CSV report
/// with one row per processed record.
#[derive(Parser, Debug)]
#[command(name = "job-relink")]
#[command(version = "1.0.0")]
#[command(about = "Rediscovers broken employment page links", long_about = None)]
struct Cli {
    /// Input dataset (JSON array of records)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Where to write the updated dataset
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Where to write the CSV report
    #[arg(value_name = "REPORT")]
    report: PathBuf,

    /// Only process the record with this name (case-insensitive)
    #[arg(long, value_name = "NAME")]
    town: Option<String>,

    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also write a markdown run summary
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Show what each record's gate would decide, without network access
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let (config, config_hash) = match load_config_with_hash(cli.config.as_deref()) {
        Ok((cfg, hash)) => {
            match &cli.config {
                Some(path) => tracing::info!(
                    "Configuration loaded from {} (hash: {})",
                    path.display(),
                    hash
                ),
                None => tracing::info!("Using built-in configuration"),
            }
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // A malformed dataset aborts before any record is processed
    let mut dataset = load_dataset(&cli.input)
        .with_context(|| format!("failed to load dataset {}", cli.input.display()))?;
    tracing::info!("Loaded {} entries from {}", dataset.len(), cli.input.display());

    if cli.dry_run {
        handle_dry_run(&config, &dataset, cli.town.as_deref());
        return Ok(());
    }

    handle_run(&cli, config, config_hash, &mut dataset).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("job_relink=info,warn"),
            1 => EnvFilter::new("job_relink=debug,info"),
            2 => EnvFilter::new("job_relink=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: prints each record's gate decision
fn handle_dry_run(config: &Config, dataset: &Dataset, town: Option<&str>) {
    println!("=== Job-Relink Dry Run ===\n");

    println!("Rediscovery Configuration:");
    println!(
        "  Rediscover statuses: {:?}",
        config.rediscovery.rediscover_statuses
    );
    println!(
        "  Do-not-touch statuses: {:?}",
        config.rediscovery.do_not_touch_statuses
    );
    println!("  Validate top: {}", config.rediscovery.validate_top_n);
    println!("  Politeness delay: {}ms", config.http.politeness_delay_ms);
    println!();

    let mut attempts = 0;
    for entry in &dataset.entries {
        let mut record = match entry {
            Entry::Record(record) => record.clone(),
            Entry::Malformed { error, .. } => {
                if town.is_none() {
                    println!("  - (malformed): skipped [{}]", error);
                }
                continue;
            }
        };
        if town.is_some_and(|name| !record.matches_name(name)) {
            continue;
        }

        let name = record.display_name().to_string();
        match gate(&mut record, &config.rediscovery) {
            Gate::Skip(reason) => println!("  - {}: skipped ({})", name, reason),
            Gate::NoChange { platform, reason } => {
                println!("  - {} [{}]: no_change ({})", name, platform, reason)
            }
            Gate::Attempt {
                platform,
                base_home,
            } => {
                attempts += 1;
                println!("  - {} [{}]: attempt from {}", name, platform, base_home);
            }
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would attempt rediscovery for {} records", attempts);
}

/// Handles the main rediscovery run
async fn handle_run(
    cli: &Cli,
    config: Config,
    config_hash: String,
    dataset: &mut Dataset,
) -> anyhow::Result<()> {
    let started_at = chrono::Utc::now();
    let timer = Instant::now();

    if let Some(town) = &cli.town {
        tracing::info!("Town-only mode: {}", town);
    }

    let engine = Rediscoverer::new(config)?;
    let (results, statistics) = engine.run_dataset(dataset, cli.town.as_deref()).await;

    if cli.town.is_some() && results.is_empty() {
        tracing::warn!("No record matched the requested town");
    }

    save_dataset(dataset, &cli.output)
        .with_context(|| format!("failed to write dataset {}", cli.output.display()))?;
    write_report(&results, &cli.report)
        .with_context(|| format!("failed to write report {}", cli.report.display()))?;

    tracing::info!("Wrote updated dataset: {}", cli.output.display());
    tracing::info!("Wrote report: {}", cli.report.display());

    if !cli.quiet {
        println!();
        print_statistics(&statistics);
    }

    if let Some(path) = &cli.summary {
        let summary = RunSummary {
            started_at: started_at.to_rfc3339(),
            finished_at: Some(chrono::Utc::now().to_rfc3339()),
            duration_seconds: Some(timer.elapsed().as_secs()),
            config_hash,
            input_path: cli.input.display().to_string(),
            town_filter: cli.town.clone(),
            statistics,
            results,
        };
        generate_markdown_summary(&summary, path)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
        tracing::info!("Wrote summary: {}", path.display());
    }

    Ok(())
}
