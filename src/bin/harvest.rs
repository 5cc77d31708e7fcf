// src/bin/harvest.rs

//! # Harvest Binary
//!
//! Reads a table of procurement document URLs, downloads each document,
//! extracts its text (embedded text layer first, OCR as a last resort) and
//! pulls bid fields out of it with pattern cascades. Two Parquet reports are
//! written to the output directory: `structuredJSON.parquet` and
//! `mapped_output.parquet`.
//!
//! Failed references do not fail the run; they appear in the reports with an
//! error tag. The process exits non-zero only when the configuration, the
//! input file or the output directory is unusable.

use anyhow::Context;
use clap::Parser;
use indicatif::HumanDuration;
use tracing::{error, info};
use BidHarvester::config::{load_pipeline_config, Args, PipelineConfig};
use BidHarvester::harvest_logic::run_harvest;
use BidHarvester::utils::logging::init_tracing;
use BidHarvester::utils::prometheus_metrics::render_metrics;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let _log_guard = init_tracing(args.log_json, args.log_file.as_deref())?;

    let mut config = match &args.config {
        Some(path) => load_pipeline_config(path)?,
        None => PipelineConfig::default(),
    };
    args.apply_to(&mut config);
    config.validate()?;

    if args.validate_config {
        info!("Configuration is valid.");
        return Ok(());
    }

    let input = args.input_config();
    info!("Harvest started.");
    info!("Input file: {} (column '{}')", input.path, input.url_column);
    info!("Raw directory: {}", config.fetch.raw_dir.display());
    info!(
        "Output directory: {} ({} reports)",
        config.output.out_dir.display(),
        config.output.format.extension()
    );

    let summary = match run_harvest(&config, &input) {
        Ok(summary) => summary,
        Err(e) => {
            error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    info!("--------------------");
    info!("Harvest Summary:");
    info!("  References: {}", summary.total);
    info!("    - Parsed: {}", summary.parsed);
    info!("      (no fields found: {})", summary.empty_records);
    info!("    - Download errors: {}", summary.download_errors);
    info!("    - OCR errors: {}", summary.ocr_errors);
    info!("  Structured JSON report: {}", summary.structured_json_path.display());
    info!("  Mapped report: {}", summary.mapped_path.display());
    info!("  Elapsed: {}", HumanDuration(summary.elapsed));
    info!("--------------------");

    if let Some(path) = &args.metrics_file {
        std::fs::write(path, render_metrics()?)
            .with_context(|| format!("Failed to write metrics to '{}'", path.display()))?;
        info!("Metrics written to {}", path.display());
    }

    Ok(())
}
