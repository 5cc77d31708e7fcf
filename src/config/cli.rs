// --- Command-Line Arguments Struct ---
use super::input::{InputConfig, DEFAULT_INPUT_FILE, DEFAULT_URL_COLUMN};
use super::pipeline::{PipelineConfig, ReportFormat};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Harvest structured tender fields from linked PDF documents", long_about = None)]
pub struct Args {
    /// Spreadsheet or Parquet file listing one document URL per row
    #[arg(default_value = DEFAULT_INPUT_FILE)]
    pub input_file: String,

    /// Name of the column holding the document URLs
    #[arg(long, default_value = DEFAULT_URL_COLUMN)]
    pub url_column: String,

    /// Optional YAML pipeline configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of documents processed concurrently (overrides the config file)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Directory where downloaded documents are stored
    #[arg(long)]
    pub raw_dir: Option<PathBuf>,

    /// Directory where the two reports are written
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// File format of the reports (overrides the config file)
    #[arg(long, value_enum)]
    pub report_format: Option<ReportFormat>,

    /// Disable the OCR fallback entirely
    #[arg(long, default_value_t = false)]
    pub no_ocr: bool,

    /// Maximum number of pages rendered for OCR
    #[arg(long)]
    pub ocr_max_pages: Option<u32>,

    /// Per-request download timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Optional: also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, default_value_t = false)]
    pub log_json: bool,

    /// Optional: dump Prometheus metrics in text format to this file at the end of the run
    #[arg(long)]
    pub metrics_file: Option<PathBuf>,

    /// Load and validate the configuration, then exit without processing
    #[arg(long, default_value_t = false)]
    pub validate_config: bool,
}

impl Args {
    /// Applies command-line overrides on top of a loaded (or default) configuration.
    pub fn apply_to(&self, config: &mut PipelineConfig) {
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(raw_dir) = &self.raw_dir {
            config.fetch.raw_dir = raw_dir.clone();
        }
        if let Some(out_dir) = &self.out_dir {
            config.output.out_dir = out_dir.clone();
        }
        if let Some(format) = self.report_format {
            config.output.format = format;
        }
        if self.no_ocr {
            config.ocr.enabled = false;
        }
        if let Some(max_pages) = self.ocr_max_pages {
            config.ocr.max_pages = max_pages;
        }
        if let Some(timeout) = self.timeout_secs {
            config.fetch.timeout_secs = timeout;
        }
    }

    pub fn input_config(&self) -> InputConfig {
        InputConfig {
            path: self.input_file.clone(),
            url_column: self.url_column.clone(),
            batch_size: None,
        }
    }
}
