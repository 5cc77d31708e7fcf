use crate::error::{PipelineError, Result};
use crate::pipeline::fields::rules::RuleTable;
use clap::ValueEnum;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_WORKERS: usize = 6;

/// Run-wide settings read from YAML. Every section is optional; a missing
/// file section falls back to the defaults below.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    pub workers: usize,
    pub fetch: FetchConfig,
    pub ocr: OcrConfig,
    pub output: OutputConfig,
    /// Additional regexes per field name, tried after the built-in ones.
    pub extra_patterns: BTreeMap<String, Vec<String>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            workers: DEFAULT_WORKERS,
            fetch: FetchConfig::default(),
            ocr: OcrConfig::default(),
            output: OutputConfig::default(),
            extra_patterns: BTreeMap::new(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(PipelineError::ConfigValidationError(
                "workers must be greater than 0.".to_string(),
            ));
        }
        self.fetch.validate()?;
        self.ocr.validate()?;

        RuleTable::with_extra_patterns(&self.extra_patterns)?;
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub raw_dir: PathBuf,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            timeout_secs: 30,
            raw_dir: PathBuf::from("data/raw"),
            user_agent: format!("BidHarvester/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(PipelineError::ConfigValidationError(
                "fetch.timeout_secs must be greater than 0.".to_string(),
            ));
        }
        if self.raw_dir.as_os_str().is_empty() {
            return Err(PipelineError::ConfigValidationError(
                "fetch.raw_dir must not be empty.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for the last-resort OCR strategy. Rendering and recognition are
/// delegated to external programs found on PATH.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct OcrConfig {
    pub enabled: bool,
    pub max_pages: u32,
    pub dpi: u32,
    pub language: String,
    pub renderer_bin: String,
    pub recognizer_bin: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        OcrConfig {
            enabled: true,
            max_pages: 2,
            dpi: 200,
            language: "eng".to_string(),
            renderer_bin: "pdftoppm".to_string(),
            recognizer_bin: "tesseract".to_string(),
        }
    }
}

impl OcrConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_pages == 0 {
            return Err(PipelineError::ConfigValidationError(
                "ocr.max_pages must be greater than 0.".to_string(),
            ));
        }
        if !(72..=600).contains(&self.dpi) {
            return Err(PipelineError::ConfigValidationError(format!(
                "ocr.dpi must be between 72 and 600, got {}.",
                self.dpi
            )));
        }
        if self.language.trim().is_empty() {
            return Err(PipelineError::ConfigValidationError(
                "ocr.language must not be empty.".to_string(),
            ));
        }
        Ok(())
    }
}

/// File format of the two reports.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Parquet,
    Xlsx,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Parquet => "parquet",
            ReportFormat::Xlsx => "xlsx",
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub out_dir: PathBuf,
    pub format: ReportFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            out_dir: PathBuf::from("outputs"),
            format: ReportFormat::default(),
        }
    }
}

/// Loads, parses and validates the pipeline configuration YAML file.
pub fn load_pipeline_config<P: AsRef<Path>>(config_path: P) -> Result<PipelineConfig> {
    let path_ref = config_path.as_ref();
    let config_content = fs::read_to_string(path_ref).map_err(|e| {
        PipelineError::ConfigError(format!(
            "Failed to read pipeline config file '{}': {}",
            path_ref.display(),
            e
        ))
    })?;

    let config: PipelineConfig = serde_yaml::from_str(&config_content).map_err(|e| {
        PipelineError::ConfigError(format!(
            "Failed to parse pipeline config YAML from '{}': {}",
            path_ref.display(),
            e
        ))
    })?;

    config.validate()?;

    Ok(config)
}
