// src/pipeline/readers/mod.rs

pub mod base_reader;
pub mod parquet_reader;
pub mod spreadsheet_reader;

use std::path::Path;

pub use base_reader::BaseReader;
pub use parquet_reader::ParquetReader;
pub use spreadsheet_reader::SpreadsheetReader;

use crate::config::InputConfig;
use crate::error::{PipelineError, Result};

/// Picks a reader from the input file extension.
pub fn open_reader(config: &InputConfig) -> Result<Box<dyn BaseReader>> {
    let extension = Path::new(&config.path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("parquet") => Ok(Box::new(ParquetReader::new(config.clone()))),
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => {
            Ok(Box::new(SpreadsheetReader::new(config.clone())))
        }
        _ => Err(PipelineError::ConfigError(format!(
            "Unsupported input file '{}': expected .xlsx, .xlsm, .xlsb, .xls, .ods or .parquet",
            config.path
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = open_reader(&InputConfig::new("links.csv")).err().unwrap();
        assert!(matches!(err, PipelineError::ConfigError(msg) if msg.contains("links.csv")));
        assert!(open_reader(&InputConfig::new("links.XLSX")).is_ok());
        assert!(open_reader(&InputConfig::new("links.parquet")).is_ok());
    }
}
