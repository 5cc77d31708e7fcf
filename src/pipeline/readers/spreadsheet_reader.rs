use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::config::InputConfig;
use crate::data_model::DocumentReference;
use crate::error::{PipelineError, Result};
use crate::pipeline::readers::base_reader::BaseReader;

/// Reads document references from the first sheet of an `.xlsx`, `.xlsm`,
/// `.xlsb`, `.xls` or `.ods` workbook. The first row is the header.
#[derive(Debug)]
pub struct SpreadsheetReader {
    config: InputConfig,
}

impl SpreadsheetReader {
    pub fn new(config: InputConfig) -> Self {
        SpreadsheetReader { config }
    }
}

impl BaseReader for SpreadsheetReader {
    fn read_references(&self) -> Result<Vec<DocumentReference>> {
        let mut workbook = open_workbook_auto(Path::new(&self.config.path))?;
        let range = workbook.worksheet_range_at(0).ok_or_else(|| {
            PipelineError::ConfigError(format!(
                "Input workbook '{}' has no sheets.",
                self.config.path
            ))
        })??;

        let mut rows = range.rows();
        let header = rows.next().unwrap_or(&[]);
        let column_idx = header
            .iter()
            .position(|cell| cell_text(cell).as_deref() == Some(self.config.url_column.as_str()))
            .ok_or_else(|| missing_column(&self.config.url_column))?;

        Ok(rows
            .filter_map(|row| row.get(column_idx).and_then(cell_text))
            .collect())
    }
}

pub(crate) fn missing_column(name: &str) -> PipelineError {
    PipelineError::ConfigError(format!("Input must contain column named '{}'", name))
}

/// Trimmed text of a cell, or `None` when the cell is blank.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cells_are_skipped() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String("   ".to_string())), None);
        assert_eq!(
            cell_text(&Data::String(" http://h/a.pdf ".to_string())).as_deref(),
            Some("http://h/a.pdf")
        );
    }

    #[test]
    fn missing_workbook_is_an_error() {
        let reader = SpreadsheetReader::new(InputConfig::new("does_not_exist.xlsx"));
        assert!(reader.read_references().is_err());
    }
}
