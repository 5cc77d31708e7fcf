//! Flattening of processing results into report rows.

use serde_json::Value;

use crate::config::ReportFormat;
use crate::data_model::{BidRecord, ProcessingResult};
use crate::error::Result;
use crate::utils::text::sanitize_cell;

pub const STRUCTURED_JSON_STEM: &str = "structuredJSON";
pub const MAPPED_STEM: &str = "mapped_output";

/// The two reports a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// `url` plus the whole record as one JSON text blob.
    StructuredJson,
    /// One column per record field, plus `url`, `pdf_path`, `text_source`
    /// and `error`.
    Mapped,
}

impl ReportKind {
    pub fn file_name(&self, format: ReportFormat) -> String {
        let stem = match self {
            ReportKind::StructuredJson => STRUCTURED_JSON_STEM,
            ReportKind::Mapped => MAPPED_STEM,
        };
        format!("{}.{}", stem, format.extension())
    }

    /// Worksheet name used when the report is a workbook.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            ReportKind::StructuredJson => "structuredJSON",
            ReportKind::Mapped => "mapped",
        }
    }

    pub fn columns(&self) -> Vec<&'static str> {
        match self {
            ReportKind::StructuredJson => vec!["url", "json"],
            ReportKind::Mapped => {
                let mut columns = BidRecord::COLUMNS.to_vec();
                columns.extend(["url", "pdf_path", "text_source", "error"]);
                columns
            }
        }
    }

    /// Cells for one result, aligned with `columns()`. Every text cell is
    /// sanitized; nested values are written as JSON text.
    pub fn row(&self, result: &ProcessingResult) -> Result<Vec<Option<String>>> {
        let url = Some(sanitize_cell(&result.url));
        match self {
            ReportKind::StructuredJson => {
                let json = result
                    .record
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?
                    .map(|s| sanitize_cell(&s));
                Ok(vec![url, json])
            }
            ReportKind::Mapped => {
                let record = result
                    .record
                    .as_ref()
                    .map(serde_json::to_value)
                    .transpose()?;
                let mut cells: Vec<Option<String>> = BidRecord::COLUMNS
                    .iter()
                    .map(|column| record.as_ref().and_then(|r| r.get(*column)).and_then(cell))
                    .collect();
                cells.push(url);
                cells.push(
                    result
                        .pdf_path
                        .as_ref()
                        .map(|p| sanitize_cell(&p.display().to_string())),
                );
                cells.push(result.text_source.map(str::to_string));
                cells.push(result.error.as_ref().map(|e| sanitize_cell(&e.to_string())));
                Ok(cells)
            }
        }
    }
}

fn cell(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(sanitize_cell(s)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested => Some(sanitize_cell(&nested.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_model::{Coerced, ErrorTag};
    use crate::pipeline::fields::FieldExtractor;
    use std::path::PathBuf;

    fn parsed() -> ProcessingResult {
        let record = BidRecord {
            bid_number: Some("GEM/2024/B/1\u{1}".to_string()),
            quantity: Some(Coerced::Value(1250)),
            reverse_auction: Some(true),
            ..BidRecord::default()
        };
        ProcessingResult::parsed(
            "http://h/a.pdf",
            PathBuf::from("data/raw/a.pdf"),
            record,
            Some("pdf_extract"),
        )
    }

    #[test]
    fn mapped_row_aligns_with_columns() {
        let kind = ReportKind::Mapped;
        let columns = kind.columns();
        let row = kind.row(&parsed()).unwrap();
        assert_eq!(columns.len(), row.len());

        let at = |name: &str| row[columns.iter().position(|c| *c == name).unwrap()].clone();
        assert_eq!(at("bid_number").as_deref(), Some("GEM/2024/B/1 "));
        assert_eq!(at("quantity").as_deref(), Some("1250"));
        assert_eq!(at("reverse_auction").as_deref(), Some("true"));
        assert_eq!(at("ministry"), None);
        assert_eq!(
            at("prebid").as_deref(),
            Some(r#"{"datetime":null,"venue":null}"#)
        );
        assert_eq!(at("url").as_deref(), Some("http://h/a.pdf"));
        assert_eq!(at("pdf_path").as_deref(), Some("data/raw/a.pdf"));
        assert_eq!(at("text_source").as_deref(), Some("pdf_extract"));
        assert_eq!(at("error"), None);
    }

    #[test]
    fn failed_result_has_only_url_and_error() {
        let result = ProcessingResult::failed("http://h/b.pdf", None, ErrorTag::download("refused"));
        let row = ReportKind::Mapped.row(&result).unwrap();
        let filled: Vec<_> = row.iter().flatten().cloned().collect();
        assert_eq!(filled, vec!["http://h/b.pdf".to_string(), "download_error:refused".to_string()]);

        let row = ReportKind::StructuredJson.row(&result).unwrap();
        assert_eq!(row, vec![Some("http://h/b.pdf".to_string()), None]);
    }

    #[test]
    fn structured_json_is_sanitized() {
        let row = ReportKind::StructuredJson.row(&parsed()).unwrap();
        let json = row[1].as_deref().unwrap();
        assert!(!json.contains('\u{1}'));
        assert!(json.contains("\"quantity\":1250"));
    }

    #[test]
    fn oversized_amount_survives_as_raw_text() {
        let digits = "9".repeat(400);
        let record = FieldExtractor::default().extract_fields(&format!("EMD Amount: {}", digits));
        assert_eq!(record.emd_amount_in_inr, Some(Coerced::Raw(digits.clone())));

        let result = ProcessingResult::parsed("http://h/a.pdf", PathBuf::from("a.pdf"), record, None);
        let columns = ReportKind::Mapped.columns();
        let row = ReportKind::Mapped.row(&result).unwrap();
        let idx = columns.iter().position(|c| *c == "emd_amount_in_inr").unwrap();
        assert_eq!(row[idx].as_deref(), Some(digits.as_str()));
    }

    #[test]
    fn file_names_follow_format() {
        assert_eq!(
            ReportKind::StructuredJson.file_name(ReportFormat::Parquet),
            "structuredJSON.parquet"
        );
        assert_eq!(ReportKind::Mapped.file_name(ReportFormat::Xlsx), "mapped_output.xlsx");
        assert_eq!(ReportKind::Mapped.sheet_name(), "mapped");
    }
}
