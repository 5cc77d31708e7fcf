use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};

use crate::data_model::ProcessingResult;
use crate::error::Result;
use crate::pipeline::writers::report::ReportKind;
use crate::pipeline::writers::BaseWriter;

/// Longest text a single worksheet cell accepts.
const MAX_CELL_CHARS: usize = 32_767;

/// Writes one report as a single-sheet workbook. Rows are buffered in the
/// workbook and the file is produced on `close`.
pub struct XlsxReportWriter {
    kind: ReportKind,
    path: PathBuf,
    workbook: Workbook,
    next_row: u32,
}

impl XlsxReportWriter {
    pub fn new<P: AsRef<Path>>(path: P, kind: ReportKind) -> Result<Self> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let sheet = workbook.add_worksheet();
        sheet.set_name(kind.sheet_name())?;
        for (col, name) in kind.columns().into_iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, name, &header)?;
        }

        Ok(XlsxReportWriter {
            kind,
            path: path.as_ref().to_path_buf(),
            workbook,
            next_row: 1,
        })
    }
}

impl BaseWriter for XlsxReportWriter {
    fn write_batch(&mut self, results: &[ProcessingResult]) -> Result<()> {
        let sheet = self.workbook.worksheet_from_index(0)?;
        for result in results {
            for (col, value) in self.kind.row(result)?.into_iter().enumerate() {
                if let Some(value) = value {
                    sheet.write_string(self.next_row, col as u16, fit_cell(&value))?;
                }
            }
            self.next_row += 1;
        }
        Ok(())
    }

    fn close(mut self) -> Result<()> {
        self.workbook.save(&self.path)?;
        Ok(())
    }
}

fn fit_cell(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_cells_are_cut_to_the_sheet_limit() {
        let long = "₹".repeat(MAX_CELL_CHARS + 10);
        assert_eq!(fit_cell(&long).chars().count(), MAX_CELL_CHARS);
        assert_eq!(fit_cell("short"), "short");
    }
}
