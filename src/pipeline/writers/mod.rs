// Declare the writer modules
pub mod base_writer;
pub mod parquet_writer;
pub mod report;
pub mod xlsx_writer;

pub use base_writer::BaseWriter;
pub use parquet_writer::ParquetReportWriter;
pub use report::ReportKind;
pub use xlsx_writer::XlsxReportWriter;
