use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::data_model::ProcessingResult;
use crate::error::Result;
use crate::pipeline::writers::report::ReportKind;
use crate::pipeline::writers::BaseWriter;

fn create_schema(kind: ReportKind) -> SchemaRef {
    Arc::new(Schema::new(
        kind.columns()
            .into_iter()
            .map(|name| Field::new(name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ))
}

/// Writes one report (structured JSON or mapped) to a Parquet file.
pub struct ParquetReportWriter {
    kind: ReportKind,
    schema: SchemaRef,
    writer: Option<ArrowWriter<File>>,
}

impl ParquetReportWriter {
    pub fn new<P: AsRef<Path>>(path: P, kind: ReportKind) -> Result<Self> {
        let schema = create_schema(kind);
        let file = File::create(path)?;
        let props = WriterProperties::builder().build();
        let writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        Ok(ParquetReportWriter {
            kind,
            schema,
            writer: Some(writer),
        })
    }
}

impl BaseWriter for ParquetReportWriter {
    fn write_batch(&mut self, results: &[ProcessingResult]) -> Result<()> {
        if results.is_empty() {
            return Ok(());
        }

        let mut builders: Vec<StringBuilder> = self
            .schema
            .fields()
            .iter()
            .map(|_| StringBuilder::new())
            .collect();

        for result in results {
            let row = self.kind.row(result)?;
            for (builder, value) in builders.iter_mut().zip(row) {
                builder.append_option(value);
            }
        }

        let columns: Vec<ArrayRef> = builders
            .iter_mut()
            .map(|builder| Arc::new(builder.finish()) as ArrayRef)
            .collect();
        let batch = RecordBatch::try_new(self.schema.clone(), columns)?;

        if let Some(writer) = self.writer.as_mut() {
            writer.write(&batch)?;
        }

        Ok(())
    }

    fn close(mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.close()?;
        }
        Ok(())
    }
}
