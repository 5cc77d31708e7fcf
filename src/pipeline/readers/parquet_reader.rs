// src/pipeline/readers/parquet_reader.rs

use crate::config::InputConfig;
use crate::data_model::DocumentReference;
use crate::error::Result;
use crate::pipeline::readers::base_reader::BaseReader;
use crate::pipeline::readers::spreadsheet_reader::missing_column;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatchReader;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;

/// Reads document references from a column of a Parquet file.
#[derive(Debug)]
pub struct ParquetReader {
    config: InputConfig,
}

impl ParquetReader {
    /// Creates a new ParquetReader with the given configuration.
    pub fn new(config: InputConfig) -> Self {
        ParquetReader { config }
    }
}

impl BaseReader for ParquetReader {
    fn read_references(&self) -> Result<Vec<DocumentReference>> {
        let file = File::open(&self.config.path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let builder = if let Some(batch_size) = self.config.batch_size {
            builder.with_batch_size(batch_size)
        } else {
            builder
        };
        let record_batch_reader = builder.build()?;
        let schema = record_batch_reader.schema();

        let url_col_idx = schema
            .index_of(&self.config.url_column)
            .map_err(|_| missing_column(&self.config.url_column))?;

        let mut references = Vec::new();
        for batch in record_batch_reader {
            let batch = batch?;
            // Non-string columns (e.g. dictionary encoded) are cast to Utf8.
            let column = cast(batch.column(url_col_idx), &DataType::Utf8)?;
            let urls = column.as_string::<i32>();
            for i in 0..urls.len() {
                if urls.is_null(i) {
                    continue;
                }
                let url = urls.value(i).trim();
                if !url.is_empty() {
                    references.push(url.to_string());
                }
            }
        }
        Ok(references)
    }
}
