use crate::data_model::ProcessingResult;
use crate::error::Result;

/// Trait for writing batches of processing results to an output sink (e.g. file).
pub trait BaseWriter {
    /// Write a batch of results to the sink.
    fn write_batch(&mut self, results: &[ProcessingResult]) -> Result<()>;

    /// Finalize and close the output writer.
    fn close(self) -> Result<()>;
}
