use crate::data_model::DocumentReference;
use crate::error::Result;

/// A source of document references (one URL per input row).
pub trait BaseReader {
    /// All non-empty references, in input order.
    fn read_references(&self) -> Result<Vec<DocumentReference>>;
}
