use crate::data_model::FetchedDocument;
use crate::error::Result;

/// One way of turning a fetched document into plain text.
///
/// Strategies return `Ok("")` when they cannot read the document, so the
/// chain can fall through to the next one. An `Err` aborts the chain and is
/// reserved for tooling failures the caller has to report.
pub trait TextExtractor: Send + Sync {
    fn name(&self) -> &'static str; // For logging and metrics labels

    fn extract(&self, document: &FetchedDocument) -> Result<String>;
}
