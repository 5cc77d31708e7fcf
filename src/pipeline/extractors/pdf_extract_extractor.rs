use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use super::base_extractor::TextExtractor;
use crate::data_model::FetchedDocument;
use crate::error::Result;

/// Primary strategy: the embedded text layer as read by `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractExtractor;

impl PdfExtractExtractor {
    pub fn new() -> Self {
        PdfExtractExtractor
    }
}

impl TextExtractor for PdfExtractExtractor {
    fn name(&self) -> &'static str {
        "pdf_extract"
    }

    fn extract(&self, document: &FetchedDocument) -> Result<String> {
        // The backend panics on some malformed inputs.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&document.bytes)
        }));

        match outcome {
            Ok(Ok(text)) => Ok(text.trim().to_string()),
            Ok(Err(e)) => {
                debug!(url = %document.reference, error = %e, "pdf_extract could not read document");
                Ok(String::new())
            }
            Err(_) => {
                debug!(url = %document.reference, "pdf_extract panicked while reading document");
                Ok(String::new())
            }
        }
    }
}
