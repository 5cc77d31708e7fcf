use lopdf::Document;
use tracing::debug;

use super::base_extractor::TextExtractor;
use crate::data_model::FetchedDocument;
use crate::error::Result;

/// Secondary strategy: page-by-page text through `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn new() -> Self {
        LopdfExtractor
    }
}

impl TextExtractor for LopdfExtractor {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract(&self, document: &FetchedDocument) -> Result<String> {
        let pdf = match Document::load_mem(&document.bytes) {
            Ok(pdf) => pdf,
            Err(e) => {
                debug!(url = %document.reference, error = %e, "lopdf could not load document");
                return Ok(String::new());
            }
        };

        // get_pages is keyed by page number, so iteration follows page order.
        let mut pages = Vec::new();
        for page_number in pdf.get_pages().keys() {
            match pdf.extract_text(&[*page_number]) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    debug!(url = %document.reference, page = page_number, error = %e, "lopdf skipped page");
                }
            }
        }

        Ok(pages.join("\n").trim().to_string())
    }
}
