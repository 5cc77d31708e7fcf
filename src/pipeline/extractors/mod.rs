// src/pipeline/extractors/mod.rs

pub mod base_extractor;
mod chain;
pub mod lopdf_extractor;
pub mod ocr_extractor;
pub mod pdf_extract_extractor;

pub use base_extractor::TextExtractor;
pub use chain::{ExtractedText, ExtractionChain};
pub use lopdf_extractor::LopdfExtractor;
pub use ocr_extractor::OcrExtractor;
pub use pdf_extract_extractor::PdfExtractExtractor;
