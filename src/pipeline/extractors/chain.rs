use tracing::debug;

use super::base_extractor::TextExtractor;
use super::lopdf_extractor::LopdfExtractor;
use super::ocr_extractor::OcrExtractor;
use super::pdf_extract_extractor::PdfExtractExtractor;
use crate::config::OcrConfig;
use crate::data_model::FetchedDocument;
use crate::error::Result;
use crate::utils::prometheus_metrics::{EMPTY_TEXT_TOTAL, TEXT_BY_STRATEGY_TOTAL};

/// Text produced by the chain and which strategy produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub strategy: Option<&'static str>, // None when every strategy came back empty
}

impl ExtractedText {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Ordered fallback over extraction strategies: the first non-empty result wins.
pub struct ExtractionChain {
    strategies: Vec<Box<dyn TextExtractor>>,
}

impl ExtractionChain {
    pub fn new(strategies: Vec<Box<dyn TextExtractor>>) -> Self {
        ExtractionChain { strategies }
    }

    /// `pdf-extract`, then `lopdf`, then OCR when enabled.
    pub fn standard(ocr: &OcrConfig) -> Self {
        let mut strategies: Vec<Box<dyn TextExtractor>> = vec![
            Box::new(PdfExtractExtractor::new()),
            Box::new(LopdfExtractor::new()),
        ];
        if ocr.enabled {
            strategies.push(Box::new(OcrExtractor::new(ocr.clone())));
        }
        ExtractionChain::new(strategies)
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn extract(&self, document: &FetchedDocument) -> Result<ExtractedText> {
        for strategy in &self.strategies {
            debug!(url = %document.reference, strategy = strategy.name(), "Trying extraction strategy");
            let text = strategy.extract(document)?;
            if !text.trim().is_empty() {
                TEXT_BY_STRATEGY_TOTAL
                    .with_label_values(&[strategy.name()])
                    .inc();
                return Ok(ExtractedText {
                    text,
                    strategy: Some(strategy.name()),
                });
            }
        }

        EMPTY_TEXT_TOTAL.inc();
        debug!(url = %document.reference, "No strategy produced text");
        Ok(ExtractedText {
            text: String::new(),
            strategy: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed {
        name: &'static str,
        text: &'static str,
        calls: Arc<AtomicUsize>,
    }

    impl TextExtractor for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn extract(&self, _document: &FetchedDocument) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.to_string())
        }
    }

    struct Failing;

    impl TextExtractor for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn extract(&self, _document: &FetchedDocument) -> Result<String> {
            Err(PipelineError::OcrError("renderer crashed".to_string()))
        }
    }

    fn document() -> FetchedDocument {
        FetchedDocument {
            reference: "http://localhost/a.pdf".to_string(),
            path: PathBuf::from("a.pdf"),
            bytes: Vec::new(),
        }
    }

    fn fixed(name: &'static str, text: &'static str) -> (Box<dyn TextExtractor>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategy = Fixed {
            name,
            text,
            calls: Arc::clone(&calls),
        };
        (Box::new(strategy), calls)
    }

    #[test]
    fn first_non_empty_strategy_wins_and_later_ones_are_skipped() {
        let (first, first_calls) = fixed("first", "  \n ");
        let (second, second_calls) = fixed("second", "Bid No: 1");
        let (third, third_calls) = fixed("third", "ignored");
        let chain = ExtractionChain::new(vec![first, second, third]);

        let extracted = chain.extract(&document()).unwrap();
        assert_eq!(extracted.text, "Bid No: 1");
        assert_eq!(extracted.strategy, Some("second"));
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
        assert_eq!(third_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn all_empty_yields_empty_text_without_error() {
        let (a, _) = fixed("a", "");
        let (b, _) = fixed("b", "");
        let extracted = ExtractionChain::new(vec![a, b]).extract(&document()).unwrap();
        assert!(extracted.is_empty());
        assert_eq!(extracted.strategy, None);
    }

    #[test]
    fn strategy_error_stops_the_chain() {
        let (a, _) = fixed("a", "");
        let (after, after_calls) = fixed("after", "text");
        let chain = ExtractionChain::new(vec![a, Box::new(Failing), after]);
        assert!(matches!(
            chain.extract(&document()),
            Err(PipelineError::OcrError(_))
        ));
        assert_eq!(after_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn standard_chain_respects_ocr_switch() {
        let mut ocr = OcrConfig::default();
        assert_eq!(
            ExtractionChain::standard(&ocr).strategy_names(),
            vec!["pdf_extract", "lopdf", "ocr"]
        );
        ocr.enabled = false;
        assert_eq!(
            ExtractionChain::standard(&ocr).strategy_names(),
            vec!["pdf_extract", "lopdf"]
        );
    }
}
