use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info_span, warn};

use crate::config::PipelineConfig;
use crate::data_model::{DocumentReference, ErrorTag, ProcessingResult};
use crate::error::{PipelineError, Result};
use crate::pipeline::extractors::ExtractionChain;
use crate::pipeline::fetcher::{Fetcher, HttpFetcher};
use crate::pipeline::fields::FieldExtractor;
use crate::utils::prometheus_metrics::{
    DOWNLOAD_ERRORS_TOTAL, OCR_ERRORS_TOTAL, RECORDS_PARSED_TOTAL, REFERENCES_IN_FLIGHT,
    REFERENCES_PROCESSED_TOTAL, REFERENCE_DURATION_SECONDS,
};

/// Runs fetch → text extraction → field extraction for each reference.
///
/// Every stage is shared read-only between workers; each reference is
/// processed independently and always yields exactly one result.
pub struct PipelineExecutor {
    fetcher: Box<dyn Fetcher>,
    chain: ExtractionChain,
    fields: FieldExtractor,
}

impl PipelineExecutor {
    pub fn new(fetcher: Box<dyn Fetcher>, chain: ExtractionChain, fields: FieldExtractor) -> Self {
        PipelineExecutor {
            fetcher,
            chain,
            fields,
        }
    }

    /// HTTP fetcher, standard extraction chain and configured rule table.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Ok(PipelineExecutor::new(
            Box::new(HttpFetcher::new(&config.fetch)?),
            ExtractionChain::standard(&config.ocr),
            FieldExtractor::from_config(config)?,
        ))
    }

    pub fn run_single(&self, reference: &str) -> ProcessingResult {
        let _span = info_span!("process_reference", url = reference).entered();
        let started = Instant::now();
        REFERENCES_IN_FLIGHT.inc();

        let result = self.process(reference);

        REFERENCES_IN_FLIGHT.dec();
        REFERENCES_PROCESSED_TOTAL.inc();
        REFERENCE_DURATION_SECONDS.observe(started.elapsed().as_secs_f64());
        result
    }

    fn process(&self, reference: &str) -> ProcessingResult {
        let document = match self.fetcher.fetch(reference) {
            Ok(document) => document,
            Err(e) => {
                DOWNLOAD_ERRORS_TOTAL.inc();
                warn!(url = reference, error = %e, "Download failed");
                return ProcessingResult::failed(reference, None, ErrorTag::download(fetch_cause(e)));
            }
        };

        let extracted = match self.chain.extract(&document) {
            Ok(extracted) => extracted,
            Err(e) => {
                OCR_ERRORS_TOTAL.inc();
                warn!(url = reference, error = %e, "OCR fallback failed");
                return ProcessingResult::failed(
                    reference,
                    Some(document.path),
                    ErrorTag::ocr(ocr_cause(e)),
                );
            }
        };
        debug!(
            url = reference,
            strategy = extracted.strategy.unwrap_or("none"),
            chars = extracted.text.len(),
            "Text extracted"
        );

        let record = self.fields.extract_fields(&extracted.text);
        RECORDS_PARSED_TOTAL.inc();
        ProcessingResult::parsed(reference, document.path, record, extracted.strategy)
    }

    /// Processes all references on a pool of `workers` threads and blocks until
    /// every one has a result. `on_done` is called from the worker thread as
    /// each reference finishes. Results come back in input order.
    pub fn run_batch_parallel<F>(
        &self,
        references: &[DocumentReference],
        workers: usize,
        on_done: F,
    ) -> Result<Vec<ProcessingResult>>
    where
        F: Fn(&ProcessingResult) + Send + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("harvest-worker-{}", i))
            .build()?;

        Ok(pool.install(|| {
            references
                .par_iter()
                .map(|reference| {
                    let result = self.run_single(reference);
                    on_done(&result);
                    result
                })
                .collect()
        }))
    }
}

// The tag carries the underlying cause, not the "Failed to fetch" wrapper.
fn fetch_cause(error: PipelineError) -> String {
    match error {
        PipelineError::FetchError { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}

fn ocr_cause(error: PipelineError) -> String {
    match error {
        PipelineError::OcrError(message) => message,
        other => other.to_string(),
    }
}
