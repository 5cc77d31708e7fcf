// src/utils/prometheus_metrics.rs

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_gauge, register_histogram, Counter,
    CounterVec, Encoder, Gauge, Histogram, TextEncoder,
};

use crate::error::{PipelineError, Result};

pub static REFERENCES_PROCESSED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "harvest_references_processed_total",
        "Total number of document references processed (any outcome)."
    )
    .expect("Failed to register harvest_references_processed_total counter")
});

pub static DOWNLOAD_ERRORS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "harvest_download_errors_total",
        "Total number of references whose document could not be fetched."
    )
    .expect("Failed to register harvest_download_errors_total counter")
});

pub static OCR_ERRORS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "harvest_ocr_errors_total",
        "Total number of references whose OCR fallback failed."
    )
    .expect("Failed to register harvest_ocr_errors_total counter")
});

pub static RECORDS_PARSED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "harvest_records_parsed_total",
        "Total number of bid records produced by the field extractor."
    )
    .expect("Failed to register harvest_records_parsed_total counter")
});

pub static TEXT_BY_STRATEGY_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "harvest_text_by_strategy_total",
        "Number of documents whose text came from each extraction strategy.",
        &["strategy"]
    )
    .expect("Failed to register harvest_text_by_strategy_total counter")
});

pub static EMPTY_TEXT_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "harvest_empty_text_total",
        "Number of documents for which no strategy produced text."
    )
    .expect("Failed to register harvest_empty_text_total counter")
});

pub static REFERENCES_IN_FLIGHT: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "harvest_references_in_flight",
        "Number of references currently being processed by workers."
    )
    .expect("Failed to register harvest_references_in_flight gauge")
});

pub static REFERENCE_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "harvest_reference_duration_seconds",
        "Histogram of per-reference processing time (fetch, extract, parse)."
    )
    .expect("Failed to register harvest_reference_duration_seconds histogram")
});

/// Renders every registered metric in the Prometheus text exposition format.
pub fn render_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| PipelineError::Unexpected(format!("Metrics output is not UTF-8: {}", e)))
}
