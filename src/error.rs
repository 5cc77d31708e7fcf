use thiserror::Error;

/// Custom Result type for this crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// The Error type for pipeline operations.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Configuration validation error: {0}")]
    ConfigValidationError(String),

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Parquet error: {source}")]
    ParquetError {
        #[from]
        source: parquet::errors::ParquetError,
    },

    #[error("Arrow conversion error: {source}")]
    ArrowError {
        #[from]
        source: arrow::error::ArrowError,
    },

    #[error("Spreadsheet reading error: {source}")]
    SpreadsheetError {
        #[from]
        source: calamine::Error,
    },

    #[error("Spreadsheet writing error: {source}")]
    XlsxError {
        #[from]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("Serialization/Deserialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    /// Retrieval of a document reference failed (status, network or local write).
    /// Never retried.
    #[error("Failed to fetch '{url}': {source}")]
    FetchError {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The OCR fallback was attempted and its tooling failed.
    #[error("OCR error: {0}")]
    OcrError(String),

    #[error("Worker pool error: {source}")]
    ThreadPoolError {
        #[from]
        source: rayon::ThreadPoolBuildError,
    },

    #[error("Metrics error: {source}")]
    MetricsError {
        #[from]
        source: prometheus::Error,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl PipelineError {
    pub fn fetch<E>(url: &str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        PipelineError::FetchError {
            url: url.to_string(),
            source: source.into(),
        }
    }
}
