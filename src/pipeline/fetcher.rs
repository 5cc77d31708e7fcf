use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use reqwest::blocking::Client;
use tracing::debug;

use crate::config::FetchConfig;
use crate::data_model::FetchedDocument;
use crate::error::{PipelineError, Result};

/// Retrieves the document behind a reference and stores it locally.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, reference: &str) -> Result<FetchedDocument>;
}

/// Blocking HTTP fetcher. One GET per reference, no retries; files in the
/// raw directory are overwritten.
pub struct HttpFetcher {
    client: Client,
    raw_dir: PathBuf,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| PipelineError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        fs::create_dir_all(&config.raw_dir)?;
        Ok(HttpFetcher {
            client,
            raw_dir: config.raw_dir.clone(),
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, reference: &str) -> Result<FetchedDocument> {
        let response = self
            .client
            .get(reference)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| PipelineError::fetch(reference, e))?;
        let bytes = response
            .bytes()
            .map_err(|e| PipelineError::fetch(reference, e))?
            .to_vec();

        let path = self.raw_dir.join(derive_file_name(reference));
        fs::write(&path, &bytes).map_err(|e| PipelineError::fetch(reference, e))?;
        debug!(url = reference, path = %path.display(), bytes = bytes.len(), "Stored document");

        Ok(FetchedDocument {
            reference: reference.to_string(),
            path,
            bytes,
        })
    }
}

/// Local file name for a URL: its last path segment with `.pdf` appended
/// when missing. Falls back to the current time in milliseconds.
pub fn derive_file_name(url: &str) -> String {
    let path = url.split(&['?', '#'][..]).next().unwrap_or_default();
    let segment = path
        .trim_end_matches(&['/', '\n'][..])
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let name = if segment.is_empty() {
        Utc::now().timestamp_millis().to_string()
    } else {
        segment.to_string()
    };

    if name.to_lowercase().ends_with(".pdf") {
        name
    } else {
        format!("{}.pdf", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_comes_from_last_segment() {
        assert_eq!(derive_file_name("https://h/docs/GeM-Bidding-123.pdf"), "GeM-Bidding-123.pdf");
        assert_eq!(derive_file_name("https://h/docs/REPORT.PDF"), "REPORT.PDF");
        assert_eq!(derive_file_name("https://h/showbidDocument/7310946"), "7310946.pdf");
        assert_eq!(derive_file_name("https://h/docs/a.pdf/\n"), "a.pdf");
        assert_eq!(derive_file_name("https://h/get?id=5"), "get.pdf");
    }

    #[test]
    fn empty_segment_falls_back_to_timestamp() {
        let name = derive_file_name("");
        let stem = name.strip_suffix(".pdf").unwrap();
        assert!(!stem.is_empty());
        assert!(stem.chars().all(|c| c.is_ascii_digit()));
    }
}
