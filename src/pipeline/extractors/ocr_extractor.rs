use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use itertools::Itertools;
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use super::base_extractor::TextExtractor;
use crate::config::OcrConfig;
use crate::data_model::FetchedDocument;
use crate::error::{PipelineError, Result};

/// Last-resort strategy for image-only documents.
///
/// Leading pages are rendered to PNG by an external renderer (`pdftoppm` by
/// default) and each image is passed to an external recognizer (`tesseract`
/// by default). Whether both programs exist is probed on first use; when
/// either is missing the strategy yields empty text instead of failing.
#[derive(Debug)]
pub struct OcrExtractor {
    config: OcrConfig,
    available: OnceCell<bool>,
}

impl OcrExtractor {
    pub fn new(config: OcrConfig) -> Self {
        OcrExtractor {
            config,
            available: OnceCell::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        *self.available.get_or_init(|| {
            let renderer = tool_present(&self.config.renderer_bin, "-v");
            let recognizer = tool_present(&self.config.recognizer_bin, "--version");
            if renderer && recognizer {
                info!(
                    renderer = %self.config.renderer_bin,
                    recognizer = %self.config.recognizer_bin,
                    "OCR tooling available"
                );
            } else {
                warn!(
                    renderer = %self.config.renderer_bin,
                    renderer_found = renderer,
                    recognizer = %self.config.recognizer_bin,
                    recognizer_found = recognizer,
                    "OCR tooling unavailable; scanned documents will yield no text"
                );
            }
            renderer && recognizer
        })
    }

    fn render_pages(&self, pdf_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let prefix = out_dir.join("page");
        let output = run_tool(
            Command::new(&self.config.renderer_bin)
                .arg("-png")
                .arg("-r")
                .arg(self.config.dpi.to_string())
                .arg("-f")
                .arg("1")
                .arg("-l")
                .arg(self.config.max_pages.to_string())
                .arg(pdf_path)
                .arg(&prefix),
            &self.config.renderer_bin,
        )?;
        ensure_success(&output, &self.config.renderer_bin)?;

        // pdftoppm zero-pads page numbers to a common width, so a lexical sort
        // is page order.
        let pages: Vec<PathBuf> = fs::read_dir(out_dir)
            .map_err(|e| PipelineError::OcrError(format!("Cannot list rendered pages: {}", e)))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().map_or(false, |ext| ext == "png"))
            .sorted()
            .take(self.config.max_pages as usize)
            .collect();
        Ok(pages)
    }

    fn recognize(&self, image: &Path) -> Result<String> {
        let output = run_tool(
            Command::new(&self.config.recognizer_bin)
                .arg(image)
                .arg("stdout")
                .arg("-l")
                .arg(&self.config.language),
            &self.config.recognizer_bin,
        )?;
        ensure_success(&output, &self.config.recognizer_bin)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TextExtractor for OcrExtractor {
    fn name(&self) -> &'static str {
        "ocr"
    }

    fn extract(&self, document: &FetchedDocument) -> Result<String> {
        if !self.config.enabled || !self.is_available() {
            return Ok(String::new());
        }

        let scratch = tempfile::tempdir()
            .map_err(|e| PipelineError::OcrError(format!("Cannot create scratch directory: {}", e)))?;
        let pdf_path = scratch.path().join("input.pdf");
        fs::write(&pdf_path, &document.bytes)
            .map_err(|e| PipelineError::OcrError(format!("Cannot stage document: {}", e)))?;
        let pages_dir = scratch.path().join("pages");
        fs::create_dir(&pages_dir)
            .map_err(|e| PipelineError::OcrError(format!("Cannot create page directory: {}", e)))?;

        let pages = self.render_pages(&pdf_path, &pages_dir)?;
        debug!(url = %document.reference, pages = pages.len(), "Running OCR over rendered pages");

        let text = pages
            .iter()
            .map(|page| self.recognize(page))
            .collect::<Result<Vec<_>>>()?
            .join("\n");
        Ok(text.trim().to_string())
    }
}

fn tool_present(bin: &str, version_flag: &str) -> bool {
    match Command::new(bin).arg(version_flag).output() {
        Ok(_) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            debug!(tool = bin, error = %e, "Probing OCR tool failed");
            false
        }
    }
}

fn run_tool(command: &mut Command, bin: &str) -> Result<Output> {
    command
        .output()
        .map_err(|e| PipelineError::OcrError(format!("Failed to run {}: {}", bin, e)))
}

fn ensure_success(output: &Output, bin: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(PipelineError::OcrError(format!(
        "{} exited with {}: {}",
        bin,
        output.status,
        String::from_utf8_lossy(&output.stderr).trim()
    )))
}
