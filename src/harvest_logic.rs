use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, info_span};

use crate::config::{InputConfig, PipelineConfig, ReportFormat};
use crate::data_model::{ErrorKind, ProcessingResult};
use crate::error::Result;
use crate::executor::PipelineExecutor;
use crate::pipeline::readers::open_reader;
use crate::pipeline::writers::{BaseWriter, ParquetReportWriter, ReportKind, XlsxReportWriter};
use crate::utils::progress::{create_progress_bar, HARVEST_TEMPLATE};

pub const REPORT_WRITE_BATCH_SIZE: usize = 500;

/// Counts for one run, logged by the binary at the end.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub parsed: usize,
    pub empty_records: usize,
    pub download_errors: usize,
    pub ocr_errors: usize,
    pub structured_json_path: PathBuf,
    pub mapped_path: PathBuf,
    pub elapsed: Duration,
}

impl RunSummary {
    fn from_results(results: &[ProcessingResult], reports: (PathBuf, PathBuf), elapsed: Duration) -> Self {
        let count_kind = |kind: ErrorKind| {
            results
                .iter()
                .filter(|r| r.error.as_ref().map(|e| e.kind) == Some(kind))
                .count()
        };
        RunSummary {
            total: results.len(),
            parsed: results.iter().filter(|r| r.record.is_some()).count(),
            empty_records: results
                .iter()
                .filter(|r| r.record.as_ref().map_or(false, |rec| rec.is_empty()))
                .count(),
            download_errors: count_kind(ErrorKind::DownloadError),
            ocr_errors: count_kind(ErrorKind::OcrError),
            structured_json_path: reports.0,
            mapped_path: reports.1,
            elapsed,
        }
    }
}

/// Reads the input table, processes every reference and writes both reports.
///
/// Per-reference failures end up in the reports. Only problems with the
/// configuration, the input file or the output directory abort the run.
pub fn run_harvest(config: &PipelineConfig, input: &InputConfig) -> Result<RunSummary> {
    let _span = info_span!("harvest", input = %input.path).entered();
    let started = Instant::now();
    config.validate()?;

    let references = open_reader(input)?.read_references()?;
    info!(
        references = references.len(),
        workers = config.workers,
        ocr_enabled = config.ocr.enabled,
        "Loaded document references"
    );

    fs::create_dir_all(&config.output.out_dir)?;
    let executor = PipelineExecutor::from_config(config)?;

    let pb = create_progress_bar(references.len() as u64, "Harvesting", HARVEST_TEMPLATE);
    let results = executor.run_batch_parallel(&references, config.workers, |_| pb.inc(1))?;
    pb.finish_and_clear();

    let reports = write_reports(&results, &config.output.out_dir, config.output.format)?;
    Ok(RunSummary::from_results(&results, reports, started.elapsed()))
}

/// Writes the structured-JSON and mapped reports into `out_dir` and returns
/// their paths in that order.
pub fn write_reports(
    results: &[ProcessingResult],
    out_dir: &Path,
    format: ReportFormat,
) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(out_dir)?;
    let structured = write_report(results, out_dir, ReportKind::StructuredJson, format)?;
    let mapped = write_report(results, out_dir, ReportKind::Mapped, format)?;
    Ok((structured, mapped))
}

fn write_report(
    results: &[ProcessingResult],
    out_dir: &Path,
    kind: ReportKind,
    format: ReportFormat,
) -> Result<PathBuf> {
    let path = out_dir.join(kind.file_name(format));
    match format {
        ReportFormat::Parquet => write_all(ParquetReportWriter::new(&path, kind)?, results)?,
        ReportFormat::Xlsx => write_all(XlsxReportWriter::new(&path, kind)?, results)?,
    }
    info!(path = %path.display(), rows = results.len(), "Report written");
    Ok(path)
}

fn write_all<W: BaseWriter>(mut writer: W, results: &[ProcessingResult]) -> Result<()> {
    for batch in results.chunks(REPORT_WRITE_BATCH_SIZE) {
        writer.write_batch(batch)?;
    }
    writer.close()
}
