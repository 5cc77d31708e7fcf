mod common;

use std::path::PathBuf;

use tempfile::TempDir;
use BidHarvester::config::{InputConfig, ReportFormat};
use BidHarvester::data_model::{BidRecord, Coerced, ErrorTag, ProcessingResult};
use BidHarvester::error::{PipelineError, Result};
use BidHarvester::harvest_logic::write_reports;
use BidHarvester::pipeline::readers::{open_reader, BaseReader, ParquetReader};

use common::{read_string_column, write_url_parquet};

#[test]
fn parquet_reader_skips_null_and_blank_cells() -> Result<()> {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("links.parquet");
    write_url_parquet(
        &path,
        "pdf",
        &[
            Some("https://bidplus.gem.gov.in/showbidDocument/1"),
            None,
            Some("   "),
            Some(" https://bidplus.gem.gov.in/showbidDocument/2 "),
            Some(""),
        ],
    );

    let mut config = InputConfig::new(path.to_str().unwrap());
    config.batch_size = Some(2);
    let references = ParquetReader::new(config).read_references()?;

    assert_eq!(
        references,
        vec![
            "https://bidplus.gem.gov.in/showbidDocument/1".to_string(),
            "https://bidplus.gem.gov.in/showbidDocument/2".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn parquet_reader_honours_custom_column() -> Result<()> {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("links.parquet");
    write_url_parquet(&path, "document_url", &[Some("http://h/a.pdf")]);

    let mut config = InputConfig::new(path.to_str().unwrap());
    config.url_column = "document_url".to_string();
    let references = open_reader(&config)?.read_references()?;

    assert_eq!(references, vec!["http://h/a.pdf".to_string()]);
    Ok(())
}

#[test]
fn parquet_reader_reports_missing_column() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("links.parquet");
    write_url_parquet(&path, "link", &[Some("http://h/a.pdf")]);

    let config = InputConfig::new(path.to_str().unwrap());
    match open_reader(&config).unwrap().read_references() {
        Err(PipelineError::ConfigError(msg)) => {
            assert_eq!(msg, "Input must contain column named 'pdf'");
        }
        other => panic!("Expected ConfigError, got {:?}", other),
    }
}

#[test]
fn reports_are_readable_parquet() -> Result<()> {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let record = BidRecord {
        bid_number: Some("GEM/2024/B/4567890".to_string()),
        quantity: Some(Coerced::Value(1250)),
        validity_days: Some(Coerced::Raw("ninety".to_string())),
        mse_exemption: Some(true),
        ..BidRecord::default()
    };
    let results = vec![
        ProcessingResult::parsed(
            "http://h/a.pdf",
            PathBuf::from("data/raw/a.pdf"),
            record,
            Some("lopdf"),
        ),
        ProcessingResult::failed("http://h/b.pdf", None, ErrorTag::download("connection refused")),
        ProcessingResult::failed(
            "http://h/c.pdf",
            Some(PathBuf::from("data/raw/c.pdf")),
            ErrorTag::ocr("tesseract exited with 1"),
        ),
    ];

    let (structured, mapped) = write_reports(&results, dir.path(), ReportFormat::Parquet)?;
    assert_eq!(structured, dir.path().join("structuredJSON.parquet"));
    assert_eq!(mapped, dir.path().join("mapped_output.parquet"));

    let urls = read_string_column(&structured, "url");
    assert_eq!(urls.len(), 3);
    assert_eq!(urls[1].as_deref(), Some("http://h/b.pdf"));

    let json = read_string_column(&structured, "json");
    let first: serde_json::Value = serde_json::from_str(json[0].as_deref().unwrap()).unwrap();
    assert_eq!(first["bid_number"], "GEM/2024/B/4567890");
    assert_eq!(first["quantity"], 1250);
    assert_eq!(first["validity_days"], "ninety");
    assert!(first["ministry"].is_null());
    assert_eq!(json[1], None);
    assert_eq!(json[2], None);

    assert_eq!(
        read_string_column(&mapped, "quantity"),
        vec![Some("1250".to_string()), None, None]
    );
    assert_eq!(
        read_string_column(&mapped, "mse_exemption"),
        vec![Some("true".to_string()), None, None]
    );
    assert_eq!(
        read_string_column(&mapped, "error"),
        vec![
            None,
            Some("download_error:connection refused".to_string()),
            Some("ocr_error:tesseract exited with 1".to_string()),
        ]
    );
    assert_eq!(
        read_string_column(&mapped, "text_source"),
        vec![Some("lopdf".to_string()), None, None]
    );
    assert_eq!(
        read_string_column(&mapped, "pdf_path"),
        vec![
            Some("data/raw/a.pdf".to_string()),
            None,
            Some("data/raw/c.pdf".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn empty_result_set_still_writes_both_reports() -> Result<()> {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (structured, mapped) = write_reports(&[], &dir.path().join("nested/out"), ReportFormat::Parquet)?;

    assert!(structured.exists());
    assert!(mapped.exists());
    assert!(read_string_column(&mapped, "url").is_empty());
    Ok(())
}
