use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

/// A URL identifying a retrievable document. One per input row.
pub type DocumentReference = String;

/// Raw bytes of one retrieved document together with where they were stored.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub reference: DocumentReference,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// A typed value, or the raw matched text when coercion to the type failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coerced<T> {
    Value(T),
    Raw(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreBidMeeting {
    pub datetime: Option<String>,
    pub venue: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub qty: Option<Coerced<i64>>,
    pub days: Option<Coerced<i64>>,
    pub consignee: Option<String>,
    pub address: Option<String>,
}

/// Structured fields recovered from one procurement document.
///
/// Every field is optional; presence only means some pattern fired. Nothing
/// checks consistency between fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BidRecord {
    pub bid_number: Option<String>,
    pub bid_date: Option<Coerced<NaiveDate>>,
    pub ministry: Option<String>,
    pub department: Option<String>,
    pub organisation: Option<String>,
    pub item_category: Option<String>,
    pub quantity: Option<Coerced<i64>>,
    pub estimated_value_in_inr: Option<String>,
    pub end_datetime: Option<String>,
    pub open_datetime: Option<String>,
    pub validity_days: Option<Coerced<i64>>,
    pub type_of_bid: Option<String>,
    pub reverse_auction: Option<bool>,
    pub emd_amount_in_inr: Option<Coerced<f64>>,
    pub epbg_percent: Option<Coerced<f64>>,
    pub epbg_months: Option<Coerced<i64>>,
    pub mse_exemption: Option<bool>,
    pub startup_exemption: Option<bool>,
    pub mii_purchase_preference: Option<bool>,
    pub mse_purchase_preference: Option<bool>,
    pub evaluation_method: Option<String>,
    pub prebid: PreBidMeeting,
    pub delivery: Delivery,
}

impl BidRecord {
    /// Column names in serialization order, used by the flattened report.
    pub const COLUMNS: &'static [&'static str] = &[
        "bid_number",
        "bid_date",
        "ministry",
        "department",
        "organisation",
        "item_category",
        "quantity",
        "estimated_value_in_inr",
        "end_datetime",
        "open_datetime",
        "validity_days",
        "type_of_bid",
        "reverse_auction",
        "emd_amount_in_inr",
        "epbg_percent",
        "epbg_months",
        "mse_exemption",
        "startup_exemption",
        "mii_purchase_preference",
        "mse_purchase_preference",
        "evaluation_method",
        "prebid",
        "delivery",
    ];

    /// True when no pattern fired at all.
    pub fn is_empty(&self) -> bool {
        self == &BidRecord::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DownloadError,
    OcrError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DownloadError => "download_error",
            ErrorKind::OcrError => "ocr_error",
        }
    }
}

/// Why a reference produced no record. Renders as `<kind>:<cause>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTag {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorTag {
    pub fn download(message: impl Into<String>) -> Self {
        ErrorTag {
            kind: ErrorKind::DownloadError,
            message: message.into(),
        }
    }

    pub fn ocr(message: impl Into<String>) -> Self {
        ErrorTag {
            kind: ErrorKind::OcrError,
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.message)
    }
}

impl Serialize for ErrorTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-reference outcome. A record and an error tag are never both present.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    pub url: DocumentReference,
    pub pdf_path: Option<PathBuf>,
    #[serde(rename = "json")]
    pub record: Option<BidRecord>,
    pub text_source: Option<&'static str>, // Strategy that produced the text, if any
    pub error: Option<ErrorTag>,
}

impl ProcessingResult {
    pub fn parsed(
        url: &str,
        pdf_path: PathBuf,
        record: BidRecord,
        text_source: Option<&'static str>,
    ) -> Self {
        ProcessingResult {
            url: url.to_string(),
            pdf_path: Some(pdf_path),
            record: Some(record),
            text_source,
            error: None,
        }
    }

    pub fn failed(url: &str, pdf_path: Option<PathBuf>, error: ErrorTag) -> Self {
        ProcessingResult {
            url: url.to_string(),
            pdf_path,
            record: None,
            text_source: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
