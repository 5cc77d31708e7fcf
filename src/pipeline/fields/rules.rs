//! The rule table: one ordered pattern cascade per Bid Record field.
//!
//! Cascades are plain data. The extractor only asks a cascade for its first
//! match, so patterns can be added (from configuration) without touching the
//! orchestration code.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::error::{PipelineError, Result};

/// Every field the rule table can populate. Nested sub-record fields are
/// flattened with their parent's prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BidField {
    BidNumber,
    BidDate,
    Ministry,
    Department,
    Organisation,
    ItemCategory,
    Quantity,
    EstimatedValue,
    EndDatetime,
    OpenDatetime,
    ValidityDays,
    TypeOfBid,
    ReverseAuction,
    EmdAmount,
    EpbgPercent,
    EpbgMonths,
    MseExemption,
    StartupExemption,
    MiiPurchasePreference,
    MsePurchasePreference,
    EvaluationMethod,
    PrebidDatetime,
    PrebidVenue,
    DeliveryQty,
    DeliveryDays,
    DeliveryConsignee,
    DeliveryAddress,
}

impl BidField {
    pub const ALL: [BidField; 27] = [
        BidField::BidNumber,
        BidField::BidDate,
        BidField::Ministry,
        BidField::Department,
        BidField::Organisation,
        BidField::ItemCategory,
        BidField::Quantity,
        BidField::EstimatedValue,
        BidField::EndDatetime,
        BidField::OpenDatetime,
        BidField::ValidityDays,
        BidField::TypeOfBid,
        BidField::ReverseAuction,
        BidField::EmdAmount,
        BidField::EpbgPercent,
        BidField::EpbgMonths,
        BidField::MseExemption,
        BidField::StartupExemption,
        BidField::MiiPurchasePreference,
        BidField::MsePurchasePreference,
        BidField::EvaluationMethod,
        BidField::PrebidDatetime,
        BidField::PrebidVenue,
        BidField::DeliveryQty,
        BidField::DeliveryDays,
        BidField::DeliveryConsignee,
        BidField::DeliveryAddress,
    ];

    /// Name used in configuration (`extra_patterns`) and logs.
    pub fn name(&self) -> &'static str {
        match self {
            BidField::BidNumber => "bid_number",
            BidField::BidDate => "bid_date",
            BidField::Ministry => "ministry",
            BidField::Department => "department",
            BidField::Organisation => "organisation",
            BidField::ItemCategory => "item_category",
            BidField::Quantity => "quantity",
            BidField::EstimatedValue => "estimated_value_in_inr",
            BidField::EndDatetime => "end_datetime",
            BidField::OpenDatetime => "open_datetime",
            BidField::ValidityDays => "validity_days",
            BidField::TypeOfBid => "type_of_bid",
            BidField::ReverseAuction => "reverse_auction",
            BidField::EmdAmount => "emd_amount_in_inr",
            BidField::EpbgPercent => "epbg_percent",
            BidField::EpbgMonths => "epbg_months",
            BidField::MseExemption => "mse_exemption",
            BidField::StartupExemption => "startup_exemption",
            BidField::MiiPurchasePreference => "mii_purchase_preference",
            BidField::MsePurchasePreference => "mse_purchase_preference",
            BidField::EvaluationMethod => "evaluation_method",
            BidField::PrebidDatetime => "prebid_datetime",
            BidField::PrebidVenue => "prebid_venue",
            BidField::DeliveryQty => "delivery_qty",
            BidField::DeliveryDays => "delivery_days",
            BidField::DeliveryConsignee => "delivery_consignee",
            BidField::DeliveryAddress => "delivery_address",
        }
    }

    pub fn from_name(name: &str) -> Option<BidField> {
        BidField::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Built-in patterns, most specific first. Order is the only tie-break.
    pub fn default_patterns(&self) -> &'static [&'static str] {
        match self {
            BidField::BidNumber => &[
                r"Bid\s*No\b\.?[:\s]*([A-Za-z0-9\-/]+)",
                r"Bid Number[:\s]*([A-Za-z0-9\-/]+)",
                r"Tender No\b\.?[:\s]*([A-Za-z0-9\-/]+)",
            ],
            BidField::BidDate => &[
                r"Bid Date[:\s]*([0-9]{1,2}[\-/]\d{1,2}[\-/]\d{2,4})",
                r"Date[:\s]*([0-9]{1,2}\s+\w+\s+\d{4})",
                r"Date of publication[:\s]*([0-9]{1,2}[\s\w\-/,]+)",
            ],
            BidField::Ministry => &[r"Ministry[:\s]*(.+)", r"Ministry/Department[:\s]*(.+)"],
            BidField::Department => &[r"Department[:\s]*(.+)", r"Dept\b\.?[:\s]*(.+)"],
            BidField::Organisation => &[
                r"Organi[sz]ation Name[:\s]*(.+)",
                r"Organi[sz]ation[:\s]*(.+)",
            ],
            BidField::ItemCategory => &[
                r"Category[:\s]*(.+)",
                r"Item Category[:\s]*(.+)",
                r"Item\(s\)[:\s]*(.+)",
            ],
            BidField::Quantity => &[
                r"Quantity[:\s]*([0-9,]+)",
                r"Qty\b[:\s]*([0-9,]+)",
                r"Quantity\(Nos\)[:\s]*([0-9,]+)",
                r"Total Quantity[:\s]*([0-9,]+)",
            ],
            BidField::EstimatedValue => &[
                r"Estimated Value[:\s]*([₹Rs\.,\s0-9A-Za-z/-]+)",
                r"Estimated Cost[:\s]*([₹Rs\.,\s0-9A-Za-z/-]+)",
                r"Estimated Contract Value[:\s]*([₹Rs\.,\s0-9A-Za-z/-]+)",
            ],
            BidField::EndDatetime => &[
                r"End Date(?:/Time)?[:\s]*([0-9A-Za-z:,\- ]+)",
                r"Closing Date[:\s]*([0-9A-Za-z:,\- ]+)",
                r"Submission Ends[:\s]*([0-9A-Za-z:,\- ]+)",
                r"Bid Submission End Date[:\s]*([0-9A-Za-z:,\- ]+)",
            ],
            BidField::OpenDatetime => &[
                r"Opening Date(?:/Time)?[:\s]*([0-9A-Za-z:,\- ]+)",
                r"Bid Opening[:\s]*([0-9A-Za-z:,\- ]+)",
                r"Bid Opening Date[:\s]*([0-9A-Za-z:,\- ]+)",
            ],
            BidField::ValidityDays => &[
                r"Offer Validity[^0-9\n]*([0-9]+)",
                r"Bid Validity[^0-9\n]*([0-9]+)",
                r"Validity[:\s]*([0-9]+)\s*days",
            ],
            BidField::TypeOfBid => &[r"Type of Bid[:\s]*(.+)", r"Bid Type[:\s]*(.+)"],
            BidField::ReverseAuction => &[r"Reverse Auction[:\s]*(Yes|No)", r"Reverse Auction"],
            BidField::EmdAmount => &[
                r"EMD Amount[:\s]*([₹Rs\.,\s0-9A-Za-z/-]+)",
                r"EMD[:\s]*([₹Rs\.,\s0-9A-Za-z/-]+)",
            ],
            BidField::EpbgPercent => &[
                r"EPBG[:\s]*([0-9.]+)\s*%",
                r"EPBG[:\s]*([0-9.]+)\s*percent",
                r"EPBG Percentage\s*\(%\)[:\s]*([0-9.]+)",
            ],
            BidField::EpbgMonths => &[
                r"EPBG Months[:\s]*([0-9]+)",
                r"EPBG[:\s]*([0-9]+)\s*months",
                r"EPBG Duration[^0-9\n]*([0-9]+)",
            ],
            BidField::MseExemption => &[r"MSE Exemption[:\s]*(Yes|No)", r"MSE Exemption"],
            BidField::StartupExemption => {
                &[r"Startup Exemption[:\s]*(Yes|No)", r"Startup Exemption"]
            }
            BidField::MiiPurchasePreference => &[
                r"MII Purchase Preference[:\s]*(Yes|No)",
                r"MII Purchase Preference",
            ],
            BidField::MsePurchasePreference => &[
                r"MSE Purchase Preference[:\s]*(Yes|No)",
                r"MSE Purchase Preference",
            ],
            BidField::EvaluationMethod => &[
                r"Evaluation Method[:\s]*(.+)",
                r"Type of Evaluation[:\s]*(.+)",
            ],
            BidField::PrebidDatetime => &[
                r"Pre-?bid Meeting[:\s]*Date[:\s]*([0-9A-Za-z:,\- ]+)",
                r"Pre-?bid Meeting Date[:\s]*([0-9A-Za-z:,\- ]+)",
            ],
            BidField::PrebidVenue => &[
                r"Pre-?bid Venue[:\s]*(.+)",
                r"Pre-?bid Meeting Venue[:\s]*(.+)",
                r"Pre-?bid Meeting[:\s]*Venue[:\s]*(.+)",
            ],
            BidField::DeliveryQty => &[
                r"Delivery Qty[:\s]*([0-9,]+)",
                r"Delivery Quantity[:\s]*([0-9,]+)",
                r"Qty to be supplied[:\s]*([0-9,]+)",
            ],
            BidField::DeliveryDays => &[
                r"Delivery Period[:\s]*([0-9]+)\s*days",
                r"Delivery within[:\s]*([0-9]+)\s*days",
                r"Delivery Days[:\s]*([0-9]+)",
            ],
            BidField::DeliveryConsignee => &[
                r"Consignee[:\s]*(.+)",
                r"Delivery Address[:\s]*(.+)",
                r"Consignee Name[:\s]*(.+)",
            ],
            BidField::DeliveryAddress => &[r"Address[:\s]*(.+)", r"Delivery Address[:\s]*(.+)"],
        }
    }
}

/// Compiles a pattern with the matching rules every cascade shares:
/// case-insensitive, and `.` also matches line breaks.
fn compile_pattern(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
}

/// An ordered list of patterns for one field, evaluated until one matches.
#[derive(Debug, Clone)]
pub struct PatternCascade {
    patterns: Vec<Regex>,
}

impl PatternCascade {
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                compile_pattern(p.as_ref()).map_err(|e| {
                    PipelineError::ConfigValidationError(format!(
                        "Invalid field pattern '{}': {}",
                        p.as_ref(),
                        e
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(PatternCascade { patterns })
    }

    /// Value of the first pattern that matches: its first non-empty capture
    /// group, or the whole match when no group captured anything. Trimmed;
    /// an empty value counts as no match for that pattern's field.
    pub fn find_first(&self, text: &str) -> Option<String> {
        for regex in &self.patterns {
            if let Some(caps) = regex.captures(text) {
                let raw = caps
                    .iter()
                    .skip(1)
                    .flatten()
                    .map(|m| m.as_str())
                    .find(|s| !s.is_empty())
                    .or_else(|| caps.get(0).map(|m| m.as_str()))
                    .unwrap_or_default();
                let value = raw.trim();
                return if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
        }
        None
    }

    /// Presence check: does any pattern match anywhere in the text.
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|regex| regex.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    fn extend(&mut self, other: PatternCascade) {
        self.patterns.extend(other.patterns);
    }
}

static BUILTIN_RULES: Lazy<RuleTable> = Lazy::new(|| {
    let cascades = BidField::ALL
        .iter()
        .map(|field| {
            let cascade = PatternCascade::compile(field.default_patterns())
                .expect("built-in field patterns must compile");
            (*field, cascade)
        })
        .collect();
    RuleTable { cascades }
});

/// Field → cascade mapping used by the field extractor.
#[derive(Debug, Clone)]
pub struct RuleTable {
    cascades: HashMap<BidField, PatternCascade>,
}

impl RuleTable {
    pub fn builtin() -> Self {
        BUILTIN_RULES.clone()
    }

    /// Built-in cascades with configured patterns appended after them, so the
    /// built-ins keep priority.
    pub fn with_extra_patterns(extra: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut table = RuleTable::builtin();
        for (name, patterns) in extra {
            let field = BidField::from_name(name).ok_or_else(|| {
                PipelineError::ConfigValidationError(format!(
                    "extra_patterns refers to unknown field '{}'.",
                    name
                ))
            })?;
            let compiled = PatternCascade::compile(patterns.as_slice())?;
            table
                .cascades
                .entry(field)
                .or_insert_with(|| PatternCascade {
                    patterns: Vec::new(),
                })
                .extend(compiled);
        }
        Ok(table)
    }

    pub fn cascade(&self, field: BidField) -> Option<&PatternCascade> {
        self.cascades.get(&field)
    }

    pub fn find_first(&self, field: BidField, text: &str) -> Option<String> {
        self.cascade(field).and_then(|c| c.find_first(text))
    }

    pub fn matches(&self, field: BidField, text: &str) -> bool {
        self.cascade(field).map_or(false, |c| c.matches(text))
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        RuleTable::builtin()
    }
}
