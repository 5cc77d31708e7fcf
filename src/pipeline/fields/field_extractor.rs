use chrono::NaiveDate;
use tracing::debug;

use super::coerce::{coerce_date, coerce_float, coerce_integer};
use super::rules::{BidField, RuleTable};
use crate::config::PipelineConfig;
use crate::data_model::{BidRecord, Coerced, Delivery, PreBidMeeting};
use crate::error::Result;

/// Turns free text into a `BidRecord` by running each field's cascade.
///
/// Extraction is infallible: an unmatched field stays `None`, and a matched
/// value that does not coerce is kept as raw text.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    rules: RuleTable,
}

impl FieldExtractor {
    pub fn new(rules: RuleTable) -> Self {
        FieldExtractor { rules }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Ok(FieldExtractor::new(RuleTable::with_extra_patterns(
            &config.extra_patterns,
        )?))
    }

    pub fn extract_fields(&self, text: &str) -> BidRecord {
        let record = BidRecord {
            bid_number: self.text(BidField::BidNumber, text),
            bid_date: self.date(BidField::BidDate, text),
            ministry: self.text(BidField::Ministry, text),
            department: self.text(BidField::Department, text),
            organisation: self.text(BidField::Organisation, text),
            item_category: self.text(BidField::ItemCategory, text),
            quantity: self.integer(BidField::Quantity, text),
            estimated_value_in_inr: self.text(BidField::EstimatedValue, text),
            end_datetime: self.text(BidField::EndDatetime, text),
            open_datetime: self.text(BidField::OpenDatetime, text),
            validity_days: self.integer(BidField::ValidityDays, text),
            type_of_bid: self.text(BidField::TypeOfBid, text),
            reverse_auction: self.flag(BidField::ReverseAuction, text),
            emd_amount_in_inr: self.float(BidField::EmdAmount, text),
            epbg_percent: self.float(BidField::EpbgPercent, text),
            epbg_months: self.integer(BidField::EpbgMonths, text),
            mse_exemption: self.flag(BidField::MseExemption, text),
            startup_exemption: self.flag(BidField::StartupExemption, text),
            mii_purchase_preference: self.flag(BidField::MiiPurchasePreference, text),
            mse_purchase_preference: self.flag(BidField::MsePurchasePreference, text),
            evaluation_method: self.text(BidField::EvaluationMethod, text),
            prebid: PreBidMeeting {
                datetime: self.text(BidField::PrebidDatetime, text),
                venue: self.text(BidField::PrebidVenue, text),
            },
            delivery: Delivery {
                qty: self.integer(BidField::DeliveryQty, text),
                days: self.integer(BidField::DeliveryDays, text),
                consignee: self.text(BidField::DeliveryConsignee, text),
                address: self.text(BidField::DeliveryAddress, text),
            },
        };
        debug!(
            text_len = text.len(),
            empty = record.is_empty(),
            "Extracted bid fields"
        );
        record
    }

    fn text(&self, field: BidField, text: &str) -> Option<String> {
        self.rules.find_first(field, text)
    }

    fn integer(&self, field: BidField, text: &str) -> Option<Coerced<i64>> {
        self.text(field, text).map(|raw| coerce_integer(&raw))
    }

    fn float(&self, field: BidField, text: &str) -> Option<Coerced<f64>> {
        self.text(field, text).map(|raw| coerce_float(&raw))
    }

    fn date(&self, field: BidField, text: &str) -> Option<Coerced<NaiveDate>> {
        self.text(field, text).map(|raw| coerce_date(&raw))
    }

    // Presence only: "Reverse Auction: No" still sets the flag.
    fn flag(&self, field: BidField, text: &str) -> Option<bool> {
        self.rules.matches(field, text).then_some(true)
    }
}
