// src/pipeline/fields/mod.rs

pub mod coerce;
mod field_extractor;
pub mod rules;

pub use field_extractor::FieldExtractor;
pub use rules::{BidField, PatternCascade, RuleTable};
