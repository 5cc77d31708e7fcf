//! Type coercion for matched field values. Coercion never fails: a value that
//! cannot be converted is kept as the raw matched string.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::data_model::Coerced;

static NUMBER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d[\d,]*(?:\.\d+)?").unwrap());
static DAY_FIRST_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[-/.](\d{1,2})[-/.](\d{4}|\d{2})\b").unwrap());
static YEAR_FIRST_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})\b").unwrap());
static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").unwrap());

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Integer with thousands separators and whitespace stripped ("1,250" → 1250).
pub fn coerce_integer(raw: &str) -> Coerced<i64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();
    match cleaned.parse::<i64>() {
        Ok(value) => Coerced::Value(value),
        Err(_) => Coerced::Raw(raw.to_string()),
    }
}

/// Float taken from the first number in the value, ignoring currency marks
/// and separators ("Rs. 50,000/-" → 50000.0). Values too large to be finite
/// stay raw.
pub fn coerce_float(raw: &str) -> Coerced<f64> {
    NUMBER_TOKEN
        .find(raw)
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .map(Coerced::Value)
        .unwrap_or_else(|| Coerced::Raw(raw.to_string()))
}

/// Calendar date, day-first. Accepts `dd-mm-yyyy` style numerics (falling
/// back to month-first when the day-first reading is impossible),
/// `yyyy-mm-dd`, and textual months in either order ("5 March 2024",
/// "March 5th, 2024").
pub fn coerce_date(raw: &str) -> Coerced<NaiveDate> {
    parse_date(raw.trim())
        .map(Coerced::Value)
        .unwrap_or_else(|| Coerced::Raw(raw.to_string()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Some(caps) = DAY_FIRST_DATE.captures(value) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year = expand_year(caps[3].parse().ok()?);
        return NaiveDate::from_ymd_opt(year, second, first)
            .or_else(|| NaiveDate::from_ymd_opt(year, first, second));
    }
    if let Some(caps) = YEAR_FIRST_DATE.captures(value) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    parse_textual_date(value)
}

fn parse_textual_date(value: &str) -> Option<NaiveDate> {
    let normalized = ORDINAL_SUFFIX
        .replace_all(value, "$1")
        .replace(&[',', '-', '/', '.'][..], " ");
    let tokens: Vec<&str> = normalized.split_whitespace().collect();

    tokens.windows(3).find_map(|w| {
        let year = expand_year(w[2].parse().ok()?);
        if let (Ok(day), Some(month)) = (w[0].parse::<u32>(), month_number(w[1])) {
            return NaiveDate::from_ymd_opt(year, month, day);
        }
        if let (Some(month), Ok(day)) = (month_number(w[0]), w[1].parse::<u32>()) {
            return NaiveDate::from_ymd_opt(year, month, day);
        }
        None
    })
}

/// Month index for a full or abbreviated (at least three letters) name.
fn month_number(token: &str) -> Option<u32> {
    let lower = token.to_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(&lower))
        .map(|idx| idx as u32 + 1)
}

fn expand_year(year: i32) -> i32 {
    if year < 100 {
        year + 2000
    } else {
        year
    }
}
