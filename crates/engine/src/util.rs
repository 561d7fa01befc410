//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

/// Categories the application knows about.
///
/// Free-form labels are accepted too; a label matching one of these
/// (ignoring case, accents and spacing) is stored with this spelling.
pub const RECOGNIZED_CATEGORIES: [&str; 7] = [
    "Food",
    "Transport",
    "Entertainment",
    "Bills",
    "Shopping",
    "Health",
    "Other",
];

const MAX_CATEGORY_LEN: usize = 64;

/// Today's date in the local timezone, used when an expense has no date.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Validate a category label and return its stored form.
///
/// Whitespace runs collapse to one space; recognized categories get their
/// canonical spelling.
pub(crate) fn normalize_category(input: &str) -> ResultEngine<String> {
    let display = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if display.is_empty() {
        return Err(EngineError::InvalidCategory(
            "category must not be empty".to_string(),
        ));
    }
    if display.chars().count() > MAX_CATEGORY_LEN {
        return Err(EngineError::InvalidCategory(format!(
            "category must be at most {MAX_CATEGORY_LEN} characters"
        )));
    }

    let key = category_key(&display);
    if let Some(known) = RECOGNIZED_CATEGORIES
        .iter()
        .find(|known| category_key(known) == key)
    {
        return Ok((*known).to_string());
    }

    Ok(display)
}

/// Case and accent insensitive comparison key.
fn category_key(input: &str) -> String {
    input
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD`, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp or an
/// RFC 3339 timestamp; the time of day is dropped.
pub fn parse_date(input: &str) -> ResultEngine<NaiveDate> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(datetime.date());
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.date_naive());
    }
    Err(EngineError::InvalidDate(format!(
        "'{trimmed}' is not a calendar date (expected YYYY-MM-DD)"
    )))
}

/// Parse a `YYYY-MM` month into its first day.
pub fn parse_month(input: &str) -> ResultEngine<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d").map_err(|_| {
        EngineError::InvalidDate(format!("'{trimmed}' is not a month (expected YYYY-MM)"))
    })
}
