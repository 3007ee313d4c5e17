//! Date normalization.
//!
//! Authors write dates however they like. This module turns the common
//! conventions into canonical `YYYY-MM-DD` strings. Accepted forms, first
//! match wins:
//!
//! 1. `YYYY-MM-DD`
//! 2. `M-D-YYYY` / `MM-DD-YYYY`
//! 3. `M/D/YYYY` / `MM/DD/YYYY`
//! 4. `Month D, YYYY` with full or abbreviated English month names
//!
//! Blank strings and the placeholders `TBD`, `NA`, `N/A`, `None` mean "no
//! date". Everything else is unrecognized. Neither case is an error: the
//! date is simply absent, and the raw value can be kept for diagnostics
//! through [`NormalizedDate::original`].
//!
//! ```rust
//! use storymap_stories::dates::normalize_date_string;
//!
//! assert_eq!(normalize_date_string("March 4, 2024").as_deref(), Some("2024-03-04"));
//! assert_eq!(normalize_date_string("3/4/2024").as_deref(), Some("2024-03-04"));
//! assert_eq!(normalize_date_string("2023-02-30"), None);
//! assert_eq!(normalize_date_string("TBD"), None);
//! ```

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Output format of canonical dates.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

const PLACEHOLDERS: &[&str] = &["tbd", "na", "n/a", "none"];

static ISO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("Invalid ISO date regex"));

static DASHED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})-([0-9]{1,2})-([0-9]{4})$").expect("Invalid dashed date regex")
});

static SLASHED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})$").expect("Invalid slashed date regex")
});

static MONTH_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)\s+([0-9]{1,2}),\s*([0-9]{4})$").expect("Invalid month-name date regex")
});

/// How a raw date string was understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOutcome {
    /// A real calendar date in one of the accepted forms.
    Canonical(NaiveDate),
    /// Blank or an explicit placeholder; intentionally no date.
    Absent,
    /// An accepted form, but not a real calendar date (e.g. `2023-02-30`).
    InvalidCalendar,
    /// None of the accepted forms.
    Unrecognized,
}

impl DateOutcome {
    /// Canonical `YYYY-MM-DD` rendering, if any.
    pub fn canonical(&self) -> Option<String> {
        match self {
            DateOutcome::Canonical(date) => Some(date.format(CANONICAL_FORMAT).to_string()),
            _ => None,
        }
    }

    /// True when the input was neither usable nor intentionally empty.
    pub fn is_suspicious(&self) -> bool {
        matches!(self, DateOutcome::InvalidCalendar | DateOutcome::Unrecognized)
    }
}

/// Classify a raw date string.
pub fn classify_date(raw: &str) -> DateOutcome {
    let s = raw.trim();
    if s.is_empty() || PLACEHOLDERS.contains(&s.to_lowercase().as_str()) {
        return DateOutcome::Absent;
    }

    if let Some(caps) = ISO_RE.captures(s) {
        return calendar_date(&caps[1], &caps[2], &caps[3]);
    }
    if let Some(caps) = DASHED_RE.captures(s) {
        return calendar_date(&caps[3], &caps[1], &caps[2]);
    }
    if let Some(caps) = SLASHED_RE.captures(s) {
        return calendar_date(&caps[3], &caps[1], &caps[2]);
    }
    if let Some(caps) = MONTH_NAME_RE.captures(s) {
        let Some(month) = month_from_name(&caps[1]) else {
            return DateOutcome::Unrecognized;
        };
        return match (caps[3].parse::<i32>(), caps[2].parse::<u32>()) {
            (Ok(year), Ok(day)) => from_parts(year, month, day),
            _ => DateOutcome::InvalidCalendar,
        };
    }

    DateOutcome::Unrecognized
}

/// Normalize a raw date string to `YYYY-MM-DD`, or `None` when there is no
/// usable date.
pub fn normalize_date_string(raw: &str) -> Option<String> {
    classify_date(raw).canonical()
}

/// A normalized date plus the author's raw input when normalization changed
/// or discarded it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDate {
    /// Canonical date, if one could be derived.
    pub date: Option<String>,
    /// Raw input, kept only when it differs from `date` and is not blank.
    pub original: Option<String>,
}

/// Normalize a metadata `date` value, keeping the raw input for audit.
pub fn normalize_date_field(raw: &str) -> NormalizedDate {
    let date = normalize_date_string(raw);
    let original = match &date {
        Some(canonical) if canonical == raw => None,
        _ if raw.trim().is_empty() => None,
        _ => Some(raw.to_string()),
    };
    NormalizedDate { date, original }
}

fn calendar_date(year: &str, month: &str, day: &str) -> DateOutcome {
    match (year.parse::<i32>(), month.parse::<u32>(), day.parse::<u32>()) {
        (Ok(year), Ok(month), Ok(day)) => from_parts(year, month, day),
        _ => DateOutcome::InvalidCalendar,
    }
}

/// A (year, month, day) triple is valid only if it names a real day.
fn from_parts(year: i32, month: u32, day: u32) -> DateOutcome {
    if year < 1 {
        return DateOutcome::InvalidCalendar;
    }
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => DateOutcome::Canonical(date),
        None => DateOutcome::InvalidCalendar,
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}
