//! Repository operations, one module per entity.

pub mod access;
pub mod assessments;
pub mod candidates;
pub mod clients;
pub mod finance;
pub mod jobs;
pub mod links;
pub mod stats;

use chrono::{DateTime, NaiveDate, Utc};
use recruta_core::DATE_FORMAT;

pub(crate) fn date_to_sql(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

pub(crate) fn date_from_sql(value: Option<String>) -> Option<NaiveDate> {
    value.and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok())
}

pub(crate) fn timestamp_from_sql(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Trim a free-text field, mapping blank input to `None`.
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
