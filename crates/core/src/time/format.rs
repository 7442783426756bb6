use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;

/// Display pattern for table cells, `MM/DD/YYYY`.
pub const TABLE_DATE_FORMAT: &str = "%m/%d/%Y";
/// Display pattern for chart axis labels, `MM/DD`.
pub const CHART_LABEL_FORMAT: &str = "%m/%d";

// Socrata "floating timestamp", e.g. 2021-03-01T00:00:00.000
const FLOATING_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    UnparseableDate { raw: String },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::UnparseableDate { raw } => write!(f, "unparseable date: {raw:?}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Parses the calendar day out of an API date value. Accepts floating
/// timestamps, RFC 3339 timestamps (the day in their own offset), bare
/// `YYYY-MM-DD` dates, and the `MM/DD/YYYY` display form.
pub fn parse_api_date(raw: &str) -> Result<NaiveDate, FormatError> {
    let s = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, FLOATING_TIMESTAMP) {
        return Ok(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    NaiveDate::parse_from_str(s, TABLE_DATE_FORMAT).map_err(|_| FormatError::UnparseableDate {
        raw: raw.to_string(),
    })
}

pub fn format_date(raw: &str, pattern: &str) -> Result<String, FormatError> {
    parse_api_date(raw).map(|d| d.format(pattern).to_string())
}

pub fn table_date(raw: &str) -> Result<String, FormatError> {
    format_date(raw, TABLE_DATE_FORMAT)
}

pub fn chart_label(raw: &str) -> Result<String, FormatError> {
    format_date(raw, CHART_LABEL_FORMAT)
}
