use anyhow::Context;
use chrono::{Datelike, Local, NaiveDate};

/// Resolves "today" for the query window. An explicit `YYYY-MM-DD` wins;
/// otherwise the local calendar date is used, matching what a user at the
/// selection control would see.
pub fn resolve_today(today_arg: Option<&str>) -> anyhow::Result<NaiveDate> {
    if let Some(s) = today_arg {
        return NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid date {s:?}, expected YYYY-MM-DD"));
    }
    Ok(Local::now().date_naive())
}

/// First day of the calendar month before `today`. January wraps to December
/// of the previous year.
pub fn previous_month_start(today: NaiveDate) -> NaiveDate {
    let (year, month) = match today.month() {
        1 => (today.year() - 1, 12),
        m => (today.year(), m - 1),
    };
    // Day 1 exists in every month of every representable year.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(today)
}
