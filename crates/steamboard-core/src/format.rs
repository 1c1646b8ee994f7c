//! Display helpers for dates and labels

use chrono::format::{DelayedFormat, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::fmt::Write;

/// Format used when the caller does not supply one (e.g. `Mon 10 Jun`)
pub const DEFAULT_DISPLAY_FORMAT: &str = "%a %d %b";

/// Format a raw timestamp for display, or return `default` when it is absent
/// or cannot be read.
///
/// Accepted inputs, tried in order: RFC 3339 timestamps, `YYYY-MM-DD`,
/// `YYYY/MM/DD`, and integer Unix milliseconds.
pub fn format_date(raw: Option<&str>, format: Option<&str>, default: &str) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return default.to_string();
    };
    let format = format.unwrap_or(DEFAULT_DISPLAY_FORMAT);

    let rendered = if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        render(ts.format(format))
    } else if let Some(date) = parse_plain_date(raw) {
        render(date.and_time(NaiveTime::MIN).format(format))
    } else if let Some(ts) = raw
        .parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
    {
        render(ts.format(format))
    } else {
        tracing::debug!("Unreadable date '{}', using default", raw);
        None
    };

    rendered.unwrap_or_else(|| default.to_string())
}

/// Render without panicking on format specifiers the value cannot satisfy
fn render(formatted: DelayedFormat<StrftimeItems<'_>>) -> Option<String> {
    let mut out = String::new();
    match write!(out, "{}", formatted) {
        Ok(()) => Some(out),
        Err(_) => {
            tracing::debug!("Date format not applicable to value, using default");
            None
        }
    }
}

fn parse_plain_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .ok()
}

/// Upper-case the first character, leave the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
