//! Period window engine
//!
//! Turns a fixed reference instant and a [`PeriodCode`] into the boundaries
//! of the current reporting window and of the equal-length window right
//! before it. Everything here is a pure function of those two inputs.
//!
//! All boundaries are rendered as `yyyy/mm/dd` so that lexicographic and
//! chronological ordering coincide; the string predicates rely on that.

use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::CoreError;
use crate::period::{PeriodCode, ALL_TIME_SPAN, TODAY_SPAN};

/// Canonical, sortable date format for every derived boundary
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Format a date in the canonical `yyyy/mm/dd` form
pub fn format_canonical(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The fixed "now" every window of a session is anchored to.
///
/// The storefront's daily aggregates lag by one day, so a reference built
/// from a clock reading is yesterday's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReferenceInstant(NaiveDate);

impl ReferenceInstant {
    /// Use `date` as-is (already shifted)
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from a clock reading, shifting back one calendar day
    pub fn from_clock<Tz: TimeZone>(now: DateTime<Tz>) -> Self {
        Self::from_today(now.date_naive())
    }

    /// Build from the platform's "today", shifting back one calendar day
    pub fn from_today(today: NaiveDate) -> Self {
        Self(today - Duration::days(1))
    }

    /// Parse a real "today" given as `YYYY-MM-DD` or `YYYY/MM/DD`
    pub fn parse_today(s: &str) -> Result<Self, CoreError> {
        let today = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, DATE_FORMAT))
            .map_err(|_| CoreError::InvalidDate {
                value: s.to_string(),
                expected: "YYYY-MM-DD",
            })?;
        Ok(Self::from_today(today))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    fn minus_days(&self, days: i64) -> NaiveDate {
        self.0 - Duration::days(days)
    }
}

impl fmt::Display for ReferenceInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Serialize for ReferenceInstant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Serialize an optional boundary as `yyyy/mm/dd` (or null)
fn serialize_canonical<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => serializer.serialize_str(&format_canonical(*date)),
        None => serializer.serialize_none(),
    }
}

/// Boundaries derived from `(reference, period)`.
///
/// Both ends of each window are inclusive. A boundary is `None` when the
/// period does not define it: all four for "all time", and `current_from`
/// for "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedWindow {
    pub period: PeriodCode,
    pub span_days: i64,
    #[serde(serialize_with = "serialize_canonical")]
    pub current_from: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_canonical")]
    pub current_to: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_canonical")]
    pub previous_from: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_canonical")]
    pub previous_to: Option<NaiveDate>,
}

impl DerivedWindow {
    /// Compute the window for `period` anchored at `reference`
    pub fn compute(reference: ReferenceInstant, period: PeriodCode) -> Self {
        let span_days = period.span_days();
        let (current_from, current_to) = current_bounds(reference, span_days);
        let (previous_from, previous_to) = previous_bounds(reference, span_days);

        Self {
            period,
            span_days,
            current_from,
            current_to,
            previous_from,
            previous_to,
        }
    }

    /// True when no windowing applies; callers treat everything as current
    pub fn is_unbounded(&self) -> bool {
        self.span_days == ALL_TIME_SPAN
    }

    /// `current_from <= date <= current_to`; false if either end is absent
    pub fn contains_current(&self, date: NaiveDate) -> bool {
        within(date, self.current_from, self.current_to)
    }

    /// `previous_from <= date <= previous_to`; false if either end is absent
    pub fn contains_previous(&self, date: NaiveDate) -> bool {
        within(date, self.previous_from, self.previous_to)
    }

    /// String form of [`Self::contains_current`], comparing `yyyy/mm/dd` text
    pub fn is_in_current_period(&self, date: &str) -> bool {
        within_str(date, self.current_from, self.current_to)
    }

    /// String form of [`Self::contains_previous`], comparing `yyyy/mm/dd` text
    pub fn is_in_previous_period(&self, date: &str) -> bool {
        within_str(date, self.previous_from, self.previous_to)
    }

    pub fn current_from_str(&self) -> Option<String> {
        self.current_from.map(format_canonical)
    }

    pub fn current_to_str(&self) -> Option<String> {
        self.current_to.map(format_canonical)
    }

    pub fn previous_from_str(&self) -> Option<String> {
        self.previous_from.map(format_canonical)
    }

    pub fn previous_to_str(&self) -> Option<String> {
        self.previous_to.map(format_canonical)
    }
}

fn current_bounds(
    reference: ReferenceInstant,
    span_days: i64,
) -> (Option<NaiveDate>, Option<NaiveDate>) {
    match span_days {
        ALL_TIME_SPAN => (None, None),
        // reference is yesterday; the storefront's "today" is one day on
        TODAY_SPAN => (None, Some(reference.date() + Duration::days(1))),
        days => (Some(reference.minus_days(days)), Some(reference.date())),
    }
}

fn previous_bounds(
    reference: ReferenceInstant,
    span_days: i64,
) -> (Option<NaiveDate>, Option<NaiveDate>) {
    if span_days == ALL_TIME_SPAN {
        return (None, None);
    }
    // The doubled offset is intentional: previous_from = ref - 2 * (span + 1).
    // For "today" this collapses to the single day `reference`.
    let offset = span_days + 1;
    let previous_to = reference.minus_days(offset);
    let previous_from = reference.minus_days(offset * 2);
    (Some(previous_from), Some(previous_to))
}

fn within(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    match (from, to) {
        (Some(from), Some(to)) => from <= date && date <= to,
        _ => false,
    }
}

fn within_str(date: &str, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    match (from, to) {
        (Some(from), Some(to)) => {
            let (from, to) = (format_canonical(from), format_canonical(to));
            from.as_str() <= date && date <= to.as_str()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference() -> ReferenceInstant {
        ReferenceInstant::new(ymd(2024, 6, 9))
    }

    #[test]
    fn test_from_today_shifts_back_one_day() {
        let r = ReferenceInstant::from_today(ymd(2024, 6, 10));
        assert_eq!(r.date(), ymd(2024, 6, 9));
        assert_eq!(r.to_string(), "2024/06/09");
    }

    #[test]
    fn test_from_clock_uses_clock_date() {
        let now = chrono::Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        let r = ReferenceInstant::from_clock(now);
        assert_eq!(r.date(), ymd(2024, 2, 29));
    }

    #[test]
    fn test_parse_today_accepts_both_separators() {
        assert_eq!(
            ReferenceInstant::parse_today("2024-06-10").unwrap(),
            reference()
        );
        assert_eq!(
            ReferenceInstant::parse_today("2024/06/10").unwrap(),
            reference()
        );
        assert!(ReferenceInstant::parse_today("10.06.2024").is_err());
    }

    #[test]
    fn test_one_week_window() {
        let w = DerivedWindow::compute(reference(), PeriodCode::OneWeek);
        assert_eq!(w.current_from_str().as_deref(), Some("2024/06/02"));
        assert_eq!(w.current_to_str().as_deref(), Some("2024/06/09"));
        assert_eq!(w.previous_to_str().as_deref(), Some("2024/06/01"));
        // ref - (7 + 1) * 2 days
        assert_eq!(w.previous_from_str().as_deref(), Some("2024/05/24"));

        assert!(w.is_in_current_period("2024/06/05"));
        assert!(!w.is_in_previous_period("2024/06/05"));
        assert!(w.is_in_previous_period("2024/05/28"));
    }

    #[test]
    fn test_one_month_uses_doubled_offset() {
        let w = DerivedWindow::compute(reference(), PeriodCode::OneMonth);
        assert_eq!(w.current_from, Some(ymd(2024, 5, 10)));
        assert_eq!(w.current_to, Some(ymd(2024, 6, 9)));
        assert_eq!(w.previous_to, Some(ymd(2024, 5, 9)));
        assert_eq!(w.previous_from, Some(ymd(2024, 4, 8)));
        assert_eq!(w.previous_from, Some(reference().date() - Duration::days(62)));
    }

    #[test]
    fn test_today_window() {
        let w = DerivedWindow::compute(reference(), PeriodCode::Today);
        assert_eq!(w.span_days, -1);
        assert_eq!(w.current_from, None);
        assert_eq!(w.current_to, Some(ymd(2024, 6, 10)));
        // Previous window collapses onto the reference day itself
        assert_eq!(w.previous_from, Some(ymd(2024, 6, 9)));
        assert_eq!(w.previous_to, Some(ymd(2024, 6, 9)));
        assert!(!w.is_in_current_period("2024/06/10"));
        assert!(w.is_in_previous_period("2024/06/09"));
    }

    #[test]
    fn test_all_time_has_no_bounds() {
        let w = DerivedWindow::compute(reference(), PeriodCode::AllTime);
        assert!(w.is_unbounded());
        assert_eq!(w.current_from, None);
        assert_eq!(w.current_to, None);
        assert_eq!(w.previous_from, None);
        assert_eq!(w.previous_to, None);
        assert!(!w.is_in_current_period("2024/06/05"));
        assert!(!w.is_in_previous_period("2024/06/05"));
        assert!(!w.contains_current(ymd(2024, 6, 5)));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let w = DerivedWindow::compute(reference(), PeriodCode::TwoWeeks);
        let from = w.current_from.unwrap();
        let to = w.current_to.unwrap();
        assert!(w.contains_current(from));
        assert!(w.contains_current(to));
        assert!(!w.contains_current(from - Duration::days(1)));
        assert!(!w.contains_current(to + Duration::days(1)));
        assert!(w.contains_previous(w.previous_from.unwrap()));
        assert!(w.contains_previous(w.previous_to.unwrap()));
    }

    #[test]
    fn test_json_uses_canonical_format() {
        let w = DerivedWindow::compute(reference(), PeriodCode::OneWeek);
        let json = serde_json::to_string(&w).unwrap();
        assert!(json.contains("\"current_from\":\"2024/06/02\""));
        assert!(json.contains("\"previous_from\":\"2024/05/24\""));
        assert!(!json.contains("2024-06"));

        let today = serde_json::to_value(DerivedWindow::compute(reference(), PeriodCode::Today))
            .unwrap();
        assert!(today["current_from"].is_null());
        assert_eq!(today["current_to"], "2024/06/10");

        assert_eq!(serde_json::to_string(&reference()).unwrap(), "\"2024/06/09\"");
    }

    #[test]
    fn test_string_and_date_predicates_agree() {
        let w = DerivedWindow::compute(reference(), PeriodCode::ThreeMonths);
        let start = ymd(2023, 12, 1);
        for offset in 0..250 {
            let date = start + Duration::days(offset);
            let text = format_canonical(date);
            assert_eq!(w.contains_current(date), w.is_in_current_period(&text));
            assert_eq!(w.contains_previous(date), w.is_in_previous_period(&text));
        }
    }
}
