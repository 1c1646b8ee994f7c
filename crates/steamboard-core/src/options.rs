//! Dashboard options store
//!
//! Holds the user's selections (period, sales type) and a loading flag, and
//! derives every window boundary from the injected [`ReferenceInstant`] on
//! each call. Nothing derived is cached, so getters can never go stale
//! relative to the selected period.

use chrono::NaiveDate;
use tracing::debug;

use crate::period::{PeriodCode, PeriodOption, SalesType, PERIOD_CATALOG};
use crate::window::{format_canonical, DerivedWindow, ReferenceInstant};

/// Selection state behind the period selector
#[derive(Debug, Clone)]
pub struct OptionsStore {
    reference: ReferenceInstant,
    period: PeriodCode,
    loading: bool,
    sales_type: SalesType,
}

impl OptionsStore {
    /// New store with the default period (`1m`) and gross sales
    pub fn new(reference: ReferenceInstant) -> Self {
        Self {
            reference,
            period: PeriodCode::default(),
            loading: false,
            sales_type: SalesType::default(),
        }
    }

    pub fn with_period(mut self, period: PeriodCode) -> Self {
        self.period = period;
        self
    }

    pub fn with_sales_type(mut self, sales_type: SalesType) -> Self {
        self.sales_type = sales_type;
        self
    }

    // region: state
    pub fn reference(&self) -> ReferenceInstant {
        self.reference
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn period(&self) -> PeriodCode {
        self.period
    }

    /// Select a new period; the last selection wins
    pub fn set_period(&mut self, period: PeriodCode) {
        debug!(from = %self.period, to = %period, "Period changed");
        self.period = period;
    }

    pub fn sales_type(&self) -> SalesType {
        self.sales_type
    }

    pub fn set_sales_type(&mut self, sales_type: SalesType) {
        self.sales_type = sales_type;
    }

    /// Entries for the period selector
    pub fn periods(&self) -> &'static [PeriodOption] {
        &PERIOD_CATALOG
    }
    // endregion state

    // region: derived
    pub fn span_days(&self) -> i64 {
        self.period.span_days()
    }

    /// Reference date in canonical `yyyy/mm/dd` form
    pub fn now(&self) -> String {
        self.reference.to_string()
    }

    pub fn window(&self) -> DerivedWindow {
        DerivedWindow::compute(self.reference, self.period)
    }

    pub fn from_date(&self) -> Option<NaiveDate> {
        self.window().current_from
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        self.window().current_to
    }

    pub fn previous_from_date(&self) -> Option<NaiveDate> {
        self.window().previous_from
    }

    pub fn previous_to_date(&self) -> Option<NaiveDate> {
        self.window().previous_to
    }

    pub fn from(&self) -> Option<String> {
        self.from_date().map(format_canonical)
    }

    pub fn to(&self) -> Option<String> {
        self.to_date().map(format_canonical)
    }

    pub fn previous_from(&self) -> Option<String> {
        self.previous_from_date().map(format_canonical)
    }

    pub fn previous_to(&self) -> Option<String> {
        self.previous_to_date().map(format_canonical)
    }
    // endregion derived

    // region: predicates
    /// Is a `yyyy/mm/dd` date inside the current window?
    pub fn is_in_period(&self, date: &str) -> bool {
        self.window().is_in_current_period(date)
    }

    /// Is a `yyyy/mm/dd` date inside the previous window?
    pub fn is_in_previous_period(&self, date: &str) -> bool {
        self.window().is_in_previous_period(date)
    }
    // endregion predicates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> OptionsStore {
        let reference = ReferenceInstant::new(NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
        OptionsStore::new(reference)
    }

    #[test]
    fn test_defaults() {
        let store = store();
        assert_eq!(store.period(), PeriodCode::OneMonth);
        assert_eq!(store.sales_type(), SalesType::Gross);
        assert!(!store.is_loading());
        assert_eq!(store.span_days(), 30);
        assert_eq!(store.now(), "2024/06/09");
        assert_eq!(store.periods().len(), 7);
    }

    #[test]
    fn test_getters_follow_period_changes() {
        let mut store = store();
        assert_eq!(store.from().as_deref(), Some("2024/05/10"));

        store.set_period(PeriodCode::OneWeek);
        assert_eq!(store.from().as_deref(), Some("2024/06/02"));
        assert_eq!(store.to().as_deref(), Some("2024/06/09"));
        assert_eq!(store.previous_to().as_deref(), Some("2024/06/01"));
        assert_eq!(store.previous_from().as_deref(), Some("2024/05/24"));
        assert!(store.is_in_period("2024/06/05"));
        assert!(!store.is_in_previous_period("2024/06/05"));
        assert!(store.is_in_previous_period("2024/05/28"));

        store.set_period(PeriodCode::AllTime);
        assert_eq!(store.from(), None);
        assert_eq!(store.to(), None);
        assert_eq!(store.previous_from(), None);
        assert_eq!(store.previous_to(), None);
        assert!(!store.is_in_period("2024/06/05"));
    }

    #[test]
    fn test_window_is_idempotent() {
        let store = store().with_period(PeriodCode::ThreeMonths);
        assert_eq!(store.window(), store.window());
    }

    #[test]
    fn test_loading_flag_does_not_affect_window() {
        let mut store = store();
        let before = store.window();
        store.set_loading(true);
        assert!(store.is_loading());
        assert_eq!(store.window(), before);
    }

    #[test]
    fn test_sales_type_selection() {
        let mut store = store().with_sales_type(SalesType::Net);
        assert_eq!(store.sales_type(), SalesType::Net);
        store.set_sales_type(SalesType::Gross);
        assert_eq!(store.sales_type(), SalesType::Gross);
    }
}
