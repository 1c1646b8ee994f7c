//! Period-over-period sales comparison
//!
//! Buckets sales rows into the current and previous windows of a
//! [`DerivedWindow`] and totals them, the way the overview page compares
//! "this period" with "the period before".

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::period::SalesType;
use crate::window::DerivedWindow;

/// Country bucket for rows without a country code
pub const UNKNOWN_COUNTRY: &str = "??";

/// One row of the storefront's detailed sales report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Sale day in `yyyy/mm/dd`
    pub date: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub gross_units_sold: Option<i64>,
    #[serde(default)]
    pub gross_sales_usd: Option<f64>,
    #[serde(default)]
    pub net_units_sold: Option<i64>,
    #[serde(default)]
    pub net_sales_usd: Option<f64>,
}

impl SaleRecord {
    pub fn units(&self, sales_type: SalesType) -> i64 {
        match sales_type {
            SalesType::Gross => self.gross_units_sold.unwrap_or(0),
            SalesType::Net => self.net_units_sold.unwrap_or(0),
        }
    }

    pub fn revenue(&self, sales_type: SalesType) -> f64 {
        match sales_type {
            SalesType::Gross => self.gross_sales_usd.unwrap_or(0.0),
            SalesType::Net => self.net_sales_usd.unwrap_or(0.0),
        }
    }
}

/// Totals for one side of the comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub records: usize,
    pub units: i64,
    pub revenue_usd: f64,
}

impl PeriodTotals {
    fn add(&mut self, record: &SaleRecord, sales_type: SalesType) {
        self.records += 1;
        self.units += record.units(sales_type);
        self.revenue_usd += record.revenue(sales_type);
    }
}

/// Current vs previous window totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub window: DerivedWindow,
    pub sales_type: SalesType,
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    /// Revenue per country code in the current window
    pub current_by_country: HashMap<String, f64>,
}

impl PeriodComparison {
    /// Revenue change from previous to current, in percent.
    ///
    /// `None` when there is nothing to compare against. Divides by the
    /// magnitude of the previous revenue, so a net refund period followed by
    /// sales still reads as growth.
    pub fn change_pct(&self) -> Option<f64> {
        if self.previous.revenue_usd == 0.0 {
            return None;
        }
        let delta = self.current.revenue_usd - self.previous.revenue_usd;
        Some(delta / self.previous.revenue_usd.abs() * 100.0)
    }

    /// Countries by current-window revenue, highest first
    pub fn by_country(&self) -> Vec<(&str, f64)> {
        let mut rows: Vec<(&str, f64)> = self
            .current_by_country
            .iter()
            .map(|(code, revenue)| (code.as_str(), *revenue))
            .collect();
        rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }
}

/// Total `records` over the current and previous windows.
///
/// With an all-time window every record is current and nothing is previous.
pub fn compare_periods(
    records: &[SaleRecord],
    window: &DerivedWindow,
    sales_type: SalesType,
) -> PeriodComparison {
    let mut current = PeriodTotals::default();
    let mut previous = PeriodTotals::default();
    let mut current_by_country: HashMap<String, f64> = HashMap::new();

    for record in records {
        if window.is_unbounded() || window.is_in_current_period(&record.date) {
            current.add(record, sales_type);
            let country = record
                .country_code
                .as_deref()
                .filter(|c| !c.is_empty())
                .unwrap_or(UNKNOWN_COUNTRY)
                .to_uppercase();
            *current_by_country.entry(country).or_default() += record.revenue(sales_type);
        } else if window.is_in_previous_period(&record.date) {
            previous.add(record, sales_type);
        }
    }

    tracing::debug!(
        period = %window.period,
        current = current.records,
        previous = previous.records,
        skipped = records.len() - current.records - previous.records,
        "Compared sales records"
    );

    PeriodComparison {
        window: *window,
        sales_type,
        current,
        previous,
        current_by_country,
    }
}
