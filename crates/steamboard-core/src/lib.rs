//! steamboard-core - Core library for steamboard
//!
//! Provides the period window engine behind the sales dashboard's
//! "this period vs previous period" views, plus the options store, settings
//! access, display helpers, sales comparison and CSV export built on top of
//! it.

pub mod comparison;
pub mod error;
pub mod export;
pub mod format;
pub mod options;
pub mod period;
pub mod settings;
pub mod window;

pub use comparison::{compare_periods, PeriodComparison, PeriodTotals, SaleRecord};
pub use error::CoreError;
pub use export::export_sales_to_csv;
pub use format::{capitalize, format_date};
pub use options::OptionsStore;
pub use period::{PeriodCode, PeriodOption, SalesType, PERIOD_CATALOG};
pub use settings::{JsonFileBackend, Settings, SettingsBackend, SettingsStore};
pub use window::{format_canonical, DerivedWindow, ReferenceInstant, DATE_FORMAT};
