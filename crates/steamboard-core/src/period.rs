//! Period selectors for the sales dashboard
//!
//! A [`PeriodCode`] names a duration the user can pick ("This week",
//! "Last three months", ...). Each code maps to a fixed day span through an
//! exhaustive lookup, which the window engine turns into date boundaries.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Span value used for [`PeriodCode::Today`]: a single anchor day, not a
/// one-day span ending yesterday.
pub const TODAY_SPAN: i64 = -1;

/// Span value used for [`PeriodCode::AllTime`]: no windowing at all.
pub const ALL_TIME_SPAN: i64 = 0;

/// User-selectable reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PeriodCode {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "2w")]
    TwoWeeks,
    #[default]
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "")]
    AllTime,
}

impl PeriodCode {
    /// Every code, in catalog order
    pub const ALL: [PeriodCode; 7] = [
        PeriodCode::Today,
        PeriodCode::OneWeek,
        PeriodCode::TwoWeeks,
        PeriodCode::OneMonth,
        PeriodCode::ThreeMonths,
        PeriodCode::OneYear,
        PeriodCode::AllTime,
    ];

    /// Number of days subtracted from the reference instant.
    ///
    /// `-1` marks "today" and `0` marks "all time"; see [`TODAY_SPAN`] and
    /// [`ALL_TIME_SPAN`].
    pub fn span_days(self) -> i64 {
        match self {
            PeriodCode::Today => TODAY_SPAN,
            PeriodCode::OneWeek => 7,
            PeriodCode::TwoWeeks => 14,
            PeriodCode::OneMonth => 30,
            PeriodCode::ThreeMonths => 90,
            PeriodCode::OneYear => 365,
            PeriodCode::AllTime => ALL_TIME_SPAN,
        }
    }

    /// Short code as used by the dashboard ("1w", "today", "" ...)
    pub fn code(self) -> &'static str {
        match self {
            PeriodCode::Today => "today",
            PeriodCode::OneWeek => "1w",
            PeriodCode::TwoWeeks => "2w",
            PeriodCode::OneMonth => "1m",
            PeriodCode::ThreeMonths => "3m",
            PeriodCode::OneYear => "1y",
            PeriodCode::AllTime => "",
        }
    }

    /// Human label shown in the period selector
    pub fn label(self) -> &'static str {
        match self {
            PeriodCode::Today => "Today",
            PeriodCode::OneWeek => "This week",
            PeriodCode::TwoWeeks => "Last two weeks",
            PeriodCode::OneMonth => "This month",
            PeriodCode::ThreeMonths => "Last three months",
            PeriodCode::OneYear => "This year",
            PeriodCode::AllTime => "All Time",
        }
    }

    pub fn is_all_time(self) -> bool {
        self.span_days() == ALL_TIME_SPAN
    }
}

impl fmt::Display for PeriodCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PeriodCode {
    type Err = CoreError;

    /// Parse a dashboard code. `"all"` is accepted as a shell-friendly alias
    /// for the empty all-time code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(PeriodCode::AllTime);
        }
        PeriodCode::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::InvalidPeriodCode {
                code: s.to_string(),
            })
    }
}

/// One entry of the period selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodOption {
    pub label: &'static str,
    pub value: PeriodCode,
}

/// Static, ordered period selector contents
pub const PERIOD_CATALOG: [PeriodOption; 7] = [
    PeriodOption {
        label: "Today",
        value: PeriodCode::Today,
    },
    PeriodOption {
        label: "This week",
        value: PeriodCode::OneWeek,
    },
    PeriodOption {
        label: "Last two weeks",
        value: PeriodCode::TwoWeeks,
    },
    PeriodOption {
        label: "This month",
        value: PeriodCode::OneMonth,
    },
    PeriodOption {
        label: "Last three months",
        value: PeriodCode::ThreeMonths,
    },
    PeriodOption {
        label: "This year",
        value: PeriodCode::OneYear,
    },
    PeriodOption {
        label: "All Time",
        value: PeriodCode::AllTime,
    },
];

/// Which revenue figures the dashboard sums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesType {
    #[default]
    Gross,
    Net,
}

impl fmt::Display for SalesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SalesType::Gross => f.write_str("gross"),
            SalesType::Net => f.write_str("net"),
        }
    }
}

impl FromStr for SalesType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gross" => Ok(SalesType::Gross),
            "net" => Ok(SalesType::Net),
            _ => Err(CoreError::InvalidSalesType {
                value: s.to_string(),
            }),
        }
    }
}
