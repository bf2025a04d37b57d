//! Lookback horizons supported by the rebased series.
//!
//! A [`Horizon`] is one of six fixed calendar windows measured back from a
//! symbol's as-of date. Offsets are calendar months/years via
//! [`chrono::Months`], never a fixed day count, so "1y" before 2025-03-15 is
//! 2024-03-15 regardless of leap years in between.
//!
//! Typical usage:
//! ```
//! use rebase_engine::horizon::Horizon;
//!
//! let h: Horizon = "1mo".parse().unwrap();
//! assert_eq!(h.months(), 1);
//! assert_eq!(h.as_str(), "1mo");
//! ```

use std::{fmt, str::FromStr};

use chrono::{Months, NaiveDate};
use thiserror::Error;

/// A fixed lookback window, used both to pick the rebasing anchor and to
/// bound the series returned for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizon {
    /// One calendar month.
    OneMonth,
    /// Three calendar months.
    ThreeMonths,
    /// Six calendar months.
    SixMonths,
    /// One calendar year.
    OneYear,
    /// Five calendar years.
    FiveYears,
    /// Twenty calendar years.
    TwentyYears,
}

impl Horizon {
    /// Every supported horizon, shortest first.
    pub const ALL: [Horizon; 6] = [
        Horizon::OneMonth,
        Horizon::ThreeMonths,
        Horizon::SixMonths,
        Horizon::OneYear,
        Horizon::FiveYears,
        Horizon::TwentyYears,
    ];

    /// Canonical short code, as used in cache keys and column names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Horizon::OneMonth => "1mo",
            Horizon::ThreeMonths => "3mo",
            Horizon::SixMonths => "6mo",
            Horizon::OneYear => "1y",
            Horizon::FiveYears => "5y",
            Horizon::TwentyYears => "20y",
        }
    }

    /// Calendar offset in months.
    pub const fn months(self) -> u32 {
        match self {
            Horizon::OneMonth => 1,
            Horizon::ThreeMonths => 3,
            Horizon::SixMonths => 6,
            Horizon::OneYear => 12,
            Horizon::FiveYears => 60,
            Horizon::TwentyYears => 240,
        }
    }

    /// The lookback date for this horizon measured back from `as_of`.
    ///
    /// `None` only when the shifted date falls outside chrono's representable
    /// range, which no real trading date does.
    pub fn lookback_from(self, as_of: NaiveDate) -> Option<NaiveDate> {
        as_of.checked_sub_months(Months::new(self.months()))
    }

    /// Comma-separated list of the supported codes, for error messages.
    pub fn allowed() -> String {
        Horizon::ALL
            .iter()
            .map(|h| h.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A horizon code that is not one of the supported six.
#[derive(Debug, Error)]
#[error("unknown horizon {code:?}, must be one of: 1mo, 3mo, 6mo, 1y, 5y, 20y")]
pub struct ParseHorizonError {
    /// The offending input.
    pub code: String,
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Horizon {
    type Err = ParseHorizonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1mo" => Ok(Horizon::OneMonth),
            "3mo" => Ok(Horizon::ThreeMonths),
            "6mo" => Ok(Horizon::SixMonths),
            "1y" => Ok(Horizon::OneYear),
            "5y" => Ok(Horizon::FiveYears),
            "20y" => Ok(Horizon::TwentyYears),
            other => Err(ParseHorizonError {
                code: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn codes_roundtrip_through_parse() {
        for h in Horizon::ALL {
            let parsed: Horizon = h.as_str().parse().unwrap();
            assert_eq!(parsed, h);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        let err = "13mo".parse::<Horizon>().unwrap_err();
        assert_eq!(err.code, "13mo");
    }

    #[test]
    fn one_year_lookback_crosses_leap_year() {
        // 2024 is a leap year; the offset is calendar months, not 365 days.
        let got = Horizon::OneYear.lookback_from(d(2025, 3, 15)).unwrap();
        assert_eq!(got, d(2024, 3, 15));
    }

    #[test]
    fn month_end_clamps_to_shorter_month() {
        let got = Horizon::OneMonth.lookback_from(d(2025, 3, 31)).unwrap();
        assert_eq!(got, d(2025, 2, 28));
    }

    #[test]
    fn twenty_years_back_from_leap_day() {
        let got = Horizon::TwentyYears.lookback_from(d(2024, 2, 29)).unwrap();
        assert_eq!(got, d(2004, 2, 29));
    }
}
