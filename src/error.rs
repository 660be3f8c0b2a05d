//! Error types for calendar conversions.

use std::fmt;

use thiserror::Error;

/// Result type for conversions in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by conversions.
///
/// A conversion either fully succeeds or fails with one of these; partial
/// results are never returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A calendar field (or the UTC offset) is outside its valid range.
    #[error("invalid {field}: {value}")]
    InvalidCalendarField { field: CalendarField, value: i64 },

    /// A leap month was requested for a month that is not the leap month of
    /// the given lunar year.
    #[error("month {month} of lunar year {year} is not a leap month")]
    InvalidLeapMonthRequest { year: i32, month: u32 },

    /// A date outside the annus it was looked up in.
    #[error("date is {side} annus {annus}")]
    OutsideAnnus { annus: i32, side: AnnusSide },

    /// A bounded iterative search ran out of iterations.
    #[error("{search} did not converge within {cap} iterations")]
    NonConvergentSearch { search: &'static str, cap: usize },

    /// Stepping zero new moons from a new moon.
    #[error("already at this point")]
    ZeroStep,
}

impl Error {
    pub(crate) fn invalid(field: CalendarField, value: impl Into<i64>) -> Self {
        Error::InvalidCalendarField {
            field,
            value: value.into(),
        }
    }
}

/// The field rejected by [`Error::InvalidCalendarField`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CalendarField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    UtcOffset,
}

impl fmt::Display for CalendarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CalendarField::Year => "year",
            CalendarField::Month => "month",
            CalendarField::Day => "day",
            CalendarField::Hour => "hour",
            CalendarField::Minute => "minute",
            CalendarField::Second => "second",
            CalendarField::UtcOffset => "UTC offset",
        };
        f.write_str(name)
    }
}

/// Where a date lies relative to the annus of [`Error::OutsideAnnus`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AnnusSide {
    Before,
    After,
}

impl fmt::Display for AnnusSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnnusSide::Before => "before",
            AnnusSide::After => "after",
        })
    }
}
