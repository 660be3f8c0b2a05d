//! Julian dates, the continuous time axis every computation in this crate
//! runs on.
//!
//! A [`JulianDay`] is an astronomical Julian date in UT: days since noon of
//! January 1, 4713 BC (proleptic Julian calendar), with the fraction encoding
//! the time of day. Unix time maps onto it linearly with
//! [`UNIX_EPOCH_JD`] for 1970-01-01T00:00:00Z.
//!
//! Local civil dates are derived by shifting with a [`UtcOffset`]; since a
//! Julian date begins at noon, the civil day of `jd` in UTC is
//! `floor(jd + 0.5)`.

use std::ops::{Add, Sub};

use crate::config::UtcOffset;
use crate::date::Date;
use crate::error::{CalendarField, Error, Result};

/// Julian date of the Unix epoch.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Julian date of J2000.0.
pub const J2000_JD: f64 = 2_451_545.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
/// One hour, in days.
pub const HOUR: f64 = 1.0 / 24.0;
/// One minute, in days.
pub const MINUTE: f64 = 1.0 / 1440.0;

/// An instant, represented in Julian date (UT).
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JulianDay(pub f64);

/// Broken-down calendar fields of an instant.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CalendarFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl CalendarFields {
    /// The date part of the fields.
    pub fn date(&self) -> Result<Date> {
        Date::from_gregorian(self.year, self.month, self.day)
    }
}

impl JulianDay {
    /// Converts a Unix timestamp (seconds, may be fractional).
    ///
    /// # Example
    ///
    /// ```
    /// use amlich::JulianDay;
    ///
    /// assert_eq!(2440587.5, JulianDay::from_timestamp(0.0).0);
    /// assert_eq!(1671543040.0, JulianDay::from_timestamp(1671543040.0).timestamp());
    /// ```
    pub fn from_timestamp(timestamp: f64) -> Self {
        JulianDay(timestamp / SECONDS_PER_DAY + UNIX_EPOCH_JD)
    }
    /// Converts back to a Unix timestamp, rounded to the millisecond.
    ///
    /// The rounding absorbs the error of the day fraction, so whole-second
    /// timestamps survive a round trip exactly.
    pub fn timestamp(&self) -> f64 {
        ((self.0 - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1000.0).round() / 1000.0
    }

    /// Julian date of a proleptic Gregorian date and time, in UTC.
    ///
    /// # Example
    ///
    /// ```
    /// use amlich::JulianDay;
    ///
    /// let jd = JulianDay::from_calendar(2000, 1, 1, 12, 0, 0).unwrap();
    /// assert_eq!(2451545.0, jd.0);
    /// ```
    pub fn from_calendar(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self> {
        if hour >= 24 {
            return Err(Error::invalid(CalendarField::Hour, hour));
        }
        if minute >= 60 {
            return Err(Error::invalid(CalendarField::Minute, minute));
        }
        if second >= 60 {
            return Err(Error::invalid(CalendarField::Second, second));
        }
        let date = Date::from_gregorian(year, month, day)?;
        let seconds = hour * 3600 + minute * 60 + second;
        Ok(JulianDay(
            date.jdn() as f64 - 0.5 + seconds as f64 / SECONDS_PER_DAY,
        ))
    }
    /// The instant the local civil day `date` begins in a zone `offset` east
    /// of UTC.
    pub fn local_midnight(date: Date, offset: UtcOffset) -> Self {
        JulianDay(date.jdn() as f64 - 0.5 - offset.as_days())
    }

    /// Returns the local civil date at the instant in a zone `offset` east of
    /// UTC.
    ///
    /// # Example
    ///
    /// ```
    /// use amlich::{JulianDay, UtcOffset};
    ///
    /// let jd = JulianDay::from_calendar(2022, 12, 20, 20, 0, 0).unwrap();
    /// assert_eq!((2022, 12, 20), jd.date(UtcOffset::UTC).gregorian());
    /// assert_eq!((2022, 12, 21), jd.date(UtcOffset::from_hours(7).unwrap()).gregorian());
    /// ```
    pub fn date(&self, offset: UtcOffset) -> Date {
        Date::from_jdn((self.0 + 0.5 + offset.as_days()).floor() as i32)
    }
    /// Breaks the instant down into local calendar fields, rounding to the
    /// nearest second.
    pub fn calendar_fields(&self, offset: UtcOffset) -> CalendarFields {
        let local = self.0 + 0.5 + offset.as_days();
        let mut day = local.floor();
        let mut seconds = ((local - day) * SECONDS_PER_DAY).round() as u32;
        if seconds >= 86_400 {
            day += 1.0;
            seconds -= 86_400;
        }
        let (year, month, day) = Date::from_jdn(day as i32).gregorian();
        CalendarFields {
            year,
            month,
            day,
            hour: seconds / 3600,
            minute: seconds / 60 % 60,
            second: seconds % 60,
        }
    }
}

impl Add<f64> for JulianDay {
    type Output = JulianDay;
    fn add(self, days: f64) -> JulianDay {
        JulianDay(self.0 + days)
    }
}
impl Sub<f64> for JulianDay {
    type Output = JulianDay;
    fn sub(self, days: f64) -> JulianDay {
        JulianDay(self.0 - days)
    }
}
impl Sub<JulianDay> for JulianDay {
    type Output = f64;
    fn sub(self, rhs: JulianDay) -> f64 {
        self.0 - rhs.0
    }
}
