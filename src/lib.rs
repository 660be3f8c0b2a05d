//! Utilities for converting between Gregorian dates and the Vietnamese
//! lunisolar calendar (âm lịch).
//!
//! Lunar months and leap months are derived from astronomical models rather
//! than tables: new moons come from a lunar phase ephemeris and the solar
//! terms from the Sun's apparent longitude, both evaluated in the local time
//! zone (UTC+7 by default). See [`vietnamese`] for the calendar rules.
//!
//! # Examples
//!
//! Basic usage with [`Date`]:
//!
//! ```
//! use amlich::Date;
//!
//! let date = Date::from_gregorian(2000, 1, 1).unwrap();
//!
//! assert_eq!(6, date.day_of_week()); // Saturday
//! assert_eq!(2451545, date.jdn());
//! ```
//!
//! Vietnamese lunisolar calendar:
//!
//! ```
//! use amlich::{Date, LunarCalendar, LunarDate, Month::*};
//!
//! let calendar = LunarCalendar::default();
//! let date = Date::from_gregorian(2020, 5, 23).unwrap();
//!
//! assert_eq!(LunarDate::new(2020, Leap(4), 1), calendar.from_solar(date).unwrap());
//! ```
//!
//! The same through the plain functions, with the offset in seconds:
//!
//! ```
//! let lunar = amlich::lunar_from_solar(2022, 12, 20, 25200).unwrap();
//! assert_eq!((2022, 11, 27, false), (lunar.year, lunar.month.num(), lunar.day, lunar.is_leap_month()));
//!
//! assert_eq!(Ok((2022, 12, 20)), amlich::solar_from_lunar(2022, 11, 27, false, 25200));
//! ```
//!
//! # Accuracy
//!
//! Both models are low precision: solar terms are found to within about a
//! quarter of an hour and new moons to within a few minutes. When a new moon
//! or a major term falls close to local midnight the computed calendar can
//! differ by a day from published almanacs.

pub mod config;
pub mod date;
pub mod error;
pub mod julian;
pub mod moon;
mod search_util;
pub mod solar;
pub mod vietnamese;

pub use config::{Config, UtcOffset, VIETNAM_UTC_OFFSET};
pub use date::{Date, YearType};
pub use error::{AnnusSide, CalendarField, Error, Result};
pub use julian::{CalendarFields, JulianDay};
pub use search_util::SEARCH_ITERATION_CAP;
pub use vietnamese::{LunarCalendar, LunarDate, Month};

use solar::SolarLongitudePoint;

/// Julian date of a Unix timestamp.
pub fn julian_day_from_unix(timestamp: f64) -> f64 {
    JulianDay::from_timestamp(timestamp).0
}

/// Unix timestamp of a Julian date, rounded to the millisecond.
pub fn unix_from_julian_day(jd: f64) -> f64 {
    JulianDay(jd).timestamp()
}

/// Julian date of a proleptic Gregorian date and UTC time.
pub fn julian_day_from_calendar(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Result<f64> {
    JulianDay::from_calendar(year, month, day, hour, minute, second).map(|jd| jd.0)
}

/// Apparent solar longitude, in degrees, at the local wall-clock Julian date
/// `jd` of a zone `utc_offset_seconds` east of UTC.
pub fn solar_longitude(jd: f64, utc_offset_seconds: i32) -> Result<f64> {
    let offset = UtcOffset::new(utc_offset_seconds)?;
    Ok(solar::apparent_longitude(JulianDay(jd - offset.as_days())))
}

/// Start of the solar term in progress at the local wall-clock Julian date
/// `jd`, as a local wall-clock Julian date.
///
/// ```
/// let jd = amlich::julian_day_from_calendar(2022, 12, 30, 0, 0, 0).unwrap();
/// let start = amlich::solar_term_start(jd, 25200).unwrap();
/// assert_eq!(270.0, amlich::solar_longitude(start, 25200).unwrap().round());
/// ```
pub fn solar_term_start(jd: f64, utc_offset_seconds: i32) -> Result<f64> {
    let offset = UtcOffset::new(utc_offset_seconds)?;
    let point = SolarLongitudePoint::at(JulianDay(jd - offset.as_days()), offset);
    Ok(point.term_start()?.jd().0 + offset.as_days())
}

/// Unix timestamp of the latest new moon at or before `timestamp`.
pub fn new_moon_before(timestamp: f64) -> Result<f64> {
    moon::new_moon_before(JulianDay::from_timestamp(timestamp)).map(|jd| jd.timestamp())
}

/// Converts a Gregorian date to the lunar calendar of a zone
/// `utc_offset_seconds` east of UTC.
pub fn lunar_from_solar(year: i32, month: u32, day: u32, utc_offset_seconds: i32) -> Result<LunarDate> {
    let calendar = calendar_for(utc_offset_seconds)?;
    calendar.from_solar(Date::from_gregorian(year, month, day)?)
}

/// Converts a lunar date to a Gregorian `(year, month, day)`.
pub fn solar_from_lunar(
    year: i32,
    month: u32,
    day: u32,
    is_leap: bool,
    utc_offset_seconds: i32,
) -> Result<(i32, u32, u32)> {
    let calendar = calendar_for(utc_offset_seconds)?;
    let lunar = LunarDate::new(year, Month::new(month, is_leap), day);
    calendar.to_solar(lunar).map(|date| date.gregorian())
}

fn calendar_for(utc_offset_seconds: i32) -> Result<LunarCalendar> {
    let config = Config::default().with_utc_offset(UtcOffset::new(utc_offset_seconds)?);
    Ok(LunarCalendar::new(config))
}
