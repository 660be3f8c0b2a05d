//! Stepping through consecutive new moons.

use crate::config::UtcOffset;
use crate::date::Date;
use crate::error::{Error, Result};
use crate::julian::JulianDay;

use super::phase::{SYNODIC_MONTH, new_moon_before};

/// Days past the expected new moon a step aims at, so that the search lands
/// after it whatever the deviation of the true from the mean lunation.
const STEP_MARGIN_DAYS: f64 = 2.0;

/// The instant of a new moon, seen from a zone `offset` east of UTC.
///
/// Two points are equal when they denote the same lunation in the same zone.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct NewMoonPoint {
    jd: JulianDay,
    offset: UtcOffset,
}

impl NewMoonPoint {
    /// The latest new moon at or before `jd`.
    pub fn before(jd: JulianDay, offset: UtcOffset) -> Result<Self> {
        Ok(Self {
            jd: new_moon_before(jd)?,
            offset,
        })
    }
    /// The latest new moon at or before a Unix timestamp.
    ///
    /// # Example
    ///
    /// ```
    /// use amlich::VIETNAM_UTC_OFFSET;
    /// use amlich::moon::NewMoonPoint;
    ///
    /// let new_moon = NewMoonPoint::at_timestamp(1671543040.0, VIETNAM_UTC_OFFSET).unwrap();
    /// assert_eq!("2022-11-24", new_moon.local_date().iso_gregorian());
    /// ```
    pub fn at_timestamp(timestamp: f64, offset: UtcOffset) -> Result<Self> {
        Self::before(JulianDay::from_timestamp(timestamp), offset)
    }

    /// The new moon beginning the lunar month that contains the local date
    /// `date`.
    ///
    /// # Example
    ///
    /// ```
    /// use amlich::{Date, VIETNAM_UTC_OFFSET};
    /// use amlich::moon::NewMoonPoint;
    ///
    /// let date = Date::from_gregorian(2020, 5, 22).unwrap();
    /// let start = NewMoonPoint::month_start(date, VIETNAM_UTC_OFFSET).unwrap();
    /// assert_eq!("2020-04-23", start.local_date().iso_gregorian());
    /// ```
    pub fn month_start(date: Date, offset: UtcOffset) -> Result<Self> {
        let next_midnight = JulianDay::local_midnight(date + 1, offset);
        let new_moon = Self::before(next_midnight, offset)?;
        // a new moon late on `date` itself belongs to this month
        if new_moon.local_date() > date {
            return new_moon.previous(1);
        }
        Ok(new_moon)
    }

    /// The `n`-th new moon after this one (before it, for negative `n`).
    ///
    /// Fails with [`Error::ZeroStep`] for `n == 0`.
    pub fn next(&self, n: i32) -> Result<Self> {
        if n == 0 {
            return Err(Error::ZeroStep);
        }
        let seed = self.jd + (n as f64 * SYNODIC_MONTH + STEP_MARGIN_DAYS);
        Self::before(seed, self.offset)
    }
    /// The `n`-th new moon before this one; same as `next(-n)`.
    pub fn previous(&self, n: i32) -> Result<Self> {
        self.next(-n)
    }

    pub fn jd(&self) -> JulianDay {
        self.jd
    }
    /// Unix timestamp of the new moon, rounded to the millisecond.
    pub fn timestamp(&self) -> f64 {
        self.jd.timestamp()
    }
    pub fn offset(&self) -> UtcOffset {
        self.offset
    }
    /// Local civil date the new moon falls on, i.e. the first day of the
    /// lunar month it begins.
    pub fn local_date(&self) -> Date {
        self.jd.date(self.offset)
    }
}

impl From<NewMoonPoint> for JulianDay {
    fn from(point: NewMoonPoint) -> JulianDay {
        point.jd
    }
}
