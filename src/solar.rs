//! Apparent solar longitude and the 24 solar terms.
//!
//! The longitude uses the low-precision series (about 0.01° over 1950–2050):
//!
//! ```text
//! T = (JD − 2451545) / 36525
//! L = 280.460 + 36000.770 T
//! G = 357.528 + 35999.050 T
//! λ = L + 1.915 sin G + 0.020 sin 2G
//! ```
//!
//! A solar term begins each time λ crosses a multiple of 15°; terms at
//! multiples of 30° are the major terms that decide lunar month numbering.
//!
//! Boundary searches estimate the crossing with the mean solar rate, walk
//! whole days to bracket it, then refine by hours and minutes. Every result is
//! the first whole minute (from the search origin) at or after the crossing.

use log::{debug, trace};

use crate::config::UtcOffset;
use crate::date::Date;
use crate::error::Result;
use crate::julian::{HOUR, J2000_JD, JulianDay, MINUTE};
use crate::search_util::{SEARCH_ITERATION_CAP, non_convergent, normalize_360, normalize_to_pm180};

pub use crate::search_util::normalize_360 as normalize_degrees;

/// Mean days the Sun takes to move one degree of longitude.
pub const DAYS_PER_DEGREE: f64 = 1.0145625;

/// Degrees between consecutive solar terms.
pub const TERM_DEGREES: f64 = 15.0;

/// Apparent ecliptic longitude of the Sun at `jd` (UT), in degrees `[0, 360)`.
///
/// # Example
///
/// ```
/// use amlich::JulianDay;
/// use amlich::solar::apparent_longitude;
///
/// let june_solstice = JulianDay::from_calendar(2022, 6, 21, 9, 14, 0).unwrap();
/// assert!((apparent_longitude(june_solstice) - 90.0).abs() < 0.01);
/// ```
pub fn apparent_longitude(jd: JulianDay) -> f64 {
    let t = (jd.0 - J2000_JD) / 36525.0;
    let l = 280.460 + 36000.770 * t;
    let g = (357.528 + 35999.050 * t).to_radians();
    normalize_360(l + 1.915 * g.sin() + 0.020 * (2.0 * g).sin())
}

/// The Sun's longitude at an instant, seen from a zone `offset` east of UTC.
///
/// The offset does not affect the longitude itself, only the local dates the
/// point and the points derived from it fall on.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolarLongitudePoint {
    degree: f64,
    jd: JulianDay,
    offset: UtcOffset,
}

impl SolarLongitudePoint {
    pub fn at(jd: JulianDay, offset: UtcOffset) -> Self {
        Self {
            degree: apparent_longitude(jd),
            jd,
            offset,
        }
    }

    /// The winter solstice (the 270° term) of `year`, searched back from
    /// local midnight of December 30.
    ///
    /// # Example
    ///
    /// ```
    /// use amlich::VIETNAM_UTC_OFFSET;
    /// use amlich::solar::SolarLongitudePoint;
    ///
    /// let ws = SolarLongitudePoint::winter_solstice(2022, VIETNAM_UTC_OFFSET).unwrap();
    /// assert_eq!(270, ws.term_degree());
    /// assert_eq!("2022-12-22", ws.local_date().iso_gregorian());
    /// ```
    pub fn winter_solstice(year: i32, offset: UtcOffset) -> Result<Self> {
        let dec30 = Date::from_gregorian(year, 12, 30)?;
        let ws = Self::at(JulianDay::local_midnight(dec30, offset), offset).term_start()?;
        debug!(
            "winter solstice of {year}: {} (JD {:.5})",
            ws.local_date().iso_gregorian(),
            ws.jd.0
        );
        Ok(ws)
    }

    /// Longitude in degrees, `[0, 360)`.
    pub fn degree(&self) -> f64 {
        self.degree
    }
    pub fn jd(&self) -> JulianDay {
        self.jd
    }
    pub fn offset(&self) -> UtcOffset {
        self.offset
    }
    /// Local civil date of the point.
    pub fn local_date(&self) -> Date {
        self.jd.date(self.offset)
    }

    /// Whether both points lie in the same whole degree.
    pub fn matches(&self, other: &Self) -> bool {
        self.degree.floor() == other.degree.floor()
    }

    /// The multiple of 15° nearest to the longitude, `0..360`.
    ///
    /// For a point returned by [`term_start`](Self::term_start) this is the
    /// degree of the term it starts.
    pub fn term_degree(&self) -> u32 {
        (self.degree / TERM_DEGREES).round() as u32 % 24 * 15
    }
    /// Index of [`term_degree`](Self::term_degree), `0..24`, counted from the
    /// March equinox.
    pub fn term_index(&self) -> u32 {
        self.term_degree() / 15
    }
    /// Whether [`term_degree`](Self::term_degree) is a major term (a multiple
    /// of 30°).
    pub fn is_major_term(&self) -> bool {
        self.term_degree() % 30 == 0
    }

    /// Start of the solar term the point lies in: the latest crossing of a
    /// multiple of 15° at or before it.
    pub fn term_start(&self) -> Result<Self> {
        self.boundary_before(self.degree % TERM_DEGREES)
    }

    /// The latest instant at or before this point where the longitude reached
    /// `degree − step`.
    pub fn boundary_before(&self, step: f64) -> Result<Self> {
        let target = normalize_360(self.degree - step);
        let estimate = self.jd - (step % 360.0) * DAYS_PER_DEGREE;
        let mut jd = walk(estimate, 1.0, |jd| reached(jd, target))?;
        for unit in [1.0, HOUR, MINUTE] {
            jd = walk(jd, -unit, |jd| !reached(jd - unit, target))?;
            trace!("boundary before {target:.4}°: refined to JD {:.6} by {unit:.6} d", jd.0);
        }
        Ok(Self::at(jd, self.offset))
    }

    /// The earliest instant after this point where the longitude reached
    /// `degree + step`.
    pub fn boundary_after(&self, step: f64) -> Result<Self> {
        let target = normalize_360(self.degree + step);
        let estimate = self.jd + (step % 360.0) * DAYS_PER_DEGREE;
        let mut jd = walk(estimate, -1.0, |jd| !reached(jd, target))?;
        for unit in [1.0, HOUR, MINUTE] {
            jd = walk(jd, unit, |jd| reached(jd + unit, target))?;
            trace!("boundary after {target:.4}°: refined to JD {:.6} by {unit:.6} d", jd.0);
        }
        Ok(Self::at(jd + MINUTE, self.offset))
    }
}

/// Whether the longitude at `jd` is at or past `target`, within half a turn.
fn reached(jd: JulianDay, target: f64) -> bool {
    normalize_to_pm180(apparent_longitude(jd) - target) >= 0.0
}

/// Steps `jd` by `unit` days until `done` holds.
fn walk(mut jd: JulianDay, unit: f64, done: impl Fn(JulianDay) -> bool) -> Result<JulianDay> {
    for _ in 0..SEARCH_ITERATION_CAP {
        if done(jd) {
            return Ok(jd);
        }
        jd = jd + unit;
    }
    Err(non_convergent("solar longitude search"))
}
