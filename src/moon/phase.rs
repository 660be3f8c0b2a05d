//! Phase of the Moon, and the instants of its principal phases.
//!
//! The phase model integrates fixed orbital elements from the epoch 1980
//! January 0.0 (Kepler's equation for the Sun, then the main lunar
//! perturbations). The instants of new moon and the quarters come from the
//! mean lunation number `k` plus the periodic corrections of the true phase.

use log::trace;

use crate::config::UtcOffset;
use crate::error::Result;
use crate::julian::JulianDay;
use crate::search_util::{SEARCH_ITERATION_CAP, non_convergent, normalize_360};

/// Mean length of the synodic month, in days.
pub const SYNODIC_MONTH: f64 = 29.53058868;

/// Epoch of the orbital elements, 1980 January 0.0.
const EPOCH: f64 = 2_444_238.5;

// Sun
const ECLIPTIC_LONGITUDE_AT_EPOCH: f64 = 278.833540;
const ECLIPTIC_LONGITUDE_OF_PERIGEE: f64 = 282.596403;
const EARTH_ECCENTRICITY: f64 = 0.016718;
const SUN_SEMI_MAJOR_AXIS: f64 = 1.495985e8;
const SUN_ANGULAR_SIZE: f64 = 0.533128;

// Moon
const MOON_MEAN_LONGITUDE_AT_EPOCH: f64 = 64.975464;
const MOON_MEAN_LONGITUDE_OF_PERIGEE: f64 = 349.383063;
const MOON_ECCENTRICITY: f64 = 0.054900;
const MOON_ANGULAR_SIZE: f64 = 0.5181;
const MOON_SEMI_MAJOR_AXIS: f64 = 384_401.0;

/// Julian date of the first mean new moon of 1900 (lunation 0).
const LUNATION_BASE: f64 = 2_415_020.75933;

const KEPLER_EPSILON: f64 = 1e-6;
const KEPLER_MAX_ITERATIONS: usize = 32;

/// State of the Moon at an instant.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MoonPhase {
    /// Fraction of the lunation elapsed, `[0, 1)`: 0 at new moon, 0.5 at full
    /// moon.
    pub phase: f64,
    /// Illuminated fraction of the disc, `[0, 1]`.
    pub illumination: f64,
    /// Days since the last new moon.
    pub age: f64,
    /// Elongation of the Moon from the Sun, degrees `[0, 360)`.
    pub age_degrees: f64,
    /// Distance from the Earth's centre, in km.
    pub distance: f64,
    /// Angular diameter, in degrees.
    pub angular_diameter: f64,
    /// Distance of the Sun, in km.
    pub sun_distance: f64,
    /// Angular diameter of the Sun, in degrees.
    pub sun_angular_diameter: f64,
}

impl MoonPhase {
    /// Computes the phase of the Moon at `jd`.
    ///
    /// # Example
    ///
    /// ```
    /// use amlich::JulianDay;
    /// use amlich::moon::MoonPhase;
    ///
    /// let full = JulianDay::from_calendar(2020, 5, 7, 10, 45, 0).unwrap();
    /// assert!(MoonPhase::at(full).illumination > 0.999);
    /// ```
    pub fn at(jd: JulianDay) -> Self {
        let day = jd.0 - EPOCH;

        // Sun
        let n = normalize_360((360.0 / 365.2422) * day);
        let m = normalize_360(n + ECLIPTIC_LONGITUDE_AT_EPOCH - ECLIPTIC_LONGITUDE_OF_PERIGEE);
        let e = kepler(m, EARTH_ECCENTRICITY);
        let true_anomaly = 2.0
            * (((1.0 + EARTH_ECCENTRICITY) / (1.0 - EARTH_ECCENTRICITY)).sqrt() * (e / 2.0).tan())
                .atan()
                .to_degrees();
        let sun_longitude = normalize_360(true_anomaly + ECLIPTIC_LONGITUDE_OF_PERIGEE);
        let orbital_factor = (1.0 + EARTH_ECCENTRICITY * true_anomaly.to_radians().cos())
            / (1.0 - EARTH_ECCENTRICITY * EARTH_ECCENTRICITY);

        // Moon
        let ml = normalize_360(13.1763966 * day + MOON_MEAN_LONGITUDE_AT_EPOCH);
        let mm = normalize_360(ml - 0.1114041 * day - MOON_MEAN_LONGITUDE_OF_PERIGEE);
        let evection = 1.2739 * (2.0 * (ml - sun_longitude) - mm).to_radians().sin();
        let annual_equation = 0.1858 * m.to_radians().sin();
        let a3 = 0.37 * m.to_radians().sin();
        let mmp = mm + evection - annual_equation - a3;
        let centre = 6.2886 * mmp.to_radians().sin();
        let a4 = 0.214 * (2.0 * mmp).to_radians().sin();
        let lp = ml + evection + centre - annual_equation + a4;
        let variation = 0.6583 * (2.0 * (lp - sun_longitude)).to_radians().sin();
        let true_longitude = lp + variation;

        let age_degrees = true_longitude - sun_longitude;
        let phase = normalize_360(age_degrees) / 360.0;
        let distance = (MOON_SEMI_MAJOR_AXIS * (1.0 - MOON_ECCENTRICITY * MOON_ECCENTRICITY))
            / (1.0 + MOON_ECCENTRICITY * (mmp + centre).to_radians().cos());

        MoonPhase {
            phase,
            illumination: (1.0 - age_degrees.to_radians().cos()) / 2.0,
            age: SYNODIC_MONTH * phase,
            age_degrees: normalize_360(age_degrees),
            distance,
            angular_diameter: MOON_ANGULAR_SIZE / (distance / MOON_SEMI_MAJOR_AXIS),
            sun_distance: SUN_SEMI_MAJOR_AXIS / orbital_factor,
            sun_angular_diameter: orbital_factor * SUN_ANGULAR_SIZE,
        }
    }
}

/// Solves Kepler's equation for the eccentric anomaly, in radians, given the
/// mean anomaly `m` in degrees.
fn kepler(m: f64, ecc: f64) -> f64 {
    let m = m.to_radians();
    let mut e = m;
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta = e - ecc * e.sin() - m;
        e -= delta / (1.0 - ecc * e.cos());
        if delta.abs() <= KEPLER_EPSILON {
            break;
        }
    }
    e
}

/// Instants of the principal phases of one lunation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhaseQuarters {
    pub new_moon: JulianDay,
    pub first_quarter: JulianDay,
    pub full_moon: JulianDay,
    pub last_quarter: JulianDay,
    pub next_new_moon: JulianDay,
}

/// The latest new moon at or before `jd`.
///
/// # Example
///
/// ```
/// use amlich::{JulianDay, UtcOffset};
/// use amlich::moon::new_moon_before;
///
/// let jd = JulianDay::from_calendar(2020, 5, 1, 0, 0, 0).unwrap();
/// let new_moon = new_moon_before(jd).unwrap();
/// assert_eq!("2020-04-23", new_moon.date(UtcOffset::UTC).iso_gregorian());
/// ```
pub fn new_moon_before(jd: JulianDay) -> Result<JulianDay> {
    Ok(JulianDay(true_phase(lunation_before(jd)?, 0.0)))
}

/// The principal phases of the lunation in progress at `jd`.
pub fn phase_quarters(jd: JulianDay) -> Result<PhaseQuarters> {
    let k = lunation_before(jd)?;
    Ok(PhaseQuarters {
        new_moon: JulianDay(true_phase(k, 0.0)),
        first_quarter: JulianDay(true_phase(k, 0.25)),
        full_moon: JulianDay(true_phase(k, 0.5)),
        last_quarter: JulianDay(true_phase(k, 0.75)),
        next_new_moon: JulianDay(true_phase(k + 1.0, 0.0)),
    })
}

/// Number of the lunation (counted from January 1900) in progress at `jd`.
///
/// Starts 45 days earlier and walks mean new moons forward until one
/// brackets `jd`, switching to the true phase once a mean new moon falls
/// within 0.75 days of it.
fn lunation_before(jd: JulianDay) -> Result<f64> {
    let sdate = jd.0;
    let mut adate = sdate - 45.0;
    let (year, month, _) = JulianDay(adate).date(UtcOffset::UTC).gregorian();
    let mut k1 = ((year as f64 + (month - 1) as f64 / 12.0 - 1900.0) * 12.3685).floor();
    let mut nt1 = mean_phase(adate, k1);
    for _ in 0..SEARCH_ITERATION_CAP {
        adate += SYNODIC_MONTH;
        let k2 = k1 + 1.0;
        let mut nt2 = mean_phase(adate, k2);
        if (nt2 - sdate).abs() < 0.75 {
            nt2 = true_phase(k2, 0.0);
        }
        if nt1 <= sdate && nt2 > sdate {
            trace!("lunation {k1} brackets JD {sdate:.6}");
            // the bracket may still hold a mean phase on one side
            if true_phase(k1 + 1.0, 0.0) <= sdate {
                return Ok(k1 + 1.0);
            } else if true_phase(k1, 0.0) > sdate {
                return Ok(k1 - 1.0);
            }
            return Ok(k1);
        }
        nt1 = nt2;
        k1 = k2;
    }
    Err(non_convergent("phase hunt"))
}

/// Mean new moon of lunation `k`, with time `t` taken at `sdate`.
fn mean_phase(sdate: f64, k: f64) -> f64 {
    let t = (sdate - 2_415_020.0) / 36525.0;
    let t2 = t * t;
    let t3 = t2 * t;
    LUNATION_BASE + SYNODIC_MONTH * k + 0.0001178 * t2 - 0.000000155 * t3
        + 0.00033 * (166.56 + 132.87 * t - 0.009173 * t2).to_radians().sin()
}

/// True instant of `phase` (0, 0.25, 0.5 or 0.75) in lunation `k`.
fn true_phase(k: f64, phase: f64) -> f64 {
    let k = k + phase;
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let mut pt = LUNATION_BASE + SYNODIC_MONTH * k + 0.0001178 * t2 - 0.000000155 * t3
        + 0.00033 * (166.56 + 132.87 * t - 0.009173 * t2).to_radians().sin();

    // Sun's mean anomaly, Moon's mean anomaly, Moon's argument of latitude
    let m = (359.2242 + 29.10535608 * k - 0.0000333 * t2 - 0.00000347 * t3).to_radians();
    let mp = (306.0253 + 385.81691806 * k + 0.0107306 * t2 + 0.00001236 * t3).to_radians();
    let f = (21.2964 + 390.67050646 * k - 0.0016528 * t2 - 0.00000239 * t3).to_radians();

    if phase < 0.01 || (phase - 0.5).abs() < 0.01 {
        pt += (0.1734 - 0.000393 * t) * m.sin() + 0.0021 * (2.0 * m).sin() - 0.4068 * mp.sin()
            + 0.0161 * (2.0 * mp).sin()
            - 0.0004 * (3.0 * mp).sin()
            + 0.0104 * (2.0 * f).sin()
            - 0.0051 * (m + mp).sin()
            - 0.0074 * (m - mp).sin()
            + 0.0004 * (2.0 * f + m).sin()
            - 0.0004 * (2.0 * f - m).sin()
            - 0.0006 * (2.0 * f + mp).sin()
            + 0.0010 * (2.0 * f - mp).sin()
            + 0.0005 * (m + 2.0 * mp).sin();
    } else {
        pt += (0.1721 - 0.0004 * t) * m.sin() + 0.0021 * (2.0 * m).sin() - 0.6280 * mp.sin()
            + 0.0089 * (2.0 * mp).sin()
            - 0.0004 * (3.0 * mp).sin()
            + 0.0079 * (2.0 * f).sin()
            - 0.0119 * (m + mp).sin()
            - 0.0047 * (m - mp).sin()
            + 0.0003 * (2.0 * f + m).sin()
            - 0.0004 * (2.0 * f - m).sin()
            - 0.0006 * (2.0 * f + mp).sin()
            + 0.0021 * (2.0 * f - mp).sin()
            + 0.0003 * (m + 2.0 * mp).sin()
            + 0.0004 * (m - 2.0 * mp).sin()
            - 0.0003 * (2.0 * m + mp).sin();
        let quarter = 0.0028 - 0.0004 * m.cos() + 0.0003 * mp.cos();
        pt += if phase < 0.5 { quarter } else { -quarter };
    }
    pt
}
