//! Golden tests of the solar longitude model against an almanac table for
//! 2022 (UTC+7): the start of each of the 24 terms and the apparent
//! longitude at local midnight on the 1st and 15th of each month.
//!
//! Tolerance policy:
//! - Term starts: 20 minutes. The series is low precision and searches
//!   resolve to the minute.
//! - Longitudes at midnight: 0.0166° (one arcminute).
//! - Boundary searches from a fixed point: 0.01° from the target.

#![allow(clippy::excessive_precision)]

use amlich::julian::MINUTE;
use amlich::solar::{SolarLongitudePoint, normalize_degrees};
use amlich::{JulianDay, VIETNAM_UTC_OFFSET};
use approx::assert_abs_diff_eq;

/// Local wall-clock time in UTC+7 and the tabulated longitude there.
const TERM_STARTS: &[((i32, u32, u32, u32, u32), f64)] = &[
    ((2022, 1, 5, 16, 0), 285.000486526473),
    ((2022, 1, 20, 9, 25), 300.000448399939),
    ((2022, 2, 4, 3, 38), 315.00111845557),
    ((2022, 2, 18, 23, 30), 330.000552395466),
    ((2022, 3, 5, 21, 35), 345.002982423317),
    ((2022, 3, 20, 22, 30), 0.00605007937692163),
    ((2022, 4, 5, 2, 10), 15.0008672352589),
    ((2022, 4, 20, 9, 15), 30.0010161698917),
    ((2022, 5, 5, 19, 20), 45.0030002455117),
    ((2022, 5, 21, 8, 15), 60.0016554633466),
    ((2022, 6, 5, 23, 20), 75.0029037529872),
    ((2022, 6, 21, 16, 10), 90.0042114061488),
    ((2022, 7, 7, 9, 30), 105.001725519045),
    ((2022, 7, 23, 3, 0), 120.002437859498),
    ((2022, 8, 7, 19, 20), 135.001112185361),
    ((2022, 8, 23, 10, 10), 150.002880585943),
    ((2022, 9, 7, 22, 30), 165.005452151502),
    ((2022, 9, 23, 8, 0), 180.004273853586),
    ((2022, 10, 8, 14, 20), 195.005103567353),
    ((2022, 10, 23, 17, 30), 210.002750657168),
    ((2022, 11, 7, 17, 40), 225.003057348988),
    ((2022, 11, 22, 15, 20), 240.00667516395),
    ((2022, 12, 7, 10, 40), 255.002954228177),
    ((2022, 12, 22, 4, 40), 270.001981764075),
];

const MIDNIGHT_LONGITUDES: &[((i32, u32, u32), f64)] = &[
    ((2022, 1, 1), 280.242268375155),
    ((2022, 1, 15), 294.51149074748),
    ((2022, 2, 1), 311.802017600556),
    ((2022, 2, 15), 325.984503615979),
    ((2022, 3, 1), 340.087163738169),
    ((2022, 3, 15), 354.098325158878),
    ((2022, 4, 1), 10.9651653198798),
    ((2022, 4, 15), 24.7352277079809),
    ((2022, 5, 1), 40.3398261656552),
    ((2022, 5, 15), 53.8912431206067),
    ((2022, 6, 1), 70.2382449850886),
    ((2022, 6, 15), 83.6340137171336),
    ((2022, 7, 1), 98.9025082335133),
    ((2022, 7, 15), 112.250716282277),
    ((2022, 8, 1), 128.485719751876),
    ((2022, 8, 15), 141.900275567573),
    ((2022, 9, 1), 158.284797045662),
    ((2022, 9, 15), 171.869113028216),
    ((2022, 10, 1), 187.524156529792),
    ((2022, 10, 15), 201.33372535134),
    ((2022, 11, 1), 218.257000197568),
    ((2022, 11, 15), 232.301809709032),
    ((2022, 12, 1), 248.467971354473),
    ((2022, 12, 15), 262.678611917571),
];

fn local(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> SolarLongitudePoint {
    let jd = JulianDay::from_calendar(y, m, d, h, mi, s).unwrap() - VIETNAM_UTC_OFFSET.as_days();
    SolarLongitudePoint::at(jd, VIETNAM_UTC_OFFSET)
}

fn degree_diff(a: f64, b: f64) -> f64 {
    let d = normalize_degrees(a - b);
    d.min(360.0 - d)
}

#[test]
fn term_starts_2022() {
    for &((y, m, d, h, mi), lon) in TERM_STARTS {
        let reference = local(y, m, d, h, mi, 0);
        let inside = SolarLongitudePoint::at(reference.jd() + 1.0, VIETNAM_UTC_OFFSET);
        let start = inside.term_start().unwrap();
        assert_eq!(lon.round() as u32 % 360, start.term_degree(), "{y}-{m}-{d}");
        assert!(
            (start.jd() - reference.jd()).abs() < 20.0 * MINUTE,
            "{y}-{m}-{d}: off by {:.1} min",
            (start.jd() - reference.jd()) / MINUTE
        );
    }
}

#[test]
fn midnight_longitudes_2022() {
    for &((y, m, d), lon) in MIDNIGHT_LONGITUDES {
        let point = local(y, m, d, 0, 0, 0);
        assert_abs_diff_eq!(0.0, degree_diff(lon, point.degree()), epsilon = 0.0166);
    }
}

#[test]
fn boundaries_after_a_fixed_point() {
    let start = local(2022, 1, 1, 16, 4, 52);
    for &(_, lon) in TERM_STARTS {
        let step = normalize_degrees(lon - start.degree());
        let found = start.boundary_after(step).unwrap();
        assert!(found.jd() > start.jd());
        assert_abs_diff_eq!(0.0, degree_diff(lon, found.degree()), epsilon = 0.01);
    }
}

#[test]
fn boundaries_before_a_fixed_point() {
    let start = local(2023, 1, 1, 0, 0, 0);
    for &(_, lon) in MIDNIGHT_LONGITUDES {
        let step = normalize_degrees(start.degree() - lon);
        let found = start.boundary_before(step).unwrap();
        assert!(found.jd() <= start.jd());
        assert_abs_diff_eq!(0.0, degree_diff(lon, found.degree()), epsilon = 0.01);
    }
}
