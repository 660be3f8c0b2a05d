//! Helpers shared by the iterative searches.

use log::warn;

use crate::error::Error;

/// Iteration cap applied to every search loop in this crate.
///
/// The widest loop (stepping whole days across a 15° term, or lunations
/// across the phase-hunt window) needs well under 40 steps.
pub const SEARCH_ITERATION_CAP: usize = 120;

/// Normalize an angle to [0, 360) degrees.
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg % 360.0;
    let r = if r < 0.0 { r + 360.0 } else { r };
    // -1e-17 % 360 + 360 rounds to 360
    if r >= 360.0 { r - 360.0 } else { r }
}

/// Normalize an angle to [-180, +180).
pub(crate) fn normalize_to_pm180(deg: f64) -> f64 {
    let r = normalize_360(deg);
    if r >= 180.0 { r - 360.0 } else { r }
}

pub(crate) fn non_convergent(search: &'static str) -> Error {
    warn!("{search}: gave up after {SEARCH_ITERATION_CAP} iterations");
    Error::NonConvergentSearch {
        search,
        cap: SEARCH_ITERATION_CAP,
    }
}
