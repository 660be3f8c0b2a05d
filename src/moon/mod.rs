//! The Moon: its phase, and the sequence of new moons that begin the lunar
//! months.
//!
//! [`new_moon_before`] is the primitive everything else builds on: it always
//! returns the latest new moon *at or before* an instant, never a later one.
//! [`NewMoonPoint`] wraps that result with a time zone so it can be stepped
//! forwards or backwards by whole lunations.

pub mod phase;
pub mod sequence;

pub use phase::{MoonPhase, PhaseQuarters, SYNODIC_MONTH, new_moon_before, phase_quarters};
pub use sequence::NewMoonPoint;
