//! Conversion settings.
//!
//! Every conversion depends on the local time zone, since the lunar month
//! begins on the *local* civil day of the new moon. The zone is modelled as a
//! fixed [`UtcOffset`] (no daylight saving), carried in a [`Config`] that is
//! passed to [`LunarCalendar`](crate::LunarCalendar) explicitly.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CalendarField, Error, Result};
use crate::julian::SECONDS_PER_DAY;

/// Largest accepted distance from UTC, in seconds.
const MAX_OFFSET_SECONDS: u32 = 18 * 3600;

/// A fixed offset east of UTC, in seconds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i32", into = "i32"))]
pub struct UtcOffset(i32);

/// Indochina time (UTC+7), the offset the Vietnamese calendar is computed for.
pub const VIETNAM_UTC_OFFSET: UtcOffset = UtcOffset(7 * 3600);

impl UtcOffset {
    pub const UTC: UtcOffset = UtcOffset(0);

    /// Creates an offset of `seconds` east of UTC.
    ///
    /// Offsets further than 18 hours from UTC are rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use amlich::UtcOffset;
    ///
    /// let hanoi = UtcOffset::new(25200).unwrap();
    /// assert_eq!(Some(hanoi), UtcOffset::from_hours(7).ok());
    /// assert!(UtcOffset::new(-90000).is_err());
    /// ```
    pub fn new(seconds: i32) -> Result<Self> {
        if seconds.unsigned_abs() > MAX_OFFSET_SECONDS {
            return Err(Error::invalid(CalendarField::UtcOffset, seconds));
        }
        Ok(UtcOffset(seconds))
    }
    pub fn from_hours(hours: i32) -> Result<Self> {
        Self::new(hours.saturating_mul(3600))
    }
    pub fn seconds(&self) -> i32 {
        self.0
    }
    /// The offset as a fraction of a day.
    pub fn as_days(&self) -> f64 {
        self.0 as f64 / SECONDS_PER_DAY
    }
}

impl Default for UtcOffset {
    fn default() -> Self {
        VIETNAM_UTC_OFFSET
    }
}

impl TryFrom<i32> for UtcOffset {
    type Error = Error;
    fn try_from(seconds: i32) -> Result<Self> {
        Self::new(seconds)
    }
}

impl From<UtcOffset> for i32 {
    fn from(offset: UtcOffset) -> i32 {
        offset.0
    }
}

/// Settings shared by all conversions of a [`LunarCalendar`](crate::LunarCalendar).
///
/// `Config::default()` is the Vietnamese setting (UTC+7).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    pub utc_offset: UtcOffset,
}

impl Config {
    pub fn with_utc_offset(mut self, utc_offset: UtcOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }
}
