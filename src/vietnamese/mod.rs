//! Vietnamese calendar
//!
//! Note: để tiện dùng thuật ngữ, tài liệu của mô-đun này viết bằng tiếng Việt.
//!
//! Âm lịch được lập từ hai yếu tố thiên văn: điểm sóc (trăng mới) quyết định
//! ngày đầu mỗi tháng, kinh độ mặt trời quyết định tiết khí, tháng 11 (tháng
//! chứa Đông chí) và tháng nhuận. Mọi phép tính theo giờ địa phương, mặc định
//! là UTC+7; lịch tính theo múi giờ khác (ví dụ UTC+8) có thể lệch một ngày
//! hoặc khác tháng nhuận.
//!
//! # Ví dụ
//!
//! ```
//! use amlich::Date;
//! use amlich::vietnamese::{LunarCalendar, LunarDate, Month::*};
//!
//! let calendar = LunarCalendar::default();
//! let date = Date::from_gregorian(2020, 5, 23).unwrap();
//!
//! assert_eq!(LunarDate::new(2020, Leap(4), 1), calendar.from_solar(date).unwrap());
//! assert_eq!(date, calendar.to_solar(LunarDate::new(2020, Leap(4), 1)).unwrap());
//! ```

use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{Config, UtcOffset};
use crate::date::Date;
use crate::error::{CalendarField, Error, Result};
use crate::julian::{JulianDay, SECONDS_PER_DAY};
use crate::moon::NewMoonPoint;
use crate::solar::SolarLongitudePoint;

mod annus;
mod leap;

pub use annus::{Annus, LunarMonth, month_eleven_start};
pub use leap::{LeapMonth, is_leap_year};

/// Các năm (dương lịch cũng như âm lịch) được hỗ trợ khi đổi lịch.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1800..=2200;

pub(crate) fn check_year(year: i32) -> Result<()> {
    if !SUPPORTED_YEARS.contains(&year) {
        return Err(Error::invalid(CalendarField::Year, year));
    }
    Ok(())
}

/// Tên tháng, `Common` là tháng thường, `Leap` là tháng nhuận.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Month {
    Common(u32),
    Leap(u32),
}
impl Month {
    pub fn new(num: u32, is_leap: bool) -> Self {
        if is_leap { Month::Leap(num) } else { Month::Common(num) }
    }
    /// Số thứ tự tháng, không phân biệt thường hay nhuận.
    pub fn num(&self) -> u32 {
        use Month::*;
        *match self {
            Common(v) | Leap(v) => v,
        }
    }
    /// `true` với tháng nhuận, `false` với tháng thường
    pub fn is_leap(&self) -> bool {
        matches!(self, Self::Leap(_))
    }
}

/// Ngày âm lịch.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LunarDate {
    pub year: i32,
    pub month: Month,
    pub day: u32,
}

impl LunarDate {
    pub fn new(year: i32, month: Month, day: u32) -> Self {
        LunarDate { year, month, day }
    }
    pub fn is_leap_month(&self) -> bool {
        self.month.is_leap()
    }
}

/// Bộ đổi lịch dương ⇄ âm theo một [`Config`].
///
/// `LunarCalendar::default()` tính theo giờ Việt Nam (UTC+7).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LunarCalendar {
    config: Config,
}

impl LunarCalendar {
    pub fn new(config: Config) -> Self {
        LunarCalendar { config }
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    fn offset(&self) -> UtcOffset {
        self.config.utc_offset
    }

    /// Lập tuế `year`, dùng khi cần đổi nhiều ngày trong cùng một năm.
    pub fn annus(&self, year: i32) -> Result<Annus> {
        Annus::new(year, self.offset())
    }

    /// Đổi ngày dương lịch sang âm lịch.
    ///
    /// # Ví dụ
    ///
    /// ```
    /// use amlich::Date;
    /// use amlich::vietnamese::{LunarCalendar, LunarDate, Month::*};
    ///
    /// let calendar = LunarCalendar::default();
    /// let date = Date::from_gregorian(2022, 12, 20).unwrap();
    /// assert_eq!(LunarDate::new(2022, Common(11), 27), calendar.from_solar(date).unwrap());
    /// ```
    pub fn from_solar(&self, date: Date) -> Result<LunarDate> {
        // năm âm lịch là `year − 1` hoặc `year`
        let year = date.gregorian().0;
        if !SUPPORTED_YEARS.contains(&year) && !SUPPORTED_YEARS.contains(&(year - 1)) {
            return Err(Error::invalid(CalendarField::Year, year));
        }
        let lunar = Annus::from_date(date, self.offset())?.ymd_for(date)?;
        check_year(lunar.year)?;
        Ok(lunar)
    }

    /// Ngày âm lịch tại thời điểm Unix `timestamp`, theo giờ địa phương.
    pub fn from_timestamp(&self, timestamp: f64) -> Result<LunarDate> {
        self.from_solar(JulianDay::from_timestamp(timestamp).date(self.offset()))
    }

    /// Đổi ngày âm lịch sang dương lịch.
    ///
    /// Trả về [`Error::InvalidLeapMonthRequest`] nếu tháng được yêu cầu là
    /// tháng nhuận nhưng năm đó không nhuận tháng ấy, và
    /// [`Error::InvalidCalendarField`] nếu ngày vượt quá số ngày của tháng.
    pub fn to_solar(&self, lunar: LunarDate) -> Result<Date> {
        if !(1..=30).contains(&lunar.day) {
            return Err(Error::invalid(CalendarField::Day, lunar.day));
        }
        let month = self.month(lunar.year, lunar.month)?;
        if lunar.day > month.days {
            return Err(Error::invalid(CalendarField::Day, lunar.day));
        }
        Ok(month.start.local_date() + (lunar.day as i32 - 1))
    }

    /// Tháng `month` năm âm lịch `year`: tháng 11, 12 nằm trong tuế
    /// `year + 1`, các tháng khác trong tuế `year`.
    pub fn month(&self, year: i32, month: Month) -> Result<LunarMonth> {
        check_year(year)?;
        let num = month.num();
        if !(1..=12).contains(&num) {
            return Err(Error::invalid(CalendarField::Month, num));
        }
        let annus = if num >= 11 { year + 1 } else { year };
        self.annus(annus)?.month(month)
    }

    /// Điểm sóc bắt đầu tháng `month` năm âm lịch `year`.
    pub fn month_start(&self, year: i32, month: Month) -> Result<NewMoonPoint> {
        self.month(year, month).map(|m| m.start)
    }

    /// Số ngày của tháng âm lịch, 29 hoặc 30.
    pub fn days_in_month(&self, year: i32, month: Month) -> Result<u32> {
        self.month(year, month).map(|m| m.days)
    }

    /// Tháng nhuận của năm âm lịch `year`, `None` nếu năm không nhuận.
    ///
    /// Nhuận tháng 1 đến 10 nằm trong tuế `year`, nhuận tháng 11, 12 nằm
    /// trong tuế `year + 1`.
    ///
    /// # Ví dụ
    ///
    /// ```
    /// use amlich::vietnamese::LunarCalendar;
    ///
    /// let calendar = LunarCalendar::default();
    /// assert_eq!(Some(2), calendar.leap_month(2023).unwrap().map(|l| l.month));
    /// assert_eq!(None, calendar.leap_month(2024).unwrap());
    /// ```
    pub fn leap_month(&self, year: i32) -> Result<Option<LeapMonth>> {
        check_year(year)?;
        let leap = self.annus(year)?.leap_month.filter(|l| l.month <= 10);
        if leap.is_some() {
            return Ok(leap);
        }
        Ok(self.annus(year + 1)?.leap_month.filter(|l| l.month >= 11))
    }

    /// Tháng `month` năm `year` có thể là tháng nhuận hay không.
    pub fn can_be_leap(&self, year: i32, month: u32) -> Result<bool> {
        if !(1..=12).contains(&month) {
            return Ok(false);
        }
        Ok(self.leap_month(year)?.is_some_and(|l| l.month == month))
    }

    /// Điểm Đông chí năm `year`.
    pub fn winter_solstice(&self, year: i32) -> Result<SolarLongitudePoint> {
        SolarLongitudePoint::winter_solstice(year, self.offset())
    }

    /// Tiết khí của ngày `date`: điểm bắt đầu tiết khí gần nhất trước khi
    /// hết ngày, và số ngày từ ngày bắt đầu tiết khí đến `date` (0 nếu giao
    /// khí trong ngày).
    ///
    /// # Ví dụ
    ///
    /// ```
    /// use amlich::Date;
    /// use amlich::vietnamese::LunarCalendar;
    ///
    /// let calendar = LunarCalendar::default();
    /// let date = Date::from_gregorian(2023, 1, 1).unwrap();
    /// let (term, days) = calendar.solar_term_for(date).unwrap();
    /// assert_eq!((270, 10), (term.term_degree(), days)); // Đông chí, ngày thứ 10
    /// ```
    pub fn solar_term_for(&self, date: Date) -> Result<(SolarLongitudePoint, u32)> {
        let end_of_day = JulianDay::local_midnight(date + 1, self.offset()) - 1.0 / SECONDS_PER_DAY;
        let term = SolarLongitudePoint::at(end_of_day, self.offset()).term_start()?;
        Ok((term, (date - term.local_date()) as u32))
    }
}
