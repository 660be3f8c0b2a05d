//! Tuế: khoảng thời gian từ tháng 11 năm trước đến trước tháng 11 năm nay.

use log::debug;

use crate::config::UtcOffset;
use crate::date::Date;
use crate::error::{AnnusSide, CalendarField, Error, Result};
use crate::moon::NewMoonPoint;
use crate::solar::SolarLongitudePoint;

use super::leap::{LeapMonth, leap_position};
use super::{LunarDate, Month, SUPPORTED_YEARS};

/// Độ dài trung bình của tháng âm lịch, dùng để đếm số tháng giữa hai điểm sóc.
const MEAN_MONTH_DAYS: f64 = 29.53;

/// 「Tuế」, từ điểm sóc tháng 11 năm `annus − 1` đến trước điểm sóc tháng 11
/// năm `annus`.
///
/// Tuế có 12 tháng, hoặc 13 tháng nếu giữa hai tháng 11 có 13 lần sóc; khi đó
/// một tháng trong tuế là tháng nhuận. Các tháng được tính một lần khi tạo
/// `Annus`.
///
/// # Ví dụ
///
/// ```
/// use amlich::{Date, VIETNAM_UTC_OFFSET};
/// use amlich::vietnamese::{Annus, LunarDate, Month::*};
///
/// let annus = Annus::new(2020, VIETNAM_UTC_OFFSET).unwrap();
/// assert_eq!(Some(4), annus.leap_month.map(|l| l.month));
///
/// let date = Date::from_gregorian(2020, 5, 23).unwrap();
/// assert_eq!(Ok(LunarDate::new(2020, Leap(4), 1)), annus.ymd_for(date));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Annus {
    /// Năm, trùng với năm âm lịch của các tháng 1 đến 10
    pub annus: i32,
    pub offset: UtcOffset,
    /// Điểm sóc tháng 11 năm trước, ngày đầu của tuế
    pub eleventh_month: NewMoonPoint,
    /// Điểm sóc tháng 11 năm nay, ngày đầu của tuế sau
    pub next_eleventh_month: NewMoonPoint,
    /// Tháng nhuận trong tuế, nếu có. Nhuận tháng 11, 12 thuộc năm âm lịch
    /// `annus − 1`.
    pub leap_month: Option<LeapMonth>,
    months: Vec<LunarMonth>,
}

/// Một tháng âm lịch trong tuế.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LunarMonth {
    /// Năm âm lịch của tháng
    pub year: i32,
    pub month: Month,
    /// Điểm sóc đầu tháng
    pub start: NewMoonPoint,
    /// Số ngày trong tháng, 29 (tháng thiếu) hoặc 30 (tháng đủ)
    pub days: u32,
}

/// Điểm sóc bắt đầu tháng 11 âm lịch của năm `year`, tức tháng chứa Đông chí.
///
/// Tháng 11 là tháng có ngày Đông chí (theo giờ địa phương), nên điểm sóc
/// được tìm từ cuối ngày Đông chí trở về trước.
pub fn month_eleven_start(year: i32, offset: UtcOffset) -> Result<NewMoonPoint> {
    let ws = SolarLongitudePoint::winter_solstice(year, offset)?;
    let start = NewMoonPoint::month_start(ws.local_date(), offset)?;
    debug!(
        "month 11 of {year} starts {}",
        start.local_date().iso_gregorian()
    );
    Ok(start)
}

/// Năm âm lịch của tháng số `num` trong tuế `annus`.
fn lunar_year(annus: i32, num: u32) -> i32 {
    if num >= 11 { annus - 1 } else { annus }
}

impl Annus {
    /// Lập tuế `annus`.
    ///
    /// Nhận các tuế có ngày thuộc năm dương lịch hoặc âm lịch được hỗ trợ,
    /// tức từ 1800 đến 2202.
    pub fn new(annus: i32, offset: UtcOffset) -> Result<Self> {
        if !(*SUPPORTED_YEARS.start()..=SUPPORTED_YEARS.end() + 2).contains(&annus) {
            return Err(Error::invalid(CalendarField::Year, annus));
        }
        let eleventh_month = month_eleven_start(annus - 1, offset)?;
        let next_eleventh_month = month_eleven_start(annus, offset)?;
        let elapsed = next_eleventh_month.local_date() - eleventh_month.local_date();
        let span = (elapsed as f64 / MEAN_MONTH_DAYS).round() as usize;

        let mut new_moons = Vec::with_capacity(span + 1);
        let mut new_moon = eleventh_month;
        new_moons.push(new_moon);
        for _ in 1..span {
            new_moon = new_moon.next(1)?;
            new_moons.push(new_moon);
        }
        new_moons.push(next_eleventh_month);

        let leap = if span > 12 {
            Some(leap_position(annus, &new_moons)?)
        } else {
            None
        };
        let mut months = Vec::with_capacity(span);
        let mut num = 10;
        for (position, pair) in new_moons.windows(2).enumerate() {
            let month = if leap == Some(position) {
                Month::Leap(num)
            } else {
                num = num % 12 + 1;
                Month::Common(num)
            };
            months.push(LunarMonth {
                year: lunar_year(annus, num),
                month,
                start: pair[0],
                days: (pair[1].local_date() - pair[0].local_date()) as u32,
            });
        }
        let leap_month = months
            .iter()
            .find(|m| m.month.is_leap())
            .map(|m| LeapMonth {
                month: m.month.num(),
                start: m.start,
            });
        if let Some(leap) = leap_month {
            debug!(
                "annus {annus}: leap month {} from {}",
                leap.month,
                leap.start.local_date().iso_gregorian()
            );
        }

        Ok(Annus {
            annus,
            offset,
            eleventh_month,
            next_eleventh_month,
            leap_month,
            months,
        })
    }

    /// Lập tuế chứa ngày `date`.
    ///
    /// # Ví dụ
    ///
    /// ```
    /// use amlich::{Date, VIETNAM_UTC_OFFSET};
    /// use amlich::vietnamese::Annus;
    ///
    /// let date = Date::from_gregorian(2020, 12, 31).unwrap();
    /// assert_eq!(2021, Annus::from_date(date, VIETNAM_UTC_OFFSET).unwrap().annus);
    /// ```
    pub fn from_date(date: Date, offset: UtcOffset) -> Result<Self> {
        let annus = Self::new(date.gregorian().0, offset)?;
        if date < annus.next_eleventh_month.local_date() {
            return Ok(annus);
        }
        Self::new(annus.annus + 1, offset)
    }

    /// Đổi ngày dương lịch `date` sang âm lịch.
    ///
    /// Trả về [`Error::OutsideAnnus`] nếu `date` không thuộc tuế.
    pub fn ymd_for(&self, date: Date) -> Result<LunarDate> {
        let outside = |side| Error::OutsideAnnus {
            annus: self.annus,
            side,
        };
        if date < self.eleventh_month.local_date() {
            return Err(outside(AnnusSide::Before));
        } else if date >= self.next_eleventh_month.local_date() {
            return Err(outside(AnnusSide::After));
        }

        let month = self
            .months
            .iter()
            .take_while(|m| m.start.local_date() <= date)
            .last()
            .ok_or(outside(AnnusSide::Before))?;
        let day = (date - month.start.local_date() + 1) as u32;
        Ok(LunarDate::new(month.year, month.month, day))
    }

    /// Tháng `month` trong tuế: tháng 11, 12 thuộc năm `annus − 1`, các tháng
    /// khác thuộc năm `annus`.
    ///
    /// Trả về [`Error::InvalidLeapMonthRequest`] nếu `month` là tháng nhuận
    /// nhưng không phải tháng nhuận của tuế.
    pub fn month(&self, month: Month) -> Result<LunarMonth> {
        let num = month.num();
        if !(1..=12).contains(&num) {
            return Err(Error::invalid(CalendarField::Month, num));
        }
        self.months
            .iter()
            .find(|m| m.month == month)
            .copied()
            .ok_or(Error::InvalidLeapMonthRequest {
                year: lunar_year(self.annus, num),
                month: num,
            })
    }

    /// Điểm sóc bắt đầu tháng `month` trong tuế.
    pub fn month_start(&self, month: Month) -> Result<NewMoonPoint> {
        self.month(month).map(|m| m.start)
    }

    /// Các tháng của tuế theo thứ tự, từ tháng 11 năm trước, kèm số ngày của
    /// mỗi tháng.
    pub fn months(&self) -> &[LunarMonth] {
        &self.months
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annus(y: i32) -> Annus {
        Annus::new(y, UtcOffset::new(25200).unwrap()).unwrap()
    }

    fn listing(annus: &Annus) -> Vec<(Month, String, u32)> {
        annus
            .months()
            .iter()
            .map(|m| (m.month, m.start.local_date().iso_gregorian(), m.days))
            .collect()
    }

    #[test]
    fn eleventh_months() {
        let offset = UtcOffset::new(25200).unwrap();
        let stds = [
            (2012, "2012-12-13"),
            (2013, "2013-12-03"),
            (2014, "2014-12-22"),
            (2015, "2015-12-11"),
            (2016, "2016-11-29"),
            (2017, "2017-12-18"),
            (2018, "2018-12-07"),
            (2019, "2019-11-26"),
            (2020, "2020-12-14"),
            (2021, "2021-12-04"),
            (2022, "2022-11-24"),
        ];
        for (year, std) in stds {
            let start = month_eleven_start(year, offset).unwrap();
            assert_eq!(std, start.local_date().iso_gregorian(), "{year}");
        }
    }

    #[test]
    fn months() {
        use Month::*;
        let stds = [
            (Common(11), "2019-11-26", 30),
            (Common(12), "2019-12-26", 30),
            (Common(1), "2020-01-25", 29),
            (Common(2), "2020-02-23", 30),
            (Common(3), "2020-03-24", 30),
            (Common(4), "2020-04-23", 30),
            (Leap(4), "2020-05-23", 29),
            (Common(5), "2020-06-21", 30),
            (Common(6), "2020-07-21", 29),
            (Common(7), "2020-08-19", 29),
            (Common(8), "2020-09-17", 30),
            (Common(9), "2020-10-17", 29),
            (Common(10), "2020-11-15", 29),
        ];
        let annus = annus(2020);
        let stds: Vec<_> = stds.iter().map(|&(m, d, n)| (m, d.to_string(), n)).collect();
        assert_eq!(stds, listing(&annus));
        let years: Vec<_> = annus.months().iter().map(|m| m.year).collect();
        assert_eq!([vec![2019; 2], vec![2020; 11]].concat(), years);
    }

    #[test]
    fn leap_months() {
        let stds = [
            (11, "2016-11-29"),
            (12, "2016-12-29"),
            (1, "2017-01-28"),
            (2, "2017-02-26"),
            (3, "2017-03-28"),
            (4, "2017-04-26"),
            (5, "2017-05-26"),
            (6, "2017-06-24"),
            (-6, "2017-07-23"),
            (7, "2017-08-22"),
            (8, "2017-09-20"),
            (9, "2017-10-20"),
            (10, "2017-11-18"),
        ];
        let annus = annus(2017);
        let months = annus.months();
        for (std, month) in stds.iter().zip(months) {
            let std_month = if std.0 > 0 {
                Month::Common(std.0 as u32)
            } else {
                Month::Leap(-std.0 as u32)
            };
            assert_eq!(
                (std_month, std.1.into()),
                (month.month, month.start.local_date().iso_gregorian())
            );
            assert_eq!(month.start, annus.month_start(month.month).unwrap());
        }
        assert_eq!(stds.len(), months.len());
    }

    #[test]
    fn leap_month_after_the_eleventh() {
        use Month::*;
        let stds = [
            (Common(11), "2033-11-22", 30),
            (Leap(11), "2033-12-22", 29),
            (Common(12), "2034-01-20", 30),
            (Common(1), "2034-02-19", 29),
            (Common(2), "2034-03-20", 30),
            (Common(3), "2034-04-19", 29),
            (Common(4), "2034-05-18", 29),
            (Common(5), "2034-06-16", 30),
            (Common(6), "2034-07-16", 29),
            (Common(7), "2034-08-14", 29),
            (Common(8), "2034-09-12", 30),
            (Common(9), "2034-10-12", 30),
            (Common(10), "2034-11-11", 30),
        ];
        let stds: Vec<_> = stds.iter().map(|&(m, d, n)| (m, d.to_string(), n)).collect();
        let annus = annus(2034);
        assert_eq!(stds, listing(&annus));
        assert_eq!(2033, annus.months()[1].year);
        assert_eq!(Some(11), annus.leap_month.map(|l| l.month));
    }

    #[test]
    fn twelve_month_annus() {
        let annus = annus(2033);
        assert_eq!(12, annus.months().len());
        assert_eq!(None, annus.leap_month);
        assert_eq!(
            "2033-11-22",
            annus.next_eleventh_month.local_date().iso_gregorian()
        );
    }

    #[test]
    fn leap_months_found_by_scanning() {
        let dataset = [
            (1832, (9, "1832-10-24")),
            (1851, (8, "1851-09-25")),
            (1870, (10, "1870-11-23")),
            (2148, (1, "2148-02-20")),
            (2166, (10, "2166-11-23")),
            (2186, (2, "2186-03-21")),
        ];
        for (year, std) in dataset {
            let leap = annus(year).leap_month.map(|l| (l.month, l.start.local_date().iso_gregorian()));
            assert_eq!(Some((std.0, std.1.to_string())), leap, "{year}");
        }
    }

    #[test]
    fn dates() {
        use AnnusSide::*;
        use Month::*;
        let dataset = [
            ((2016, 11, 29), Ok(LunarDate::new(2016, Common(11), 1))),
            ((2016, 12, 31), Ok(LunarDate::new(2016, Common(12), 3))),
            ((2017, 1, 1), Ok(LunarDate::new(2016, Common(12), 4))),
            ((2017, 1, 27), Ok(LunarDate::new(2016, Common(12), 30))),
            ((2017, 1, 28), Ok(LunarDate::new(2017, Common(1), 1))),
            ((2017, 7, 22), Ok(LunarDate::new(2017, Common(6), 29))),
            ((2017, 7, 23), Ok(LunarDate::new(2017, Leap(6), 1))),
            ((2017, 8, 22), Ok(LunarDate::new(2017, Common(7), 1))),
            ((2017, 12, 17), Ok(LunarDate::new(2017, Common(10), 30))),
            ((2016, 11, 28), Err(Before)),
            ((2017, 12, 18), Err(After)),
        ];
        let annus = annus(2017);
        for ((y, m, d), std) in dataset {
            let std = std.map_err(|side| Error::OutsideAnnus { annus: 2017, side });
            assert_eq!(std, annus.ymd_for(Date::from_gregorian(y, m, d).unwrap()), "{y}-{m}-{d}");
        }
    }

    #[test]
    fn annus_of_a_date() {
        let offset = UtcOffset::new(25200).unwrap();
        let dataset = [
            ((2017, 1, 1), 2017),
            ((2017, 12, 17), 2017),
            ((2017, 12, 18), 2018),
            ((2017, 12, 31), 2018),
        ];
        for ((y, m, d), std) in dataset {
            let date = Date::from_gregorian(y, m, d).unwrap();
            assert_eq!(std, Annus::from_date(date, offset).unwrap().annus, "{y}-{m}-{d}");
        }
    }

    #[test]
    fn invalid_leap_request() {
        let annus = annus(2020);
        for (year, num) in [(2020, 3), (2020, 5), (2019, 11)] {
            assert_eq!(
                Err(Error::InvalidLeapMonthRequest { year, month: num }),
                annus.month_start(Month::Leap(num))
            );
        }
        assert!(annus.month_start(Month::Leap(4)).is_ok());
        assert_eq!(
            Err(Error::invalid(CalendarField::Month, 13)),
            annus.month_start(Month::Common(13))
        );
    }

    #[test]
    fn supported_annus() {
        let offset = UtcOffset::new(25200).unwrap();
        for year in [1799, 2203] {
            assert_eq!(Err(Error::invalid(CalendarField::Year, year)), Annus::new(year, offset));
        }
    }
}
