//! Xác định tháng nhuận.
//!
//! Năm nhuận theo chu kỳ Meton: trong 19 năm có 7 năm nhuận, là các năm có
//! số dư khi chia cho 19 thuộc {0, 3, 6, 9, 11, 14, 17}. Tháng nhuận là tháng
//! đầu tiên trong năm không chứa trung khí (khí có kinh độ mặt trời là bội của
//! 30°). Tháng 11, tháng 12 và tháng giêng không bao giờ nhuận, nên chỉ xét
//! các tháng 2 đến 10.
//!
//! Quy tắc trên không phải lúc nào cũng khớp với số lần sóc giữa hai tháng
//! 11. Tuế có 13 tháng thì luôn có một tháng nhuận: lấy tháng tìm được theo
//! quy tắc nếu nó nằm trong tuế, nếu không thì lấy tháng đầu tiên sau tháng
//! 11 không chứa trung khí. Tuế có 12 tháng thì không có tháng nhuận.

use log::debug;

use crate::error::Result;
use crate::julian::{JulianDay, SECONDS_PER_DAY};
use crate::moon::NewMoonPoint;
use crate::solar::SolarLongitudePoint;

const LEAP_YEAR_REMAINDERS: [i32; 7] = [0, 3, 6, 9, 11, 14, 17];

/// Số tháng được xét (tháng 2 đến tháng 10).
const CANDIDATE_MONTHS: u32 = 9;

/// Số ngày tối đa trung khí có thể rơi trước điểm sóc của tháng được xét.
const MAX_TERM_LAG_DAYS: i32 = 5;

/// Tháng nhuận của một năm âm lịch (hoặc của một tuế).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LeapMonth {
    /// Số thứ tự tháng, tháng nhuận đứng sau tháng thường cùng số.
    pub month: u32,
    /// Điểm sóc bắt đầu tháng nhuận.
    pub start: NewMoonPoint,
}

/// Năm âm lịch `year` có tháng nhuận hay không, theo chu kỳ 19 năm.
///
/// # Ví dụ
///
/// ```
/// use amlich::vietnamese::is_leap_year;
///
/// assert!(is_leap_year(2020));
/// assert!(!is_leap_year(2021));
/// ```
pub fn is_leap_year(year: i32) -> bool {
    LEAP_YEAR_REMAINDERS.contains(&year.rem_euclid(19))
}

/// Tìm tháng nhuận của năm `year`, bắt đầu từ điểm sóc tháng 11 năm trước
/// `eleventh_month`.
///
/// Với mỗi tháng từ tháng 2, lấy khí bắt đầu gần nhất trước điểm sóc. Nếu đó
/// là trung khí và rơi trước điểm sóc từ 1 đến 5 ngày, mà trung khí kế tiếp
/// không rơi trước điểm sóc tháng sau, thì tháng này không có trung khí và là
/// tháng nhuận.
pub(crate) fn find_leap_month(
    year: i32,
    eleventh_month: &NewMoonPoint,
) -> Result<Option<LeapMonth>> {
    if !is_leap_year(year) {
        return Ok(None);
    }
    let offset = eleventh_month.offset();
    let mut new_moon = eleventh_month.next(3)?;
    for i in 0..CANDIDATE_MONTHS {
        let term = SolarLongitudePoint::at(new_moon.jd(), offset).term_start()?;
        if term.is_major_term() {
            let lag = new_moon.local_date() - term.local_date();
            if (1..=MAX_TERM_LAG_DAYS).contains(&lag) {
                let next_month = new_moon.next(1)?;
                let next_term = term.boundary_after(30.0)?;
                if next_term.local_date() >= next_month.local_date() {
                    let month = (i + 1).max(2);
                    debug!(
                        "lunar year {year}: leap month {month} from {}",
                        new_moon.local_date().iso_gregorian()
                    );
                    return Ok(Some(LeapMonth {
                        month,
                        start: new_moon,
                    }));
                }
            }
        }
        new_moon = new_moon.next(1)?;
    }
    debug!("lunar year {year}: no month without a major term");
    Ok(None)
}

/// Tháng bắt đầu từ điểm sóc `new_moon` và kết thúc trước điểm sóc `next`
/// có chứa trung khí hay không.
pub(crate) fn has_major_term(new_moon: &NewMoonPoint, next: &NewMoonPoint) -> Result<bool> {
    let offset = new_moon.offset();
    let last_second = JulianDay::local_midnight(next.local_date(), offset) - 1.0 / SECONDS_PER_DAY;
    let point = SolarLongitudePoint::at(last_second, offset);
    let term = point.boundary_before(point.degree() % 30.0)?;
    Ok(term.local_date() >= new_moon.local_date())
}

/// Vị trí tháng nhuận trong tuế 13 tháng `annus`, tính từ tháng 11 năm trước
/// (vị trí 0).
///
/// `new_moons` là 14 điểm sóc liên tiếp, từ tháng 11 năm `annus − 1` đến
/// tháng 11 năm `annus`.
pub(crate) fn leap_position(annus: i32, new_moons: &[NewMoonPoint]) -> Result<usize> {
    let last = new_moons.len().saturating_sub(2);
    let Some(eleventh_month) = new_moons.first() else {
        return Ok(last);
    };
    if let Some(leap) = find_leap_month(annus, eleventh_month)? {
        let position = new_moons[..=last]
            .iter()
            .position(|m| m.local_date() == leap.start.local_date());
        if let Some(position) = position {
            return Ok(position);
        }
    }
    for (position, pair) in new_moons.windows(2).enumerate().skip(1) {
        if !has_major_term(&pair[0], &pair[1])? {
            debug!(
                "annus {annus}: month from {} has no major term",
                pair[0].local_date().iso_gregorian()
            );
            return Ok(position);
        }
    }
    debug!("annus {annus}: every month has a major term, last one is leap");
    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UtcOffset;
    use crate::vietnamese::month_eleven_start;

    fn leap_of(year: i32) -> Option<LeapMonth> {
        let offset = UtcOffset::new(25200).unwrap();
        let eleventh = month_eleven_start(year - 1, offset).unwrap();
        find_leap_month(year, &eleventh).unwrap()
    }

    #[test]
    fn metonic_years() {
        let leap_years: Vec<_> = (2000..2020).filter(|&y| is_leap_year(y)).collect();
        assert_eq!(vec![2001, 2004, 2006, 2009, 2012, 2014, 2017], leap_years);
        assert!(is_leap_year(-19));
        assert!(!is_leap_year(-1));
    }

    #[test]
    fn leap_months() {
        let dataset = [
            (2012, Some((4, "2012-05-21"))),
            (2014, Some((9, "2014-10-24"))),
            (2017, Some((6, "2017-07-23"))),
            (2020, Some((4, "2020-05-23"))),
            (2023, Some((2, "2023-03-22"))),
            (2021, None),
            (2022, None),
        ];
        for (year, std) in dataset {
            let found = leap_of(year).map(|l| (l.month, l.start.local_date().iso_gregorian()));
            let std = std.map(|(m, d)| (m, d.to_string()));
            assert_eq!(std, found, "{year}");
        }
    }

    #[test]
    fn major_terms() {
        let offset = UtcOffset::new(25200).unwrap();
        let eleventh = month_eleven_start(2019, offset).unwrap();
        let dataset = [
            // tháng 4 năm 2020 có Tiểu mãn, tháng 4 nhuận không có trung khí
            (5, true),
            (6, false),
            (7, true),
        ];
        for (steps, std) in dataset {
            let new_moon = eleventh.next(steps).unwrap();
            let next = new_moon.next(1).unwrap();
            assert_eq!(Ok(std), has_major_term(&new_moon, &next), "{steps}");
        }
    }

    #[test]
    fn positions_in_thirteen_month_annus() {
        let offset = UtcOffset::new(25200).unwrap();
        let dataset = [(2017, 8), (2020, 6), (2034, 1), (2148, 3), (2166, 12)];
        for (annus, std) in dataset {
            let eleventh = month_eleven_start(annus - 1, offset).unwrap();
            let new_moons: Vec<_> = (0..14)
                .map(|n| if n == 0 { Ok(eleventh) } else { eleventh.next(n) })
                .collect::<Result<_>>()
                .unwrap();
            assert_eq!(Ok(std), leap_position(annus, &new_moons), "{annus}");
        }
    }
}
