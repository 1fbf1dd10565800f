//! age.rs
//!
//! Calendar age in the form "X years, Y months, Z days".
//!
//! Chrono does not provide a built-in year/month/day diff (unlike Python’s
//! relativedelta), so the calendar-aware borrowing rules are implemented here:
//!   • day underflow borrows the length of the month preceding `now`'s month
//!   • month underflow borrows from years
//!   • when even the borrow leaves days negative (born on the 31st, borrowing
//!     a 28-day February), the anniversary is pinned to that month's last day
//!
//! Leap years and varying month lengths come in through `days_in_month`.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Whole years, months and days between two calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeBreakdown {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

/// Calendar age of someone born on `birth`, observed on `today`.
///
/// `birth` must not be after `today`; validation guarantees that.
pub fn age(birth: NaiveDate, today: NaiveDate) -> AgeBreakdown {
    let mut years = today.year() - birth.year();
    let mut months = today.month() as i32 - birth.month() as i32;
    let mut days = today.day() as i32 - birth.day() as i32;

    // Fix day underflow
    if days < 0 {
        months -= 1;

        let (prev_year, prev_month) = previous_month(today.year(), today.month());
        days += days_in_month(prev_year, prev_month) as i32;

        // Still short: the borrowed month lacks the birth day (born on the
        // 31st, borrowing February), so its anniversary is that month's end.
        if days < 0 {
            days = today.day() as i32;
        }
    }

    // Fix month underflow
    if months < 0 {
        years -= 1;
        months += 12;
    }

    AgeBreakdown {
        years: non_negative(years),
        months: non_negative(months),
        days: non_negative(days),
    }
}

impl fmt::Display for AgeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} year{}, {} month{}, {} day{}",
            self.years,
            plural(self.years),
            self.months,
            plural(self.months),
            self.days,
            plural(self.days)
        )
    }
}

fn non_negative(n: i32) -> u32 {
    u32::try_from(n).unwrap_or(0)
}

fn plural(n: u32) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Returns number of days in a given year/month (handles leap years)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30, // keeps the function total for out-of-range months
    }
}

/// Leap-year rule (Gregorian):
///   - divisible by 4 → leap year
///   - except divisible by 100 → not leap year
///   - except divisible by 400 → leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(ymd(1990, 6, 15), ymd(2024, 6, 15), (34, 0, 0))]
    #[case(ymd(2000, 2, 29), ymd(2024, 3, 1), (24, 0, 1))]
    #[case(ymd(2000, 1, 31), ymd(2000, 3, 1), (0, 1, 1))]
    #[case(ymd(1999, 12, 31), ymd(2000, 1, 1), (0, 0, 1))]
    #[case(ymd(1985, 11, 20), ymd(2024, 2, 10), (38, 2, 21))]
    #[case(ymd(2010, 5, 5), ymd(2010, 5, 5), (0, 0, 0))]
    fn borrows_like_a_calendar(
        #[case] birth: NaiveDate,
        #[case] today: NaiveDate,
        #[case] expected: (u32, u32, u32),
    ) {
        let a = age(birth, today);
        assert_eq!((a.years, a.months, a.days), expected);
    }

    #[test]
    fn january_borrows_from_previous_december() {
        // 31 days of December 2023 are borrowed.
        let a = age(ymd(2000, 3, 20), ymd(2024, 1, 5));
        assert_eq!(a, AgeBreakdown { years: 23, months: 9, days: 16 });
    }

    #[test]
    fn components_stay_in_calendar_bounds() {
        for today in [ymd(2024, 3, 1), ymd(2023, 3, 29), ymd(2023, 5, 30), ymd(2024, 1, 15)] {
            let (prev_year, prev_month) = previous_month(today.year(), today.month());
            let borrowed = days_in_month(prev_year, prev_month);

            let mut birth = ymd(1950, 1, 1);
            while birth <= today {
                let a = age(birth, today);
                assert!(a.months <= 11, "{birth} -> {today}: {a:?}");
                if today.day() < birth.day() {
                    assert!(a.days < borrowed, "{birth} -> {today}: {a:?}");
                } else {
                    assert_eq!(a.days, today.day() - birth.day(), "{birth} -> {today}");
                }
                birth = birth.succ_opt().unwrap();
            }
        }
    }

    #[rstest]
    #[case(ymd(2000, 1, 30), ymd(2023, 3, 29), (23, 1, 27))]
    #[case(ymd(2000, 1, 31), ymd(2023, 3, 29), (23, 1, 26))]
    #[case(ymd(2000, 1, 31), ymd(2023, 3, 2), (23, 1, 2))]
    #[case(ymd(2000, 1, 29), ymd(2023, 3, 1), (23, 1, 0))]
    fn borrowing_a_short_february(
        #[case] birth: NaiveDate,
        #[case] today: NaiveDate,
        #[case] expected: (u32, u32, u32),
    ) {
        let a = age(birth, today);
        assert_eq!((a.years, a.months, a.days), expected);
    }

    #[test]
    fn display_pluralizes() {
        let a = AgeBreakdown { years: 1, months: 2, days: 1 };
        assert_eq!(a.to_string(), "1 year, 2 months, 1 day");
    }

    #[rstest]
    #[case(2000, true)]
    #[case(1900, false)]
    #[case(2024, true)]
    #[case(2023, false)]
    fn leap_years(#[case] year: i32, #[case] leap: bool) {
        assert_eq!(is_leap_year(year), leap);
        assert_eq!(days_in_month(year, 2), if leap { 29 } else { 28 });
    }
}
