use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 86_400_000;
/// 365.25 days, the averaged year the birthday estimate divides by.
const MS_PER_JULIAN_YEAR: i64 = 31_557_600_000;
const HEART_BEATS_PER_DAY: u64 = 100_000;

pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedStats {
    pub total_days_lived: u64,
    pub total_hours_lived: u64,
    pub days_to_next_birthday: u64,
    pub day_of_birth_name: &'static str,
    pub earth_rotations: u64,
    pub heart_beats: u64,
    pub birthdays_approx: u64,
}

/// Elapsed-time statistics for someone born on `birth`, as of `now`.
///
/// Elapsed time runs from local midnight of the birth date.
pub fn derive(birth: NaiveDate, now: NaiveDateTime) -> DerivedStats {
    let elapsed_ms = (now - midnight(birth)).num_milliseconds();

    let total_days_lived = non_negative(elapsed_ms.div_euclid(MS_PER_DAY));
    let total_hours_lived = non_negative(elapsed_ms.div_euclid(MS_PER_HOUR));

    let next = next_birthday(birth, now.date());
    let until_next_ms = (midnight(next) - now).num_milliseconds();
    let days_to_next_birthday = non_negative(div_ceil(until_next_ms, MS_PER_DAY));

    let weekday = birth.weekday().num_days_from_sunday() as usize;

    DerivedStats {
        total_days_lived,
        total_hours_lived,
        days_to_next_birthday,
        day_of_birth_name: DAY_NAMES[weekday],
        earth_rotations: total_days_lived,
        heart_beats: total_days_lived.saturating_mul(HEART_BEATS_PER_DAY),
        birthdays_approx: non_negative(elapsed_ms.div_euclid(MS_PER_JULIAN_YEAR)),
    }
}

/// The first anniversary of `birth` falling on or after `today`.
///
/// A 29 February birthday in a common year lands on 1 March.
pub fn next_birthday(birth: NaiveDate, today: NaiveDate) -> NaiveDate {
    let this_year = anniversary(birth, today.year());
    if this_year < today {
        anniversary(birth, today.year() + 1)
    } else {
        this_year
    }
}

fn anniversary(birth: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, birth.month(), 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(birth.day() - 1))))
        .unwrap_or(birth)
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn div_ceil(n: i64, d: i64) -> i64 {
    -((-n).div_euclid(d))
}

fn non_negative(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}
