//! Birth-date validation.
//!
//! Every rule runs and reports; nothing here returns `Err` or panics. The
//! caller looks at [`ValidationResult::is_valid`] to decide whether to go on
//! to the age calculation.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

pub const MIN_YEAR: i64 = 1900;
pub const MAX_AGE_YEARS: i64 = 125;

/// The three input fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Day,
    Month,
    Year,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Day, Field::Month, Field::Year];

    pub fn name(self) -> &'static str {
        match self {
            Field::Day => "day",
            Field::Month => "month",
            Field::Year => "year",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An unvalidated date as entered. `None` stands for an empty or
/// non-numeric entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTriple {
    pub day: Option<i64>,
    pub month: Option<i64>,
    pub year: Option<i64>,
}

impl DateTriple {
    pub fn new(day: i64, month: i64, year: i64) -> Self {
        Self {
            day: Some(day),
            month: Some(month),
            year: Some(year),
        }
    }

    /// Builds a triple from raw field text.
    pub fn parse(day: &str, month: &str, year: &str) -> Self {
        Self {
            day: parse_number(day),
            month: parse_number(month),
            year: parse_number(year),
        }
    }
}

fn parse_number(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter a valid day (1-31)")]
    DayRange,
    #[error("Enter a valid month (1-12)")]
    MonthRange,
    #[error("Enter a valid year (1900-{current_year})")]
    YearRange { current_year: i32 },
    #[error("This date does not exist. Please check your input.")]
    Calendar,
    #[error("Birth date cannot be in the future.")]
    FutureDate,
    #[error("Please enter a realistic birth year.")]
    ImplausibleAge,
}

impl ValidationError {
    /// The field a range error belongs to; `None` for general errors.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::DayRange => Some(Field::Day),
            Self::MonthRange => Some(Field::Month),
            Self::YearRange { .. } => Some(Field::Year),
            Self::Calendar | Self::FutureDate | Self::ImplausibleAge => None,
        }
    }
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub field_errors: BTreeMap<Field, ValidationError>,
    /// In evaluation order: calendar, future, implausible age.
    pub general_errors: Vec<ValidationError>,
    #[serde(skip)]
    birth_date: Option<NaiveDate>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn field_error(&self, field: Field) -> Option<&ValidationError> {
        self.field_errors.get(&field)
    }

    /// The single general message a form shows: the last one raised.
    pub fn general_error(&self) -> Option<&ValidationError> {
        self.general_errors.last()
    }

    /// A copy without `field`'s error and without general errors: what a
    /// form still shows once that field is edited.
    pub fn dismiss(&self, field: Field) -> Self {
        let mut field_errors = self.field_errors.clone();
        field_errors.remove(&field);
        Self {
            valid: self.valid,
            field_errors,
            general_errors: Vec::new(),
            birth_date: self.birth_date,
        }
    }

    /// The validated birth date, present only when the input is valid.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        if self.valid { self.birth_date } else { None }
    }
}

/// Validates `input` as a birth date observed at `now`.
pub fn validate(input: &DateTriple, now: NaiveDateTime) -> ValidationResult {
    let current_year = now.year();
    let mut field_errors = BTreeMap::new();
    let mut general_errors = Vec::new();

    let day = input.day.filter(|d| (1..=31).contains(d));
    if day.is_none() {
        field_errors.insert(Field::Day, ValidationError::DayRange);
    }

    let month = input.month.filter(|m| (1..=12).contains(m));
    if month.is_none() {
        field_errors.insert(Field::Month, ValidationError::MonthRange);
    }

    let year = input
        .year
        .filter(|y| (MIN_YEAR..=i64::from(current_year)).contains(y));
    if year.is_none() {
        field_errors.insert(Field::Year, ValidationError::YearRange { current_year });
    }

    let mut birth_date = None;
    if let (Some(day), Some(month), Some(year)) = (day, month, year) {
        match calendar_date(day, month, year) {
            Some(date) => {
                if date.and_time(chrono::NaiveTime::MIN) > now {
                    general_errors.push(ValidationError::FutureDate);
                } else {
                    birth_date = Some(date);
                }
            }
            None => general_errors.push(ValidationError::Calendar),
        }
    }

    // Judged on the year alone, even when the year is outside the form range.
    if let Some(year) = input.year {
        if i64::from(current_year).saturating_sub(year) > MAX_AGE_YEARS {
            general_errors.push(ValidationError::ImplausibleAge);
        }
    }

    let valid = field_errors.is_empty() && general_errors.is_empty();
    debug!(
        ?input,
        valid,
        field_errors = field_errors.len(),
        general_errors = general_errors.len(),
        "validated birth date"
    );

    ValidationResult {
        valid,
        field_errors,
        general_errors,
        birth_date: if valid { birth_date } else { None },
    }
}

/// Round-trips the components through the calendar; `None` for dates such
/// as 30 February.
fn calendar_date(day: i64, month: i64, year: i64) -> Option<NaiveDate> {
    let year = i32::try_from(year).ok()?;
    let month = u32::try_from(month).ok()?;
    let day = u32::try_from(day).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
