//! The birth-date form: raw field text, the errors currently shown, and the
//! last successful calculation.

use crate::age::{self, AgeBreakdown};
use crate::stats::{self, DerivedStats};
use crate::validate::{self, DateTriple, Field, ValidationResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info};

/// Everything shown after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Calculation {
    pub birth_date: NaiveDate,
    pub now: NaiveDateTime,
    pub age: AgeBreakdown,
    pub stats: DerivedStats,
}

impl Calculation {
    pub fn compute(birth_date: NaiveDate, now: NaiveDateTime) -> Self {
        Self {
            birth_date,
            now,
            age: age::age(birth_date, now.date()),
            stats: stats::derive(birth_date, now),
        }
    }
}

#[derive(Debug, Default)]
pub struct AgeForm {
    day: String,
    month: String,
    year: String,
    errors: Option<ValidationResult>,
    result: Option<Calculation>,
}

impl AgeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Day => &self.day,
            Field::Month => &self.month,
            Field::Year => &self.year,
        }
    }

    /// Replaces a field's text, keeping digits only. Editing a field clears
    /// its own error and the general errors.
    pub fn input(&mut self, field: Field, text: &str) {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        match field {
            Field::Day => self.day = digits,
            Field::Month => self.month = digits,
            Field::Year => self.year = digits,
        }
        self.errors = self.errors.as_ref().map(|errors| errors.dismiss(field));
    }

    /// Whether typing in `field` is complete enough to move focus on.
    pub fn should_advance(&self, field: Field) -> bool {
        match field {
            Field::Day | Field::Month => self.value(field).len() == 2,
            Field::Year => false,
        }
    }

    /// Whether Enter in `field` is accepted (moves on, or submits from year).
    pub fn accepts_enter(&self, field: Field) -> bool {
        let len = self.value(field).len();
        match field {
            Field::Day | Field::Month => len >= 1,
            Field::Year => len >= 4,
        }
    }

    pub fn triple(&self) -> DateTriple {
        DateTriple::parse(&self.day, &self.month, &self.year)
    }

    /// Validates the current fields against `now` and, when they hold a
    /// real past date, computes the results.
    pub fn submit(&mut self, now: NaiveDateTime) -> Result<&Calculation, &ValidationResult> {
        self.result = None;
        let validation = validate::validate(&self.triple(), now);

        match validation.birth_date() {
            Some(birth_date) => {
                self.errors = None;
                let calculation = Calculation::compute(birth_date, now);
                info!(%birth_date, age = %calculation.age, "calculated age");
                Ok(self.result.insert(calculation))
            }
            None => {
                debug!(errors = ?validation, "form rejected");
                Err(self.errors.insert(validation))
            }
        }
    }

    pub fn errors(&self) -> Option<&ValidationResult> {
        self.errors.as_ref()
    }

    pub fn result(&self) -> Option<&Calculation> {
        self.result.as_ref()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ValidationError;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn filled(day: &str, month: &str, year: &str) -> AgeForm {
        let mut form = AgeForm::new();
        form.input(Field::Day, day);
        form.input(Field::Month, month);
        form.input(Field::Year, year);
        form
    }

    #[rstest]
    fn strips_non_digits() {
        let form = filled("1a5", " 06 ", "19-90");
        assert_eq!(form.value(Field::Day), "15");
        assert_eq!(form.value(Field::Month), "06");
        assert_eq!(form.value(Field::Year), "1990");
    }

    #[rstest]
    fn submit_computes_results(now: NaiveDateTime) {
        let mut form = filled("15", "6", "1990");
        let calculation = form.submit(now).unwrap().clone();
        assert_eq!(
            calculation.age,
            AgeBreakdown {
                years: 34,
                months: 0,
                days: 0
            }
        );
        assert_eq!(calculation.stats.day_of_birth_name, "Friday");
        assert_eq!(calculation.stats.days_to_next_birthday, 0);
        assert_eq!(form.result(), Some(&calculation));
        assert!(form.errors().is_none());
    }

    #[rstest]
    fn failed_submit_keeps_errors(now: NaiveDateTime) {
        let mut form = filled("30", "2", "1990");
        let errors = form.submit(now).unwrap_err();
        assert_eq!(errors.general_error(), Some(&ValidationError::Calendar));
        assert!(form.result().is_none());
    }

    #[rstest]
    fn typing_clears_that_fields_error_and_general_errors(now: NaiveDateTime) {
        let mut form = filled("", "13", "1990");
        form.submit(now).unwrap_err();
        assert_eq!(form.errors().map(|e| e.field_errors.len()), Some(2));

        form.input(Field::Day, "1");
        let errors = form.errors().unwrap();
        assert!(errors.field_error(Field::Day).is_none());
        assert!(errors.field_error(Field::Month).is_some());
        assert!(errors.general_errors.is_empty());
    }

    #[rstest]
    fn reset_clears_everything(now: NaiveDateTime) {
        let mut form = filled("15", "6", "1990");
        form.submit(now).unwrap();
        form.reset();
        assert_eq!(form.value(Field::Year), "");
        assert!(form.result().is_none());
        assert!(form.errors().is_none());
    }

    #[rstest]
    fn keyboard_navigation_rules() {
        let form = filled("15", "6", "199");
        assert!(form.should_advance(Field::Day));
        assert!(!form.should_advance(Field::Month));
        assert!(form.accepts_enter(Field::Month));
        assert!(!form.accepts_enter(Field::Year));

        let form = filled("1", "06", "1990");
        assert!(!form.should_advance(Field::Day));
        assert!(form.should_advance(Field::Month));
        assert!(form.accepts_enter(Field::Year));
    }
}
