//! Terminal rendering of a calculation: number formatting, the static
//! report, and the count-up reveal used when stdout is a terminal.

use crate::age::AgeBreakdown;
use crate::schedule::ScheduledTask;
use crate::stats::DerivedStats;
use crate::validate::{Field, ValidationResult};
use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval};

const FRAME: Duration = Duration::from_millis(16);
const LABEL_WIDTH: usize = 19;
const CALCULATING: &str = "⏳ Calculating...";

/// Groups digits in threes: `1234567` → `1,234,567`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn next_birthday_text(days: u64) -> String {
    match days {
        0 => "Today! 🎉 Happy Birthday!".to_string(),
        1 => "Tomorrow! 🎂".to_string(),
        n => format!("{} days", thousands(n)),
    }
}

/// Cubic ease-out over `progress` in [0, 1].
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// A number counting up from zero to `target` over `duration`.
#[derive(Debug, Clone, Copy)]
pub struct Counter {
    pub target: u64,
    pub duration: Duration,
}

impl Counter {
    pub const fn new(target: u64, millis: u64) -> Self {
        Self {
            target,
            duration: Duration::from_millis(millis),
        }
    }

    /// Value shown `elapsed` into the animation. Never exceeds the target
    /// and lands on it exactly once the duration is over.
    pub fn value_at(&self, elapsed: Duration) -> u64 {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.target;
        }
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let value = (self.target as f64 * ease_out_cubic(progress)).floor() as u64;
        value.min(self.target)
    }

    fn done_at(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

fn row(label: &str, value: &str) -> String {
    format!("{:<LABEL_WIDTH$}{value}", format!("{label}:"))
}

fn age_line(values: &[u64]) -> String {
    let [years, months, days] = [0, 1, 2].map(|i| values.get(i).copied().unwrap_or(0));
    row(
        "Age",
        &format!("{years} years, {months} months, {days} days"),
    )
}

fn fun_facts_line(values: &[u64]) -> String {
    let [rotations, beats, birthdays] =
        [0, 1, 2].map(|i| values.get(i).copied().unwrap_or(0));
    format!(
        "  Earth rotations: {} · Heart beats: {} · Birthdays: {}",
        thousands(rotations),
        thousands(beats),
        thousands(birthdays)
    )
}

fn age_counters(age: &AgeBreakdown) -> [Counter; 3] {
    [
        Counter::new(u64::from(age.years), 1200),
        Counter::new(u64::from(age.months), 1000),
        Counter::new(u64::from(age.days), 800),
    ]
}

fn fun_fact_counters(stats: &DerivedStats) -> [Counter; 3] {
    [
        Counter::new(stats.earth_rotations, 1500),
        Counter::new(stats.heart_beats, 2000),
        Counter::new(stats.birthdays_approx, 800),
    ]
}

fn detail_lines(stats: &DerivedStats) -> Vec<String> {
    vec![
        row("Total days lived", &thousands(stats.total_days_lived)),
        row("Total hours lived", &thousands(stats.total_hours_lived)),
        row("Next birthday", &next_birthday_text(stats.days_to_next_birthday)),
        row("Born on a", stats.day_of_birth_name),
        String::new(),
        "Fun facts".to_string(),
    ]
}

/// The full report with final values.
pub fn render_report(age: &AgeBreakdown, stats: &DerivedStats) -> String {
    let finals = |counters: [Counter; 3]| counters.map(|c| c.target);

    let mut lines = vec![age_line(&finals(age_counters(age)))];
    lines.extend(detail_lines(stats));
    lines.push(fun_facts_line(&finals(fun_fact_counters(stats))));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Per-field and general messages, one per line.
pub fn render_errors(result: &ValidationResult) -> String {
    let mut out = String::new();
    for field in Field::ALL {
        if let Some(error) = result.field_error(field) {
            out.push_str(&format!("{field}: {error}\n"));
        }
    }
    for error in &result.general_errors {
        out.push_str(&format!("{error}\n"));
    }
    out
}

/// Writes the report, counting each number up from zero.
pub async fn reveal<W: Write>(out: &mut W, age: &AgeBreakdown, stats: &DerivedStats) -> io::Result<()> {
    animate_line(out, &age_counters(age), age_line).await?;
    for line in detail_lines(stats) {
        writeln!(out, "{line}")?;
    }
    animate_line(out, &fun_fact_counters(stats), fun_facts_line).await
}

/// How a delayed reveal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    Completed,
    Interrupted,
}

/// Shows the calculating indicator for `delay`, then counts the report up.
/// When `interrupt` resolves first the pending reveal is cancelled and
/// nothing more is written.
pub async fn reveal_after<W, I>(
    mut out: W,
    age: AgeBreakdown,
    stats: DerivedStats,
    delay: Duration,
    interrupt: I,
) -> io::Result<Reveal>
where
    W: Write + Send + 'static,
    I: Future,
{
    let indicate = !delay.is_zero();
    if indicate {
        write!(out, "{CALCULATING}")?;
        out.flush()?;
    }

    let mut task = ScheduledTask::after(
        "reveal",
        delay,
        clear_then_reveal(out, age, stats, indicate),
    );

    let joined = tokio::select! {
        _ = interrupt => None,
        joined = task.join() => Some(joined),
    };

    match joined {
        Some(Some(written)) => written.map(|()| Reveal::Completed),
        Some(None) => Ok(Reveal::Interrupted),
        None => {
            task.cancel();
            Ok(Reveal::Interrupted)
        }
    }
}

async fn clear_then_reveal<W: Write>(
    mut out: W,
    age: AgeBreakdown,
    stats: DerivedStats,
    clear_indicator: bool,
) -> io::Result<()> {
    if clear_indicator {
        write!(out, "\r{:width$}\r", "", width = CALCULATING.chars().count())?;
    }
    reveal(&mut out, &age, &stats).await
}

async fn animate_line<W, F>(out: &mut W, counters: &[Counter], render: F) -> io::Result<()>
where
    W: Write,
    F: Fn(&[u64]) -> String,
{
    let start = Instant::now();
    let mut ticker = interval(FRAME);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let elapsed = start.elapsed();
        let values: Vec<u64> = counters.iter().map(|c| c.value_at(elapsed)).collect();
        write!(out, "\r{}", render(&values))?;
        out.flush()?;

        if counters.iter().all(|c| c.done_at(elapsed)) {
            return writeln!(out);
        }
    }
}
