use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_DELAY_MS: u64 = 1000;

const NOW_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Parser, Debug)]
#[command(name = "agecalc", version, about = "Age calculator: how long you have been around")]
pub struct Cli {
    #[arg(long, help = "Day of birth (1-31); prompted for when omitted")]
    pub day: Option<String>,
    #[arg(long, help = "Month of birth (1-12); prompted for when omitted")]
    pub month: Option<String>,
    #[arg(long, help = "Year of birth; prompted for when omitted")]
    pub year: Option<String>,
    #[arg(
        long,
        value_parser = parse_now,
        help = "Reference instant in local time (YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS]); defaults to the clock"
    )]
    pub now: Option<NaiveDateTime>,
    #[arg(long, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, value_name = "DIR", help = "Also write dark and light SVG result cards into DIR")]
    pub svg_dir: Option<PathBuf>,
    #[arg(
        long,
        env = "AGECALC_DELAY_MS",
        default_value_t = DEFAULT_DELAY_MS,
        help = "Milliseconds the calculating indicator is shown before results"
    )]
    pub delay_ms: u64,
    #[arg(long, help = "Print final values without the count-up animation")]
    pub no_animate: bool,
}

/// Accepts a date (taken at midnight) or a date with time of day.
pub fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    NOW_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS], got {s:?}"))
}
