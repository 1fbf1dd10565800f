use agecalc::cli::Cli;
use agecalc::display::{self, Reveal, next_birthday_text};
use agecalc::form::{AgeForm, Calculation};
use agecalc::svg::{self, Theme};
use agecalc::validate::Field;
use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    calculation: &'a Calculation,
    next_birthday: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }

    let cli = Cli::parse();
    let now = cli.now.unwrap_or_else(|| Local::now().naive_local());
    debug!(%now, "reference instant");

    let mut form = AgeForm::new();
    fill_form(&mut form, &cli).context("Failed to read birth date")?;

    let calculation = match form.submit(now) {
        Ok(calculation) => calculation.clone(),
        Err(errors) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(errors)?);
            } else {
                eprint!("{}", display::render_errors(errors));
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    if let Some(dir) = &cli.svg_dir {
        write_cards(dir, &calculation)?;
    }

    if cli.json {
        let report = Report {
            calculation: &calculation,
            next_birthday: next_birthday_text(calculation.stats.days_to_next_birthday),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    if cli.no_animate || !io::stdout().is_terminal() {
        print!("{}", display::render_report(&calculation.age, &calculation.stats));
        return Ok(ExitCode::SUCCESS);
    }

    animate(calculation, Duration::from_millis(cli.delay_ms)).await
}

/// Reveals the results after `delay`; Ctrl-C cancels whatever is pending.
async fn animate(calculation: Calculation, delay: Duration) -> Result<ExitCode> {
    let shown = display::reveal_after(
        io::stdout(),
        calculation.age,
        calculation.stats,
        delay,
        tokio::signal::ctrl_c(),
    )
    .await
    .context("Failed to write results")?;

    match shown {
        Reveal::Completed => Ok(ExitCode::SUCCESS),
        Reveal::Interrupted => {
            println!();
            warn!("interrupted before results were shown");
            Ok(ExitCode::from(130))
        }
    }
}

fn write_cards(dir: &Path, calculation: &Calculation) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    for theme in Theme::ALL {
        let path = dir.join(theme.file_name());
        fs::write(&path, svg::generate_svg(calculation, theme))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), ?theme, "wrote result card");
    }
    Ok(())
}

/// Takes field values from the flags and prompts for the rest when stdin is
/// a terminal.
fn fill_form(form: &mut AgeForm, cli: &Cli) -> io::Result<()> {
    let interactive = io::stdin().is_terminal();
    let flags = [&cli.day, &cli.month, &cli.year];

    for (field, flag) in Field::ALL.into_iter().zip(flags) {
        match flag {
            Some(text) => form.input(field, text),
            None if interactive => prompt(form, field)?,
            None => {}
        }
    }
    Ok(())
}

fn prompt(form: &mut AgeForm, field: Field) -> io::Result<()> {
    let label = match field {
        Field::Day => "Day (DD): ",
        Field::Month => "Month (MM): ",
        Field::Year => "Year (YYYY): ",
    };

    let stdin = io::stdin();
    loop {
        print!("{label}");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        form.input(field, &line);
        if form.accepts_enter(field) {
            return Ok(());
        }
    }
}
