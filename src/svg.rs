//! Result cards: the cake on the left, the calculation on the right as
//! dot-leader rows, rendered once per theme.

use crate::ascii::ASCII;
use crate::display::{next_birthday_text, thousands};
use crate::form::Calculation;

const FONT: &str = "ConsolasFallback,Consolas,monospace";
const TOP: usize = 30;
const LINE_HEIGHT: usize = 20;
const MARGIN: f32 = 15.0;
const GUTTER: f32 = 10.0;
const CHAR_WIDTH: f32 = 9.6;
const MIN_ROW_CHARS: usize = 44;

#[derive(Clone, Copy, Debug)]
pub enum Theme {
    Dark,
    Light,
}

pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub key: &'static str,
    pub value: &'static str,
    pub leader: &'static str,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Dark, Theme::Light];

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: "#161b22",
                text: "#c9d1d9",
                key: "#ffa657",
                value: "#a5d6ff",
                leader: "#616e7f",
            },
            Theme::Light => Palette {
                background: "#ffffff",
                text: "#24292f",
                key: "#d73a49",
                value: "#0366d6",
                leader: "#6a737d",
            },
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Theme::Dark => "age_dark.svg",
            Theme::Light => "age_light.svg",
        }
    }
}

/// Escapes text for use in element content and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Dots between `key: ` and `value` so the row spans `width` characters.
/// A single space is used when only one column is left.
fn leader(key: &str, value: &str, width: usize) -> String {
    let used = key.chars().count() + 2 + value.chars().count();
    match width.saturating_sub(used) {
        0 => String::new(),
        1 => " ".to_string(),
        n => ".".repeat(n),
    }
}

/// `label` followed by a dash rule out to `width`.
fn rule(label: &str, width: usize) -> String {
    let dashes = width.saturating_sub(label.chars().count() + 1);
    format!("{label} {}", "-".repeat(dashes))
}

enum Line {
    Heading(&'static str),
    Blank,
    Stat(&'static str, String),
}

impl Line {
    fn chars(&self) -> usize {
        match self {
            Line::Stat(key, value) => key.chars().count() + 2 + value.chars().count(),
            Line::Heading(label) => label.chars().count() + 1,
            Line::Blank => 0,
        }
    }
}

fn card_lines(calc: &Calculation) -> Vec<Line> {
    let stats = &calc.stats;
    vec![
        Line::Heading("you@birthday"),
        Line::Stat("Born", calc.birth_date.format("%Y-%m-%d").to_string()),
        Line::Stat("Born on a", stats.day_of_birth_name.to_string()),
        Line::Stat("Age", calc.age.to_string()),
        Line::Stat("Next birthday", next_birthday_text(stats.days_to_next_birthday)),
        Line::Blank,
        Line::Stat("Days lived", thousands(stats.total_days_lived)),
        Line::Stat("Hours lived", thousands(stats.total_hours_lived)),
        Line::Blank,
        Line::Heading("- Fun facts"),
        Line::Stat("Earth rotations", thousands(stats.earth_rotations)),
        Line::Stat("Heart beats", thousands(stats.heart_beats)),
        Line::Stat("Birthdays", thousands(stats.birthdays_approx)),
        Line::Blank,
        Line::Stat("As of", calc.now.format("%Y-%m-%d %H:%M").to_string()),
    ]
}

fn baseline(row: usize) -> usize {
    TOP + row * LINE_HEIGHT
}

fn cake_column() -> String {
    ASCII
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(row, line)| {
            format!(
                "    <tspan x=\"{MARGIN}\" y=\"{}\">{}</tspan>\n",
                baseline(row),
                escape(line)
            )
        })
        .collect()
}

fn results_column(lines: &[Line], x: f32, width: usize) -> String {
    let mut out = String::new();
    for (row, line) in lines.iter().enumerate() {
        let y = baseline(row);
        match line {
            Line::Blank => {}
            Line::Heading(label) => out.push_str(&format!(
                "    <tspan x=\"{x}\" y=\"{y}\">{}</tspan>\n",
                escape(&rule(label, width))
            )),
            Line::Stat(key, value) => out.push_str(&format!(
                "    <tspan x=\"{x}\" y=\"{y}\" class=\"key\">{}: </tspan>\
                 <tspan class=\"leader\">{}</tspan>\
                 <tspan class=\"value\">{}</tspan>\n",
                escape(key),
                leader(key, value, width),
                escape(value)
            )),
        }
    }
    out
}

/// Renders a calculation as an SVG result card.
pub fn generate_svg(calc: &Calculation, theme: Theme) -> String {
    let palette = theme.palette();
    let lines = card_lines(calc);

    let cake_chars = ASCII.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let row_chars = lines
        .iter()
        .map(Line::chars)
        .max()
        .unwrap_or(0)
        .max(MIN_ROW_CHARS);
    let rows = ASCII.lines().count().max(lines.len());

    let results_x = MARGIN + cake_chars as f32 * CHAR_WIDTH + GUTTER;
    let width = results_x + row_chars as f32 * CHAR_WIDTH + 2.0 * MARGIN;
    let height = (baseline(rows) + TOP) as f32;

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="{FONT}" font-size="16px" role="img">
  <title>Age: {title}</title>
  <style>
    .key {{ fill: {key}; }}
    .value {{ fill: {value}; }}
    .leader {{ fill: {leader}; }}
  </style>
  <rect width="100%" height="100%" fill="{background}" rx="15"/>
  <g id="cake" fill="{text}">
   <text xml:space="preserve">
{cake}   </text>
  </g>
  <g id="results" fill="{text}">
   <text xml:space="preserve">
{results}   </text>
  </g>
</svg>
"#,
        title = escape(&calc.age.to_string()),
        key = palette.key,
        value = palette.value,
        leader = palette.leader,
        background = palette.background,
        text = palette.text,
        cake = cake_column(),
        results = results_column(&lines, results_x, row_chars),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn calculation() -> Calculation {
        let birth = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        let now = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Calculation::compute(birth, now)
    }

    #[test]
    fn leaders_fill_rows_to_width() {
        assert_eq!(leader("Age", "34", 12), ".....");
        assert_eq!(leader("Age", "1234567", 12), "");
        assert_eq!(leader("Age", "123456", 12), " ");
        assert_eq!(rule("- Fun facts", 16), "- Fun facts ----");
    }

    #[test]
    fn card_carries_results_and_theme() {
        let svg = generate_svg(&calculation(), Theme::Light);
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("fill=\"#ffffff\""));
        assert!(svg.contains("<title>Age: 34 years, 0 months, 0 days</title>"));
        assert!(svg.contains(">Friday<"));
        assert!(svg.contains("Today! 🎉 Happy Birthday!"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn themes_differ_only_in_palette() {
        let calc = calculation();
        let dark = generate_svg(&calc, Theme::Dark);
        let light = generate_svg(&calc, Theme::Light);
        assert!(dark.contains("fill=\"#161b22\""));
        assert_ne!(dark, light);
        assert_eq!(dark.lines().count(), light.lines().count());
    }

    #[test]
    fn every_cake_row_is_drawn() {
        let drawn = cake_column().lines().count();
        let expected = ASCII.lines().filter(|l| !l.trim().is_empty()).count();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(escape("a<b>&c"), "a&lt;b&gt;&amp;c");
        assert_eq!(escape(r#"say "hi" it's"#), "say &quot;hi&quot; it&apos;s");
    }
}
