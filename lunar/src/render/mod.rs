//! Output layouts for TSV, Markdown and iCalendar files.
//!
//! Headers and event blocks are minijinja templates embedded in the binary; per
//! day table rows are plain `format!` calls since they run once per day per view.

use anyhow::Result;
use minijinja::{Environment, UndefinedBehavior, context};

use crate::core::text::{escape_ical_text, fold_ical_line, pad_right};
use crate::core::types::{DayPhase, View};
use crate::io::locale::Locale;

const TSV_HEADER_TEMPLATE: &str = include_str!("layouts/tsv_header.txt");
const MARKDOWN_HEADER_TEMPLATE: &str = include_str!("layouts/markdown_header.md");
const ICS_EVENT_TEMPLATE: &str = include_str!("layouts/ics_event.ics");

/// Width of the date column label in wide headers.
const DAY_COLUMN: usize = 10;
/// Width of the phase column label in Markdown headers.
const PHASE_COLUMN: usize = 6;

/// Fields of one iCalendar event.
#[derive(Debug, Clone)]
pub struct EventFields<'a> {
    /// Event header lines with `DTSTAMP` filled, without the `SUMMARY:` line.
    pub head: &'a [String],
    pub foot: &'a [String],
    pub summary: &'a str,
    pub uid: &'a str,
    pub day: &'a DayPhase,
}

/// Template engine wrapper around minijinja.
pub struct Layouts {
    env: Environment<'static>,
}

impl Layouts {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template("tsv_header", TSV_HEADER_TEMPLATE)?;
        env.add_template("markdown_header", MARKDOWN_HEADER_TEMPLATE)?;
        env.add_template("ics_event", ICS_EVENT_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Column header line for a TSV file.
    pub fn tsv_header(&self, locale: &Locale, view: View) -> Result<String> {
        let wide = view.is_wide();
        let headers = &locale.headers;
        let day = if wide {
            pad_right(&headers.day, DAY_COLUMN)
        } else {
            headers.day.clone()
        };
        let rendered = self.env.get_template("tsv_header")?.render(context! {
            wide => wide,
            day => day,
            phase => headers.phase,
            symbol => headers.symbol,
            name => headers.name,
        })?;
        Ok(rendered)
    }

    /// Title, column labels and alignment row for a Markdown file.
    pub fn markdown_header(&self, locale: &Locale, view: View) -> Result<String> {
        let wide = view.is_wide();
        let headers = &locale.headers;
        let phase = if wide {
            pad_right(&headers.phase, PHASE_COLUMN)
        } else {
            headers.phase.clone()
        };
        let rendered = self.env.get_template("markdown_header")?.render(context! {
            title => locale.title(view),
            wide => wide,
            day => pad_right(&headers.day, DAY_COLUMN),
            phase => phase,
            symbol => headers.symbol,
            name => headers.name,
        })?;
        Ok(rendered)
    }

    /// One `VEVENT` block with CRLF line endings and folded long lines.
    pub fn ics_event(&self, event: &EventFields<'_>) -> Result<String> {
        let end = event.day.date.succ_opt().unwrap_or(event.day.date);
        let rendered = self.env.get_template("ics_event")?.render(context! {
            head => event.head,
            foot => event.foot,
            summary => escape_ical_text(event.summary),
            uid => event.uid,
            start => ical_date(event.day.date),
            end => ical_date(end),
        })?;
        Ok(to_ical_lines(rendered.lines()))
    }
}

/// Table row for a TSV file.
pub fn tsv_row(day: &DayPhase, view: View, locale: &Locale) -> String {
    if view.is_wide() {
        format!(
            "{}\t{:6.3}\t{}\t{}\n",
            day.date,
            day.age,
            day.code.symbol(),
            locale.name(day.code)
        )
    } else {
        format!("{}\t{:6.3}\n", day.date, day.age)
    }
}

/// Table row for a Markdown file.
pub fn markdown_row(day: &DayPhase, view: View, locale: &Locale) -> String {
    if view.is_wide() {
        format!(
            "{} | {:6.3} | {} | {}\n",
            day.date,
            day.age,
            day.code.symbol(),
            locale.name(day.code)
        )
    } else {
        format!("{} | {:6.3}\n", day.date, day.age)
    }
}

/// Join content lines with CRLF, folding any longer than 75 octets.
pub fn to_ical_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    lines.into_iter().map(fold_ical_line).collect()
}

fn ical_date(date: chrono::NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
