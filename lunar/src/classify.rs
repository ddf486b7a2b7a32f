//! `lunar classify`: print phase codes for a run of days.

use std::path::Path;

use anyhow::{Result, anyhow};
use chrono::{Days, NaiveDate};

use crate::core::astro::{MeeusPhase, PhaseSource};
use crate::core::classifier::PhaseSeries;
use crate::io::locale::Locale;
use crate::project::Project;

/// Inputs for `lunar classify`.
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    pub start: NaiveDate,
    pub days: u32,
    /// Adds the localized phase name column.
    pub lang: Option<String>,
}

/// Classify `options.days` days with the astronomical source, loading the
/// project under `root` only when a language is requested.
pub fn classify_from_root(root: &Path, options: &ClassifyOptions) -> Result<Vec<String>> {
    let locale = match options.lang.as_deref() {
        Some(lang) => Some(Project::load(root)?.locale(lang)?),
        None => None,
    };
    classify_lines(&MeeusPhase, options, locale.as_ref())
}

/// One tab-separated line per day: date, age, code, symbol and optional name.
pub fn classify_lines<S: PhaseSource + ?Sized>(
    source: &S,
    options: &ClassifyOptions,
    locale: Option<&Locale>,
) -> Result<Vec<String>> {
    let end = options
        .start
        .checked_add_days(Days::new(u64::from(options.days)))
        .ok_or_else(|| anyhow!("{} + {} days is out of range", options.start, options.days))?;
    Ok(PhaseSeries::new(source, options.start, end)
        .map(|day| {
            let mut line = format!(
                "{}\t{:.3}\t{}\t{}",
                day.date,
                day.age,
                day.code,
                day.code.symbol()
            );
            if let Some(locale) = locale {
                line.push('\t');
                line.push_str(locale.name(day.code));
            }
            line
        })
        .collect())
}
