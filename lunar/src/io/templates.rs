//! Plain-text iCalendar templates supplied by the project.
//!
//! Calendar headers carry the placeholder phrase [`TITLE_PLACEHOLDER`], which is
//! replaced per view. The event header must end with a `SUMMARY:` line; the
//! event summary is appended to it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::core::text::escape_ical_text;
use crate::io::init::ProjectPaths;

/// Phrase in calendar headers replaced by the localized view title.
pub const TITLE_PLACEHOLDER: &str = "Lunar Phase";

const SUMMARY_PREFIX: &str = "SUMMARY:";
const DTSTAMP_PREFIX: &str = "DTSTAMP:";

/// Templates shared by every locale run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedTemplates {
    pub calendar_footer: Vec<String>,
    /// Event header lines without the final `SUMMARY:` line.
    pub event_header: Vec<String>,
    pub event_footer: Vec<String>,
}

/// Calendar header plus the shared templates for one locale run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarTemplates {
    pub calendar_header: Vec<String>,
    pub shared: SharedTemplates,
}

impl SharedTemplates {
    pub fn load(paths: &ProjectPaths) -> Result<Self> {
        let calendar_footer = read_lines(&paths.calendar_footer_path)?;
        let event_footer = read_lines(&paths.event_footer_path)?;
        let mut event_header = read_lines(&paths.event_header_path)?;
        match event_header.pop() {
            Some(last) if last == SUMMARY_PREFIX => {}
            _ => bail!(
                "{} must end with a '{}' line",
                paths.event_header_path.display(),
                SUMMARY_PREFIX
            ),
        }
        Ok(Self {
            calendar_footer,
            event_header,
            event_footer,
        })
    }

    /// Event header lines with `DTSTAMP:` filled in.
    pub fn stamped_event_header(&self, stamp: &str) -> Vec<String> {
        self.event_header
            .iter()
            .map(|line| match line.strip_prefix(DTSTAMP_PREFIX) {
                Some(rest) if rest.trim().is_empty() => format!("{DTSTAMP_PREFIX}{stamp}"),
                _ => line.clone(),
            })
            .collect()
    }
}

impl CalendarTemplates {
    /// Load the calendar header for `region` and pair it with `shared`.
    pub fn load(paths: &ProjectPaths, region: Option<&str>, shared: &SharedTemplates) -> Result<Self> {
        let calendar_header = read_lines(&paths.calendar_header_path(region))?;
        Ok(Self {
            calendar_header,
            shared: shared.clone(),
        })
    }

    /// Calendar header lines with the placeholder replaced by `title`,
    /// escaped as iCalendar TEXT.
    pub fn titled_header(&self, title: &str) -> Vec<String> {
        let title = escape_ical_text(title);
        self.calendar_header
            .iter()
            .map(|line| line.replace(TITLE_PLACEHOLDER, &title))
            .collect()
    }
}

/// Read a template as trimmed-right, non-empty lines.
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read template {}", path.display()))?;
    Ok(contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
