//! Test-only helpers: synthetic phase sources, locale fixtures and temp projects.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::core::astro::PhaseSource;
use crate::io::init::{InitOptions, ProjectPaths, init_project};
use crate::io::locale::LocaleTables;
use crate::io::templates::{CalendarTemplates, SharedTemplates};

/// Phase age that grows by one per day and wraps every `period` days.
///
/// `epoch` has age 0.
pub fn linear_phase(epoch: NaiveDate, period: f64) -> impl Fn(NaiveDate) -> f64 {
    move |date| ((date - epoch).num_days() as f64).rem_euclid(period)
}

/// Explicit ages for consecutive days starting at `start`.
///
/// Panics when asked for a date outside the sequence.
#[derive(Debug, Clone)]
pub struct SequencePhase {
    start: NaiveDate,
    ages: Vec<f64>,
}

impl SequencePhase {
    pub fn new(start: NaiveDate, ages: &[f64]) -> Self {
        Self {
            start,
            ages: ages.to_vec(),
        }
    }
}

impl PhaseSource for SequencePhase {
    fn phase_age(&self, date: NaiveDate) -> f64 {
        let offset = usize::try_from((date - self.start).num_days())
            .unwrap_or_else(|_| panic!("{date} is before the sequence start {}", self.start));
        *self
            .ages
            .get(offset)
            .unwrap_or_else(|| panic!("{date} is past the end of the sequence"))
    }
}

/// English and Dutch locale tables without regions.
pub fn fixture_tables() -> LocaleTables {
    let mut names: BTreeMap<String, Value> = BTreeMap::new();
    names.insert(
        "en".to_string(),
        json!([
            "New moon",
            "Waxing crescent",
            "First quarter",
            "Waxing gibbous",
            "Full moon",
            "Waning gibbous",
            "Last quarter",
            "Waning crescent"
        ]),
    );
    names.insert(
        "nl".to_string(),
        json!([
            "Nieuwe maan",
            "Wassende sikkel",
            "Eerste kwartier",
            "Wassende maan",
            "Volle maan",
            "Afnemende maan",
            "Laatste kwartier",
            "Afnemende sikkel"
        ]),
    );
    let mut headers: BTreeMap<String, Value> = BTreeMap::new();
    headers.insert(
        "en".to_string(),
        json!(["Day", "Phase", "Symbol", "Name", "Lunar phase"]),
    );
    headers.insert(
        "nl".to_string(),
        json!(["Dag", "Fase", "Symbool", "Naam", "Maanfase"]),
    );
    LocaleTables::from_parts(names, headers, None).expect("fixture tables")
}

/// Minimal calendar and event templates, matching the shape of the defaults.
pub fn fixture_templates() -> CalendarTemplates {
    let lines = |raw: &[&str]| raw.iter().map(|line| (*line).to_string()).collect::<Vec<_>>();
    CalendarTemplates {
        calendar_header: lines(&[
            "BEGIN:VCALENDAR",
            "VERSION:2.0",
            "PRODID:-//lunar//Lunar Phase//EN",
            "X-WR-CALNAME:Lunar Phase",
        ]),
        shared: SharedTemplates {
            calendar_footer: lines(&["END:VCALENDAR"]),
            event_header: lines(&["BEGIN:VEVENT", "DTSTAMP:", "TRANSP:TRANSPARENT"]),
            event_footer: lines(&["END:VEVENT"]),
        },
    }
}

/// Set of language keys, for `title_case_languages` arguments.
pub fn title_case_set(langs: &[&str]) -> BTreeSet<String> {
    langs.iter().map(|lang| (*lang).to_string()).collect()
}

/// An initialized project in a temporary directory.
pub struct TestProject {
    dir: TempDir,
    paths: ProjectPaths,
}

impl TestProject {
    /// Create a temp dir and run `init_project` in it.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        let paths = init_project(dir.path(), &InitOptions { force: false })?;
        Ok(Self { dir, paths })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    /// Write `data/regions.json`, switching the project into region mode.
    pub fn write_regions(&self, json: &str) -> Result<()> {
        fs::write(&self.paths.regions_path, json)
            .with_context(|| format!("write {}", self.paths.regions_path.display()))
    }

    /// Copy the default calendar header to `calendar-header-<region>.txt`.
    pub fn add_region_header(&self, region: &str) -> Result<()> {
        let source = self.paths.calendar_header_path(None);
        let target = self.paths.calendar_header_path(Some(region));
        fs::copy(&source, &target)
            .with_context(|| format!("copy {} to {}", source.display(), target.display()))?;
        Ok(())
    }

    /// Overwrite `lunar.toml` with raw TOML.
    pub fn write_config(&self, toml: &str) -> Result<()> {
        fs::write(&self.paths.config_path, toml)
            .with_context(|| format!("write {}", self.paths.config_path.display()))
    }
}
