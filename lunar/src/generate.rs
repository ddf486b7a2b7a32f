//! `lunar generate`: render every configured locale into the output tree.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::{error, info};

use crate::core::astro::{MeeusPhase, PhaseSource};
use crate::core::types::View;
use crate::core::window::CalendarWindow;
use crate::emit::{EmitContext, render_calendar};
use crate::io::config::StampMode;
use crate::io::output::{locale_dir, write_calendar};
use crate::io::templates::{CalendarTemplates, SharedTemplates};
use crate::project::{LocaleTarget, Project};

/// Inputs for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Reference date the window is centred on.
    pub today: NaiveDate,
    /// Wall-clock time of the run, used for `DTSTAMP` in `run` stamp mode.
    pub now: DateTime<Utc>,
    /// Overrides the configured output directory.
    pub output_dir: Option<PathBuf>,
}

impl GenerateOptions {
    /// Options for "now": today's UTC date and the current time.
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            today: now.date_naive(),
            now,
            output_dir: None,
        }
    }
}

/// Result of one locale run.
#[derive(Debug)]
pub enum LocaleOutcome {
    Written {
        target: LocaleTarget,
        dir: PathBuf,
        /// Events written to the all-days view.
        days: usize,
    },
    Failed {
        target: LocaleTarget,
        error: anyhow::Error,
    },
}

impl LocaleOutcome {
    pub fn target(&self) -> &LocaleTarget {
        match self {
            Self::Written { target, .. } | Self::Failed { target, .. } => target,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Outcomes of every locale, in generation order.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub outcomes: Vec<LocaleOutcome>,
}

impl GenerateReport {
    pub fn written(&self) -> impl Iterator<Item = &LocaleOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_written())
    }

    pub fn failed(&self) -> impl Iterator<Item = &LocaleOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_written())
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }
}

/// Load the project under `root` and generate with the astronomical phase source.
pub fn generate_from_root(root: &Path, options: &GenerateOptions) -> Result<GenerateReport> {
    let project = Project::load(root)?;
    generate(&project, &MeeusPhase, options)
}

/// Generate every locale of `project` from `source`.
///
/// Fails as a whole only when the shared templates or the window cannot be
/// built; everything else is recorded per locale in the report.
pub fn generate<S: PhaseSource + ?Sized>(
    project: &Project,
    source: &S,
    options: &GenerateOptions,
) -> Result<GenerateReport> {
    let shared = project.shared_templates()?;
    let window = CalendarWindow::around(
        options.today,
        project.config.window.days_before,
        project.config.window.days_after,
    )?;
    let stamp = match project.config.ics.stamp {
        StampMode::Run => options.now,
        StampMode::Today => options.today.and_time(NaiveTime::MIN).and_utc(),
    };
    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| project.paths.output_dir.clone());
    info!(
        start = %window.start,
        end = %window.end,
        output = %output_dir.display(),
        "generating calendars"
    );

    let mut report = GenerateReport::default();
    let mut headers: BTreeMap<Option<String>, CalendarTemplates> = BTreeMap::new();
    for target in project.targets() {
        let result = region_templates(project, &mut headers, target.region.as_deref(), &shared)
            .and_then(|templates| {
                run_locale(
                    project,
                    source,
                    &target,
                    &LocaleRun {
                        window,
                        stamp,
                        output_dir: &output_dir,
                        templates,
                    },
                )
            });
        let outcome = match result {
            Ok((dir, days)) => LocaleOutcome::Written { target, dir, days },
            Err(err) => {
                error!(locale = %target, error = %format!("{err:#}"), "locale failed");
                LocaleOutcome::Failed { target, error: err }
            }
        };
        report.outcomes.push(outcome);
    }
    Ok(report)
}

struct LocaleRun<'a> {
    window: CalendarWindow,
    stamp: DateTime<Utc>,
    output_dir: &'a Path,
    templates: &'a CalendarTemplates,
}

/// Calendar templates for `region`, loaded on first use.
///
/// Only successful loads are cached; a failing region is reloaded for each of
/// its locales so every failure carries the full error chain.
fn region_templates<'a>(
    project: &Project,
    cache: &'a mut BTreeMap<Option<String>, CalendarTemplates>,
    region: Option<&str>,
    shared: &SharedTemplates,
) -> Result<&'a CalendarTemplates> {
    match cache.entry(region.map(str::to_string)) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => {
            let templates = CalendarTemplates::load(&project.paths, region, shared)?;
            Ok(entry.insert(templates))
        }
    }
}

fn run_locale<S: PhaseSource + ?Sized>(
    project: &Project,
    source: &S,
    target: &LocaleTarget,
    run: &LocaleRun<'_>,
) -> Result<(PathBuf, usize)> {
    let dir = locale_dir(run.output_dir, target.region.as_deref(), &target.lang)?;
    let locale = project.locale(&target.lang)?;
    let ctx = EmitContext {
        locale: &locale,
        region: target.region.as_deref(),
        templates: run.templates,
        stamp: run.stamp,
        uid_domain: &project.config.uid_domain,
    };
    let calendar = render_calendar(source, run.window, &ctx)
        .with_context(|| format!("render {target}"))?;
    write_calendar(&dir, &calendar)?;
    Ok((dir, calendar.event_count(View::All)))
}
