//! Calendar emitter: classify every day of a window and render the twelve
//! outputs (four views × three formats) for one locale.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::core::astro::PhaseSource;
use crate::core::classifier::PhaseSeries;
use crate::core::types::{DayPhase, Format, View};
use crate::core::uid::{UidScope, event_uid};
use crate::core::window::CalendarWindow;
use crate::io::locale::Locale;
use crate::io::templates::CalendarTemplates;
use crate::render::{EventFields, Layouts, markdown_row, to_ical_lines, tsv_row};

/// Upper bound (exclusive) on a valid phase age.
const MAX_PHASE_AGE: f64 = 30.0;

/// Everything one locale run needs besides the phase source and window.
pub struct EmitContext<'a> {
    pub locale: &'a Locale,
    /// Region key, or `None` when regions are not configured.
    pub region: Option<&'a str>,
    pub templates: &'a CalendarTemplates,
    pub stamp: DateTime<Utc>,
    pub uid_domain: &'a str,
}

/// In-memory contents of every output file for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCalendar {
    files: BTreeMap<(View, Format), String>,
    events: BTreeMap<View, usize>,
}

impl RenderedCalendar {
    /// Contents of the file for `view` in `format`.
    pub fn file(&self, view: View, format: Format) -> &str {
        self.files
            .get(&(view, format))
            .map_or("", String::as_str)
    }

    /// `(file name, contents)` for every output, in stable order.
    pub fn files(&self) -> impl Iterator<Item = (String, &str)> {
        self.files
            .iter()
            .map(|((view, format), contents)| (format.file_name(*view), contents.as_str()))
    }

    /// Number of days written to `view`.
    pub fn event_count(&self, view: View) -> usize {
        self.events.get(&view).copied().unwrap_or(0)
    }
}

/// Render all outputs for one locale over `window`.
///
/// Days are processed in ascending order. A phase age outside `[0, 30)` aborts
/// the locale with an error.
#[instrument(skip_all, fields(lang = %ctx.locale.lang, region = ctx.region.unwrap_or("-")))]
pub fn render_calendar<S: PhaseSource + ?Sized>(
    source: &S,
    window: CalendarWindow,
    ctx: &EmitContext<'_>,
) -> Result<RenderedCalendar> {
    let layouts = Layouts::new()?;
    let stamp = ctx.stamp.format("%Y%m%dT%H%M%SZ").to_string();
    let head = ctx.templates.shared.stamped_event_header(&stamp);
    let foot = &ctx.templates.shared.event_footer;

    let mut files = BTreeMap::new();
    for view in View::ALL {
        let title = ctx.locale.title(view);
        let ics_header = ctx.templates.titled_header(&title);
        files.insert((view, Format::Tsv), layouts.tsv_header(ctx.locale, view)?);
        files.insert((view, Format::Markdown), layouts.markdown_header(ctx.locale, view)?);
        files.insert(
            (view, Format::ICalendar),
            to_ical_lines(ics_header.iter().map(String::as_str)),
        );
    }

    let mut events: BTreeMap<View, usize> = View::ALL.iter().map(|view| (*view, 0)).collect();
    for day in PhaseSeries::new(source, window.start, window.end) {
        ensure_valid_age(&day)?;
        let summary = format!("{} {}", day.code.symbol(), ctx.locale.name(day.code));
        for view in View::ALL.into_iter().filter(|view| view.includes(day.code)) {
            let uid = event_uid(
                &day,
                &summary,
                UidScope {
                    region: ctx.region.unwrap_or(""),
                    lang: &ctx.locale.lang,
                    view,
                },
                ctx.uid_domain,
            );
            let event = layouts.ics_event(&EventFields {
                head: &head,
                foot,
                summary: &summary,
                uid: &uid,
                day: &day,
            })?;
            append(&mut files, view, Format::Tsv, &tsv_row(&day, view, ctx.locale));
            append(&mut files, view, Format::Markdown, &markdown_row(&day, view, ctx.locale));
            append(&mut files, view, Format::ICalendar, &event);
            *events.entry(view).or_default() += 1;
        }
    }

    let footer = to_ical_lines(ctx.templates.shared.calendar_footer.iter().map(String::as_str));
    for view in View::ALL {
        append(&mut files, view, Format::ICalendar, &footer);
    }

    debug!(
        days = window.len_days(),
        principal = events.get(&View::Principal).copied().unwrap_or(0),
        "rendered calendar"
    );
    Ok(RenderedCalendar { files, events })
}

fn append(files: &mut BTreeMap<(View, Format), String>, view: View, format: Format, text: &str) {
    files.entry((view, format)).or_default().push_str(text);
}

fn ensure_valid_age(day: &DayPhase) -> Result<()> {
    if !day.age.is_finite() || day.age < 0.0 || day.age >= MAX_PHASE_AGE {
        bail!("phase age {} out of range [0, 30) on {}", day.age, day.date);
    }
    Ok(())
}
