//! Shared deterministic types for the phase classifier and calendar emitter.
//!
//! These types carry no I/O and must render identically across runs.

use std::fmt;

use chrono::NaiveDate;

/// Number of discrete phase codes per lunar cycle.
pub const CODE_COUNT: u8 = 8;

/// Locale-independent glyphs, indexed by phase code.
pub const PHASE_SYMBOLS: [&str; CODE_COUNT as usize] =
    ["🌑", "🌒", "🌓", "🌔", "🌕", "🌖", "🌗", "🌘"];

/// One of the eight named lunar phases.
///
/// Even codes are the principal phases (new, first quarter, full, last quarter);
/// odd codes cover the multi-day ranges in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhaseCode(u8);

impl PhaseCode {
    pub const NEW: Self = Self(0);
    pub const WAXING_CRESCENT: Self = Self(1);
    pub const FIRST_QUARTER: Self = Self(2);
    pub const WAXING_GIBBOUS: Self = Self(3);
    pub const FULL: Self = Self(4);
    pub const WANING_GIBBOUS: Self = Self(5);
    pub const LAST_QUARTER: Self = Self(6);
    pub const WANING_CRESCENT: Self = Self(7);

    /// Wrap any integer into the `0..8` code range.
    pub fn wrapping(value: u8) -> Self {
        Self(value % CODE_COUNT)
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_principal(self) -> bool {
        self.0 % 2 == 0
    }

    /// Next code, wrapping `7 -> 0`.
    pub fn next(self) -> Self {
        Self::wrapping(self.0 + 1)
    }

    /// Previous code, wrapping `0 -> 7`.
    pub fn prev(self) -> Self {
        Self::wrapping(self.0 + CODE_COUNT - 1)
    }

    /// Forward distance from `earlier` to `self`, modulo 8.
    pub fn steps_since(self, earlier: Self) -> u8 {
        (self.0 + CODE_COUNT - earlier.0) % CODE_COUNT
    }

    pub fn symbol(self) -> &'static str {
        PHASE_SYMBOLS[self.index()]
    }
}

impl fmt::Display for PhaseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification result for a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayPhase {
    pub date: NaiveDate,
    /// Days since the last new moon, `[0, 30)`.
    pub age: f64,
    pub code: PhaseCode,
}

/// Filtered subset of days written to one set of output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum View {
    All,
    Principal,
    NewMoon,
    FullMoon,
}

impl View {
    pub const ALL: [View; 4] = [View::All, View::Principal, View::NewMoon, View::FullMoon];

    /// Whether a day with `code` belongs in this view.
    pub fn includes(self, code: PhaseCode) -> bool {
        match self {
            View::All => true,
            View::Principal => code.is_principal(),
            View::NewMoon => code == PhaseCode::NEW,
            View::FullMoon => code == PhaseCode::FULL,
        }
    }

    /// Wide views carry symbol and name columns in tabular formats.
    pub fn is_wide(self) -> bool {
        matches!(self, View::All | View::Principal)
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            View::All => "moon-phases-all",
            View::Principal => "moon-phases",
            View::NewMoon => "new-moon",
            View::FullMoon => "full-moon",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            View::All => "all",
            View::Principal => "principal",
            View::NewMoon => "new",
            View::FullMoon => "full",
        }
    }
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Format {
    Tsv,
    Markdown,
    ICalendar,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Tsv, Format::Markdown, Format::ICalendar];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Tsv => "tsv",
            Format::Markdown => "md",
            Format::ICalendar => "ics",
        }
    }

    /// File name for `view` in this format, e.g. `new-moon.ics`.
    pub fn file_name(self, view: View) -> String {
        format!("{}.{}", view.file_stem(), self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_wrap_in_both_directions() {
        assert_eq!(PhaseCode::WANING_CRESCENT.next(), PhaseCode::NEW);
        assert_eq!(PhaseCode::NEW.prev(), PhaseCode::WANING_CRESCENT);
        assert_eq!(PhaseCode::wrapping(12), PhaseCode::FULL);
    }

    #[test]
    fn steps_since_counts_forward_modulo_eight() {
        assert_eq!(PhaseCode::NEW.steps_since(PhaseCode::WANING_CRESCENT), 1);
        assert_eq!(PhaseCode::WAXING_GIBBOUS.steps_since(PhaseCode::WAXING_CRESCENT), 2);
        assert_eq!(PhaseCode::FULL.steps_since(PhaseCode::FULL), 0);
    }

    #[test]
    fn symbols_follow_code_order() {
        assert_eq!(PhaseCode::NEW.symbol(), "🌑");
        assert_eq!(PhaseCode::FULL.symbol(), "🌕");
        assert_eq!(PhaseCode::WANING_CRESCENT.symbol(), "🌘");
    }

    #[test]
    fn views_partition_by_code() {
        for value in 0..CODE_COUNT {
            let code = PhaseCode::wrapping(value);
            assert!(View::All.includes(code));
            assert_eq!(View::Principal.includes(code), value % 2 == 0);
            assert_eq!(View::NewMoon.includes(code), value == 0);
            assert_eq!(View::FullMoon.includes(code), value == 4);
        }
    }

    #[test]
    fn file_names_match_published_layout() {
        assert_eq!(Format::Tsv.file_name(View::All), "moon-phases-all.tsv");
        assert_eq!(Format::Markdown.file_name(View::Principal), "moon-phases.md");
        assert_eq!(Format::ICalendar.file_name(View::NewMoon), "new-moon.ics");
        assert_eq!(Format::ICalendar.file_name(View::FullMoon), "full-moon.ics");
    }
}
