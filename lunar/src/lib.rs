//! Lunar phase calendars.
//!
//! Classifies every day of a date window into one of eight phase codes and
//! renders per-locale calendars as TSV, Markdown and iCalendar. The crate keeps
//! a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (phase ages, bucketing, the
//!   classifier, text escaping, UIDs). No I/O.
//! - **[`io`]**: Side-effecting operations (config, locale tables, templates,
//!   output directories).
//!
//! [`emit`] and [`render`] turn classified days into file contents; the
//! command modules ([`generate`], [`validate`], [`classify`]) coordinate core
//! logic with I/O to implement the CLI.

pub mod classify;
pub mod core;
pub mod emit;
pub mod exit_codes;
pub mod generate;
pub mod io;
pub mod logging;
pub mod project;
pub mod render;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validate;
