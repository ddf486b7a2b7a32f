//! Stable iCalendar event identifiers.

use sha2::{Digest, Sha256};

use crate::core::types::{DayPhase, View};

/// Hex characters of the digest kept in the UID.
const UID_HASH_CHARS: usize = 16;

/// Inputs that make an event unique within one run.
#[derive(Debug, Clone, Copy)]
pub struct UidScope<'a> {
    pub region: &'a str,
    pub lang: &'a str,
    pub view: View,
}

/// Deterministic UID for one event: a truncated SHA-256 of the day, its age,
/// the view, the summary text, region and language, qualified by `domain`.
///
/// The same inputs always hash to the same UID, so calendar clients can update
/// events in place across regenerated feeds.
pub fn event_uid(day: &DayPhase, summary: &str, scope: UidScope<'_>, domain: &str) -> String {
    let date = day.date.to_string();
    let age = format!("{:.6}", day.age);
    let mut hasher = Sha256::new();
    for part in [
        date.as_str(),
        age.as_str(),
        scope.view.as_str(),
        summary,
        scope.region,
        scope.lang,
    ] {
        hasher.update(part.as_bytes());
        hasher.update([0x1f]);
    }
    let digest = hex::encode(hasher.finalize());
    format!("{}@{}", &digest[..UID_HASH_CHARS], domain)
}
