//! Writing rendered calendars into per-locale directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::debug;

use crate::emit::RenderedCalendar;

static KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("locale key pattern should be valid")
});

/// Reject region or language keys that are unsafe as a directory name.
pub fn ensure_key(kind: &str, key: &str) -> Result<()> {
    if !KEY_RE.is_match(key) {
        bail!("invalid {kind} key '{key}': expected letters, digits, '-' or '_'");
    }
    Ok(())
}

/// Output directory for a locale: `<output>/<region>/<lang>` or `<output>/<lang>`.
pub fn locale_dir(output_dir: &Path, region: Option<&str>, lang: &str) -> Result<PathBuf> {
    ensure_key("language", lang)?;
    match region {
        Some(region) => {
            ensure_key("region", region)?;
            Ok(output_dir.join(region).join(lang))
        }
        None => Ok(output_dir.join(lang)),
    }
}

/// Write every file of `calendar` into `dir`, replacing previous contents.
pub fn write_calendar(dir: &Path, calendar: &RenderedCalendar) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create directory {}", dir.display()))?;
    for (name, contents) in calendar.files() {
        let path = dir.join(&name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        debug!(path = %path.display(), bytes = contents.len(), "wrote output");
    }
    Ok(())
}
