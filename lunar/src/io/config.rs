//! Project configuration stored in `lunar.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Project configuration (TOML).
///
/// Every field has a default, so a missing file or a partial file both work.
/// Directories are relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LunarConfig {
    /// Directory holding `moon-phase-names.json`, `headers.json`, `regions.json`.
    pub data_dir: PathBuf,

    /// Directory holding calendar and event templates.
    pub templates_dir: PathBuf,

    /// Root directory for generated per-locale output.
    pub output_dir: PathBuf,

    /// Domain part of every event UID.
    pub uid_domain: String,

    /// Languages whose calendar titles get every word capitalized.
    pub title_case_languages: Vec<String>,

    pub window: WindowConfig,

    pub ics: IcsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WindowConfig {
    /// Days before today included in the output.
    pub days_before: u32,
    /// Days after today included in the output.
    pub days_after: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            days_before: 6 * 31,
            days_after: 2 * 366 + 2 * 31,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct IcsConfig {
    pub stamp: StampMode,
}

/// Source of the `DTSTAMP` written on every event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StampMode {
    /// Wall-clock time at the start of the run.
    #[default]
    Run,
    /// Midnight UTC of the reference date; makes feeds reproducible.
    Today,
}

impl Default for LunarConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("calendars"),
            uid_domain: "lunar.invalid".to_string(),
            title_case_languages: vec!["en".to_string(), "pt".to_string()],
            window: WindowConfig::default(),
            ics: IcsConfig::default(),
        }
    }
}

impl LunarConfig {
    pub fn validate(&self) -> Result<()> {
        for (field, dir) in [
            ("data_dir", &self.data_dir),
            ("templates_dir", &self.templates_dir),
            ("output_dir", &self.output_dir),
        ] {
            if dir.as_os_str().is_empty() {
                return Err(anyhow!("{field} must not be empty"));
            }
        }
        if self.uid_domain.trim().is_empty() {
            return Err(anyhow!("uid_domain must not be empty"));
        }
        if self.uid_domain.chars().any(char::is_whitespace) {
            return Err(anyhow!("uid_domain must not contain whitespace"));
        }
        if self.window.days_after == 0 {
            return Err(anyhow!("window.days_after must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `LunarConfig::default()`.
pub fn load_config(path: &Path) -> Result<LunarConfig> {
    if !path.exists() {
        let cfg = LunarConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: LunarConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &LunarConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
