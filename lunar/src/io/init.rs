//! Project layout and `lunar init` scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::io::config::{LunarConfig, write_config};

const CONFIG_FILE: &str = "lunar.toml";

const DEFAULT_PHASE_NAMES: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../data/moon-phase-names.json"
));
const DEFAULT_HEADERS: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../data/headers.json"));
const DEFAULT_CALENDAR_HEADER: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../templates/calendar-header.txt"
));
const DEFAULT_CALENDAR_FOOTER: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../templates/calendar-footer.txt"
));
const DEFAULT_EVENT_HEADER: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../templates/event-header.txt"
));
const DEFAULT_EVENT_FOOTER: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../templates/event-footer.txt"
));

/// All canonical paths for a project root.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub names_path: PathBuf,
    pub headers_path: PathBuf,
    pub regions_path: PathBuf,
    pub templates_dir: PathBuf,
    pub calendar_footer_path: PathBuf,
    pub event_header_path: PathBuf,
    pub event_footer_path: PathBuf,
    pub output_dir: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>, config: &LunarConfig) -> Self {
        let root = root.into();
        let data_dir = root.join(&config.data_dir);
        let templates_dir = root.join(&config.templates_dir);
        Self {
            root: root.clone(),
            config_path: config_path(&root),
            data_dir: data_dir.clone(),
            names_path: data_dir.join("moon-phase-names.json"),
            headers_path: data_dir.join("headers.json"),
            regions_path: data_dir.join("regions.json"),
            templates_dir: templates_dir.clone(),
            calendar_footer_path: templates_dir.join("calendar-footer.txt"),
            event_header_path: templates_dir.join("event-header.txt"),
            event_footer_path: templates_dir.join("event-footer.txt"),
            output_dir: root.join(&config.output_dir),
        }
    }

    /// Calendar header for a region, or the shared one when regions are off.
    pub fn calendar_header_path(&self, region: Option<&str>) -> PathBuf {
        match region {
            Some(region) => self
                .templates_dir
                .join(format!("calendar-header-{region}.txt")),
            None => self.templates_dir.join("calendar-header.txt"),
        }
    }
}

/// Location of `lunar.toml` under `root`.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Options for `init_project`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite existing project files.
    pub force: bool,
}

/// Write a default config, locale tables and templates into `root`.
///
/// Fails if `lunar.toml` already exists unless `options.force` is set.
pub fn init_project(root: &Path, options: &InitOptions) -> Result<ProjectPaths> {
    let config = LunarConfig::default();
    let paths = ProjectPaths::new(root, &config);
    if paths.config_path.exists() && !options.force {
        return Err(anyhow!(
            "lunar init: {} already exists (use --force to overwrite)",
            paths.config_path.display()
        ));
    }

    create_dir(&paths.data_dir)?;
    create_dir(&paths.templates_dir)?;

    write_config(&paths.config_path, &config)?;
    write_file(&paths.names_path, DEFAULT_PHASE_NAMES)?;
    write_file(&paths.headers_path, DEFAULT_HEADERS)?;
    write_file(&paths.calendar_header_path(None), DEFAULT_CALENDAR_HEADER)?;
    write_file(&paths.calendar_footer_path, DEFAULT_CALENDAR_FOOTER)?;
    write_file(&paths.event_header_path, DEFAULT_EVENT_HEADER)?;
    write_file(&paths.event_footer_path, DEFAULT_EVENT_FOOTER)?;

    info!(root = %root.display(), "project initialized");
    Ok(paths)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("create directory {}", path.display()))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("write file {}", path.display()))
}
