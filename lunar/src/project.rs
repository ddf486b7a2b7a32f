//! A loaded project: paths, config, locale tables and shared templates.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::io::config::{LunarConfig, load_config};
use crate::io::init::{ProjectPaths, config_path};
use crate::io::locale::{Locale, LocaleTables};
use crate::io::templates::SharedTemplates;

/// One `(region, language)` pair to generate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocaleTarget {
    pub region: Option<String>,
    pub lang: String,
}

impl fmt::Display for LocaleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}/{}", region, self.lang),
            None => write!(f, "{}", self.lang),
        }
    }
}

/// Project state shared read-only by every locale run.
pub struct Project {
    pub paths: ProjectPaths,
    pub config: LunarConfig,
    pub tables: LocaleTables,
}

impl Project {
    /// Load `lunar.toml` (or defaults) and the locale tables under `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let config = load_config(&config_path(root)).context("load lunar.toml")?;
        let paths = ProjectPaths::new(root, &config);
        let tables = LocaleTables::load(&paths).context("load locale tables")?;
        debug!(root = %root.display(), "project loaded");
        Ok(Self {
            paths,
            config,
            tables,
        })
    }

    /// Templates shared by all locales.
    pub fn shared_templates(&self) -> Result<SharedTemplates> {
        SharedTemplates::load(&self.paths).context("load shared templates")
    }

    /// Every locale to generate, sorted by region then language.
    pub fn targets(&self) -> Vec<LocaleTarget> {
        let mut targets: Vec<LocaleTarget> = match self.tables.regions() {
            Some(regions) => regions
                .iter()
                .flat_map(|(region, langs)| {
                    langs.iter().map(|lang| LocaleTarget {
                        region: Some(region.clone()),
                        lang: lang.clone(),
                    })
                })
                .collect(),
            None => self
                .tables
                .languages()
                .into_iter()
                .map(|lang| LocaleTarget { region: None, lang })
                .collect(),
        };
        targets.sort();
        targets
    }

    /// Resolve the locale strings for `lang`.
    pub fn locale(&self, lang: &str) -> Result<Locale> {
        let title_case: BTreeSet<String> =
            self.config.title_case_languages.iter().cloned().collect();
        self.tables.locale(lang, &title_case)
    }
}
