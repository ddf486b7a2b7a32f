//! `lunar validate`: check a project without writing any output.

use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::io::config::load_config;
use crate::io::init::{ProjectPaths, config_path};
use crate::io::output::ensure_key;
use crate::io::templates::CalendarTemplates;
use crate::project::Project;

/// Validation result for a project whose config and tables loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOutcome {
    /// Locales (`region/lang` or `lang`) that passed every check.
    pub locales: Vec<String>,
    /// One message per problem found.
    pub problems: Vec<String>,
}

impl ValidateOutcome {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Validate config, data tables, templates and every locale under `root`.
///
/// Errors only when the project cannot be loaded at all; per-locale and
/// per-template problems are collected in the outcome.
pub fn validate_project(root: &Path) -> Result<ValidateOutcome> {
    let config = load_config(&config_path(root)).context("load lunar.toml")?;
    let paths = ProjectPaths::new(root, &config);
    ensure_dir(&paths.data_dir)?;
    ensure_dir(&paths.templates_dir)?;
    ensure_file(&paths.names_path)?;
    ensure_file(&paths.headers_path)?;

    let project = Project::load(root)?;
    let mut problems = Vec::new();
    let shared = match project.shared_templates() {
        Ok(shared) => Some(shared),
        Err(err) => {
            problems.push(format!("{err:#}"));
            None
        }
    };

    let mut locales = Vec::new();
    for target in project.targets() {
        let mut ok = true;
        let mut check = |result: Result<()>| {
            if let Err(err) = result {
                problems.push(format!("{target}: {err:#}"));
                ok = false;
            }
        };
        if let Some(region) = target.region.as_deref() {
            check(ensure_key("region", region));
        }
        check(ensure_key("language", &target.lang));
        check(project.locale(&target.lang).map(drop));
        if let Some(shared) = &shared {
            check(CalendarTemplates::load(&project.paths, target.region.as_deref(), shared).map(drop));
        }
        if ok {
            locales.push(target.to_string());
        }
    }

    Ok(ValidateOutcome { locales, problems })
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(anyhow!("missing directory {}", path.display()));
    }
    if !path.is_dir() {
        return Err(anyhow!("expected directory {}", path.display()));
    }
    Ok(())
}

fn ensure_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(anyhow!("missing file {}", path.display()));
    }
    if !path.is_file() {
        return Err(anyhow!("expected file {}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestProject;
    use std::fs;

    #[test]
    fn validate_ok_for_fresh_project() {
        let project = TestProject::new().expect("project");
        let outcome = validate_project(project.root()).expect("validate");
        assert!(outcome.is_ok(), "{:?}", outcome.problems);
        assert_eq!(outcome.locales.len(), 8);
    }

    #[test]
    fn validate_errors_on_missing_data_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = validate_project(temp.path()).unwrap_err();
        assert!(err.to_string().contains("missing directory"));
    }

    #[test]
    fn validate_collects_every_locale_problem() {
        let project = TestProject::new().expect("project");
        project
            .write_regions(r#"{"be": ["nl", "xx"], "za": ["af"]}"#)
            .expect("regions");
        project.add_region_header("be").expect("be header");

        let outcome = validate_project(project.root()).expect("validate");
        assert_eq!(outcome.locales, vec!["be/nl"]);
        assert_eq!(outcome.problems.len(), 2);
        assert!(outcome.problems[0].starts_with("be/xx: no phase names"));
        assert!(outcome.problems[1].contains("calendar-header-za.txt"));
    }

    #[test]
    fn validate_reports_broken_shared_template() {
        let project = TestProject::new().expect("project");
        fs::write(&project.paths().event_header_path, "BEGIN:VEVENT\n").expect("write");

        let outcome = validate_project(project.root()).expect("validate");
        assert!(!outcome.is_ok());
        assert!(outcome.problems[0].contains("SUMMARY:"));
    }
}
