//! Locale tables (`data/*.json`) with per-entry schema validation.
//!
//! The table files must be JSON objects; anything else aborts the run. Entries
//! are only checked when a language is looked up, so one malformed language
//! never blocks the others.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::{Validator, validator_for};
use serde_json::Value;
use tracing::debug;

use crate::core::text::title_case;
use crate::core::types::{CODE_COUNT, PhaseCode, View};
use crate::io::init::ProjectPaths;

const PHASE_NAMES_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/locale/phase_names.v1.schema.json"
));
const HEADERS_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/locale/headers.v1.schema.json"
));
const REGIONS_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/locale/regions.v1.schema.json"
));

/// Column labels and calendar title for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headers {
    pub day: String,
    pub phase: String,
    pub symbol: String,
    pub name: String,
    pub title: String,
}

/// Resolved strings for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub lang: String,
    pub names: Vec<String>,
    pub headers: Headers,
    /// Capitalize every word of calendar titles.
    pub title_case: bool,
}

impl Locale {
    /// Localized name of `code`.
    pub fn name(&self, code: PhaseCode) -> &str {
        &self.names[code.index()]
    }

    /// Title of the calendar for `view`, title-cased when the locale asks for it.
    pub fn title(&self, view: View) -> String {
        let raw = match view {
            View::All | View::Principal => self.headers.title.as_str(),
            View::NewMoon => self.name(PhaseCode::NEW),
            View::FullMoon => self.name(PhaseCode::FULL),
        };
        if self.title_case {
            title_case(raw)
        } else {
            raw.to_string()
        }
    }
}

/// Phase names, headers and optional region mapping, loaded once per run.
pub struct LocaleTables {
    names: BTreeMap<String, Value>,
    headers: BTreeMap<String, Value>,
    regions: Option<BTreeMap<String, Vec<String>>>,
    names_schema: Validator,
    headers_schema: Validator,
}

impl LocaleTables {
    /// Load tables from the project's data directory.
    ///
    /// `regions.json` is optional; without it every language in `headers.json`
    /// is generated once.
    pub fn load(paths: &ProjectPaths) -> Result<Self> {
        let names = read_object(&paths.names_path)?;
        let headers = read_object(&paths.headers_path)?;
        let regions = if paths.regions_path.exists() {
            Some(read_regions(&paths.regions_path)?)
        } else {
            None
        };
        debug!(
            names = names.len(),
            headers = headers.len(),
            regions = regions.as_ref().map(BTreeMap::len),
            "loaded locale tables"
        );
        Self::from_parts(names, headers, regions)
    }

    /// Build tables from already-parsed JSON objects.
    pub fn from_parts(
        names: BTreeMap<String, Value>,
        headers: BTreeMap<String, Value>,
        regions: Option<BTreeMap<String, Vec<String>>>,
    ) -> Result<Self> {
        Ok(Self {
            names,
            headers,
            regions,
            names_schema: compile_schema(PHASE_NAMES_SCHEMA)?,
            headers_schema: compile_schema(HEADERS_SCHEMA)?,
        })
    }

    /// Languages with a header entry, sorted.
    pub fn languages(&self) -> Vec<String> {
        self.headers.keys().cloned().collect()
    }

    pub fn regions(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        self.regions.as_ref()
    }

    /// Resolve and validate the entries for `lang`.
    pub fn locale(&self, lang: &str, title_case_languages: &BTreeSet<String>) -> Result<Locale> {
        let names = self
            .names
            .get(lang)
            .ok_or_else(|| anyhow!("no phase names for language '{lang}'"))?;
        let names = validated_strings(&self.names_schema, names)
            .with_context(|| format!("phase names for language '{lang}'"))?;
        debug_assert_eq!(names.len(), usize::from(CODE_COUNT));

        let headers = self
            .headers
            .get(lang)
            .ok_or_else(|| anyhow!("no headers for language '{lang}'"))?;
        let mut headers = validated_strings(&self.headers_schema, headers)
            .with_context(|| format!("headers for language '{lang}'"))?
            .into_iter();
        let mut next = || headers.next().unwrap_or_default();
        let headers = Headers {
            day: next(),
            phase: next(),
            symbol: next(),
            name: next(),
            title: next(),
        };

        Ok(Locale {
            lang: lang.to_string(),
            names,
            headers,
            title_case: title_case_languages.contains(lang),
        })
    }
}

fn compile_schema(raw: &str) -> Result<Validator> {
    let schema: Value = serde_json::from_str(raw).context("parse embedded schema")?;
    validator_for(&schema).map_err(|err| anyhow!("invalid embedded schema: {}", err))
}

fn validated_strings(schema: &Validator, value: &Value) -> Result<Vec<String>> {
    let messages: Vec<String> = schema.iter_errors(value).map(|err| err.to_string()).collect();
    if !messages.is_empty() {
        return Err(anyhow!("schema validation failed: {}", messages.join("; ")));
    }
    serde_json::from_value(value.clone()).context("deserialize string list")
}

fn read_object(path: &Path) -> Result<BTreeMap<String, Value>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parse {} as a JSON object", path.display()))
}

fn read_regions(path: &Path) -> Result<BTreeMap<String, Vec<String>>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    let schema = compile_schema(REGIONS_SCHEMA)?;
    let messages: Vec<String> = schema.iter_errors(&value).map(|err| err.to_string()).collect();
    if !messages.is_empty() {
        return Err(anyhow!(
            "regions schema validation failed for {}: {}",
            path.display(),
            messages.join("; ")
        ));
    }
    serde_json::from_value(value).with_context(|| format!("deserialize {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture_tables, title_case_set};
    use serde_json::json;

    #[test]
    fn name_lookup_indexes_by_code() {
        let tables = fixture_tables();
        let locale = tables.locale("en", &title_case_set(&[])).expect("locale");
        assert_eq!(locale.name(PhaseCode::NEW), "New moon");
        assert_eq!(locale.name(PhaseCode::FULL), "Full moon");
        assert_eq!(locale.name(PhaseCode::WANING_CRESCENT), "Waning crescent");

        let nl = tables.locale("nl", &title_case_set(&[])).expect("locale");
        assert_eq!(nl.name(PhaseCode::FIRST_QUARTER), "Eerste kwartier");
        assert_eq!(nl.headers.day, "Dag");
    }

    #[test]
    fn titles_follow_view_and_title_case_flag() {
        let tables = fixture_tables();
        let plain = tables.locale("en", &title_case_set(&[])).expect("locale");
        assert_eq!(plain.title(View::All), "Lunar phase");
        assert_eq!(plain.title(View::NewMoon), "New moon");

        let titled = tables.locale("en", &title_case_set(&["en"])).expect("locale");
        assert_eq!(titled.title(View::Principal), "Lunar Phase");
        assert_eq!(titled.title(View::FullMoon), "Full Moon");
    }

    #[test]
    fn missing_language_is_an_error() {
        let tables = fixture_tables();
        let err = tables.locale("xx", &title_case_set(&[])).unwrap_err();
        assert!(err.to_string().contains("no phase names for language 'xx'"));
    }

    #[test]
    fn malformed_entry_fails_only_its_language() {
        let mut names = BTreeMap::new();
        names.insert("en".to_string(), json!(["only", "three", "names"]));
        names.insert(
            "nl".to_string(),
            json!([
                "Nieuwe maan",
                "Wassende sikkel",
                "Eerste kwartier",
                "Wassende maan",
                "Volle maan",
                "Afnemende maan",
                "Laatste kwartier",
                "Afnemende sikkel"
            ]),
        );
        let mut headers = BTreeMap::new();
        headers.insert("en".to_string(), json!(["Day", "Phase", "Symbol", "Name", "Lunar phase"]));
        headers.insert("nl".to_string(), json!(["Dag", "Fase", "Symbool", "Naam", "Maanfase"]));
        let tables = LocaleTables::from_parts(names, headers, None).expect("tables");

        let err = tables.locale("en", &title_case_set(&[])).unwrap_err();
        assert!(format!("{err:#}").contains("schema validation failed"));
        assert!(tables.locale("nl", &title_case_set(&[])).is_ok());
    }

    #[test]
    fn load_rejects_non_object_tables() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = ProjectPaths::new(temp.path(), &crate::io::config::LunarConfig::default());
        fs::create_dir_all(&paths.data_dir).expect("data dir");
        fs::write(&paths.names_path, "[1, 2, 3]").expect("write names");
        fs::write(&paths.headers_path, "{}").expect("write headers");

        let err = LocaleTables::load(&paths).err().expect("load should fail");
        assert!(err.to_string().contains("as a JSON object"));
    }

    #[test]
    fn load_validates_regions() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = ProjectPaths::new(temp.path(), &crate::io::config::LunarConfig::default());
        fs::create_dir_all(&paths.data_dir).expect("data dir");
        fs::write(&paths.names_path, "{}").expect("write names");
        fs::write(&paths.headers_path, "{}").expect("write headers");
        fs::write(&paths.regions_path, r#"{"za": []}"#).expect("write regions");

        let err = LocaleTables::load(&paths).err().expect("load should fail");
        assert!(err.to_string().contains("regions schema validation failed"));

        fs::write(&paths.regions_path, r#"{"za": ["af", "en"]}"#).expect("write regions");
        let tables = LocaleTables::load(&paths).expect("load");
        let regions = tables.regions().expect("regions");
        assert_eq!(regions["za"], vec!["af".to_string(), "en".to_string()]);
    }
}
