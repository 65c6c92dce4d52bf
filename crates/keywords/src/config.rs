//! Checker configuration: reserved keyword lists and reviewed overrides
//!
//! Both documents are YAML maps keyed by downstream system name. Keyword
//! lists hold plain column names; overrides hold `Model.field` entries for
//! conflicts the team has decided to live with.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{KeywordError, KeywordResult};

/// Reserved column names per downstream system, e.g. `snowflake: [ROW, ...]`.
pub type KeywordLists = BTreeMap<String, Vec<String>>;

/// Exempted `Model.field` entries per downstream system.
pub type OverrideLists = BTreeMap<String, Vec<String>>;

/// Configuration for one checker run.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    pub reserved: KeywordLists,
    pub overrides: OverrideLists,
    pub report_path: PathBuf,
}

impl CheckerConfig {
    /// Load the keyword file and the optional override file, validating the
    /// override entries before any model is scanned.
    pub fn load(
        keyword_file: &Path,
        override_file: Option<&Path>,
        report_path: impl Into<PathBuf>,
    ) -> KeywordResult<Self> {
        let reserved = read_config_file(keyword_file)?;
        let overrides = match override_file {
            Some(path) => read_config_file(path)?,
            None => OverrideLists::new(),
        };
        let config = Self {
            reserved,
            overrides,
            report_path: report_path.into(),
        };
        config.validate_overrides()?;
        Ok(config)
    }

    /// Where the CSV report for this run lands.
    pub fn report_file(&self) -> PathBuf {
        self.report_path.join("reserved_keyword_report.csv")
    }

    /// Is `model.field` on `system`'s override list?
    pub fn is_overridden(&self, system: &str, model: &str, field: &str) -> bool {
        let qualified = format!("{model}.{field}");
        self.overrides
            .get(system)
            .map_or(false, |entries| entries.iter().any(|entry| *entry == qualified))
    }

    /// Override entries must be `Model.field` with an upper-camel model name
    /// and no spaces, commas, or dashes in either part.
    fn validate_overrides(&self) -> KeywordResult<()> {
        for entries in self.overrides.values() {
            for entry in entries {
                validate_override_entry(entry)?;
            }
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> KeywordResult<BTreeMap<String, Vec<String>>> {
    tracing::info!(path = %path.display(), "loading config file");
    let raw = fs::read_to_string(path).map_err(|error| {
        KeywordError::Configuration(format!(
            "unable to load config file {}: {}",
            path.display(),
            error
        ))
    })?;
    // An absent document and `{}` both count as empty, like a blank file.
    let parsed: Option<BTreeMap<String, Vec<String>>> =
        serde_yaml::from_str(&raw).map_err(|error| {
            KeywordError::Configuration(format!(
                "unable to load config file {}: {}",
                path.display(),
                error
            ))
        })?;
    match parsed.filter(|lists| !lists.is_empty()) {
        Some(lists) => Ok(lists),
        None => Err(KeywordError::Configuration(format!(
            "config file is empty: {}",
            path.display()
        ))),
    }
}

fn validate_override_entry(entry: &str) -> KeywordResult<()> {
    let has_invalid_chars = |part: &str| part.contains([' ', ',', '-']);
    let mut parts = entry.split('.');
    let valid = match (parts.next(), parts.next(), parts.next()) {
        (Some(model), Some(field), None) => {
            model.chars().next().is_some_and(char::is_uppercase)
                && !field.is_empty()
                && !has_invalid_chars(model)
                && !has_invalid_chars(field)
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(KeywordError::Configuration(format!(
            "invalid value in override file: {entry}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const KEYWORDS: &str = "\
snowflake:
  - START
  - ROW
stitch:
  - _rjm_id
";

    #[test]
    fn test_load_without_overrides() {
        let keywords = write_temp(KEYWORDS);
        let config = CheckerConfig::load(keywords.path(), None, "reports").unwrap();
        assert_eq!(config.reserved.len(), 2);
        assert!(config.overrides.is_empty());
        assert_eq!(
            config.report_file(),
            PathBuf::from("reports/reserved_keyword_report.csv")
        );
    }

    #[test]
    fn test_load_with_valid_overrides() {
        let keywords = write_temp(KEYWORDS);
        let overrides = write_temp("snowflake:\n  - CourseRun.start\n");
        let config =
            CheckerConfig::load(keywords.path(), Some(overrides.path()), "reports").unwrap();
        assert!(config.is_overridden("snowflake", "CourseRun", "start"));
        assert!(!config.is_overridden("stitch", "CourseRun", "start"));
        assert!(!config.is_overridden("snowflake", "CourseRun", "end"));
    }

    #[test]
    fn test_empty_config_file_is_rejected() {
        for content in ["\n", "{}\n"] {
            let keywords = write_temp(content);
            let error = CheckerConfig::load(keywords.path(), None, "reports").unwrap_err();
            assert!(matches!(error, KeywordError::Configuration(_)));
            assert!(error.to_string().contains("empty"));
        }
    }

    #[test]
    fn test_missing_config_file_is_rejected() {
        let error =
            CheckerConfig::load(Path::new("no/such/file.yml"), None, "reports").unwrap_err();
        assert!(matches!(error, KeywordError::Configuration(_)));
    }

    #[test]
    fn test_override_entries_must_be_model_dot_field() {
        for entry in [
            "lowercase.field",
            "NoField",
            "Too.many.parts",
            "Bad Model.field",
            "Model.bad-field",
            "Model.bad,field",
            "Model.",
        ] {
            assert!(
                validate_override_entry(entry).is_err(),
                "expected rejection of {entry:?}"
            );
        }
        assert!(validate_override_entry("CourseRun.start").is_ok());
        assert!(validate_override_entry("HistoricalRecord.history_date").is_ok());
    }
}
