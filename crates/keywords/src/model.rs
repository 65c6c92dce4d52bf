//! Model manifests - the application's concrete models as data
//!
//! The framework exports one manifest per schema-owning component; the
//! checker consumes those documents instead of reaching into a live
//! application registry, so it can run against any checkout without booting
//! the application.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KeywordError, KeywordResult};

/// Manifest for one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelManifest {
    /// Schema-owning component (historically the "app").
    pub component: String,
    /// Source module the models live in, relative to the project root.
    pub module: String,
    #[serde(default)]
    pub models: Vec<ModelSpec>,
}

/// One concrete model: it has a table, so its columns reach downstream
/// systems.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Column name as it reaches the database.
    pub name: String,
    /// Declared type; informational only.
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    /// True when the field is contributed by a parent model rather than the
    /// model's own definition.
    #[serde(default)]
    pub inherited: bool,
}

impl ModelManifest {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Whether the manifest's module exists in the working tree. Absent
    /// modules belong to third-party components pulled in as dependencies.
    pub fn is_local(&self) -> bool {
        Path::new(&self.module).is_file()
    }
}

/// Load every `.yml`/`.yaml` manifest under `dir`, sorted by file name.
pub fn load_manifests(dir: &Path) -> KeywordResult<Vec<ModelManifest>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map_or(false, |ext| ext == "yml" || ext == "yaml")
        })
        .collect();
    paths.sort();

    let mut manifests = Vec::with_capacity(paths.len());
    for path in paths {
        let raw = fs::read_to_string(&path)?;
        let manifest = ModelManifest::from_yaml(&raw).map_err(|error| {
            KeywordError::Configuration(format!(
                "invalid model manifest {}: {}",
                path.display(),
                error
            ))
        })?;
        tracing::debug!(
            path = %path.display(),
            component = %manifest.component,
            models = manifest.models.len(),
            "loaded model manifest"
        );
        manifests.push(manifest);
    }
    Ok(manifests)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "\
component: orders
module: src/models/orders.rs
models:
  - name: Order
    fields:
      - name: id
        type: uuid
      - name: start
        type: timestamp
      - name: created_at
        inherited: true
";

    #[test]
    fn test_manifest_parses_fields_and_flags() {
        let manifest = ModelManifest::from_yaml(MANIFEST).unwrap();
        assert_eq!(manifest.component, "orders");
        assert_eq!(manifest.models.len(), 1);
        let order = &manifest.models[0];
        assert_eq!(order.fields[1].name, "start");
        assert!(!order.fields[1].inherited);
        assert!(order.fields[2].inherited);
        assert_eq!(order.fields[2].field_type, None);
    }

    #[test]
    fn test_load_manifests_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_orders.yml"), MANIFEST).unwrap();
        std::fs::write(
            dir.path().join("a_billing.yaml"),
            "component: billing\nmodule: src/models/billing.rs\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a manifest").unwrap();

        let manifests = load_manifests(dir.path()).unwrap();
        assert_eq!(manifests.len(), 2);
        assert_eq!(manifests[0].component, "billing");
        assert_eq!(manifests[1].component, "orders");
    }

    #[test]
    fn test_invalid_manifest_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.yml"), "component: [not, a, string]\n").unwrap();
        let error = load_manifests(dir.path()).unwrap_err();
        assert!(matches!(error, KeywordError::Configuration(_)));
    }

    #[test]
    fn test_missing_module_marks_manifest_third_party() {
        let manifest = ModelManifest::from_yaml(
            "component: vendored\nmodule: vendor/does/not/exist.rs\n",
        )
        .unwrap();
        assert!(!manifest.is_local());
    }
}
