//! Reserved-keyword violation detection
//!
//! A violation is a (model, field, system) triple where the field's column
//! name appears on the system's reserved list. Overridden violations are
//! still detected and reported; they just don't fail the run.

use std::fmt;

use crate::config::CheckerConfig;
use crate::model::{ModelManifest, ModelSpec};

/// A model field whose column name conflicts with a downstream system's
/// reserved keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub system: String,
    pub component: String,
    pub module: String,
    pub model: String,
    pub field: String,
    /// Contributed by a parent model rather than the model's own definition.
    pub inherited: bool,
    /// Found in a locally defined component, not a third-party dependency.
    pub local: bool,
    /// On the override list: reported, but does not fail the check.
    pub overridden: bool,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} conflict in {}:{}:{}.{}",
            self.system, self.component, self.module, self.model, self.field
        )
    }
}

impl Violation {
    /// One CSV row: system, app source, component, module, model, field, and
    /// whether the field was defined on the model or inherited.
    pub fn report_row(&self) -> [String; 7] {
        [
            self.system.clone(),
            if self.local { "Local" } else { "3rd party" }.to_string(),
            self.component.clone(),
            self.module.clone(),
            self.model.clone(),
            self.field.clone(),
            if self.inherited {
                "Inherited"
            } else {
                "Class Definition"
            }
            .to_string(),
        ]
    }
}

/// Check one model's fields against every system's reserved list.
pub fn check_model(
    manifest: &ModelManifest,
    model: &ModelSpec,
    config: &CheckerConfig,
) -> Vec<Violation> {
    let local = manifest.is_local();
    let mut violations = Vec::new();
    for field in &model.fields {
        for (system, keywords) in &config.reserved {
            if !keywords.iter().any(|keyword| *keyword == field.name) {
                continue;
            }
            let violation = Violation {
                system: system.clone(),
                component: manifest.component.clone(),
                module: manifest.module.clone(),
                model: model.name.clone(),
                field: field.name.clone(),
                inherited: field.inherited,
                local,
                overridden: config.is_overridden(system, &model.name, &field.name),
            };
            if violation.overridden {
                tracing::warn!(%violation, "violation detected but on override list");
            } else {
                tracing::error!(%violation, "violation detected");
            }
            violations.push(violation);
        }
    }
    violations
}

/// Check every model of every manifest, in manifest order.
pub fn check_manifests(manifests: &[ModelManifest], config: &CheckerConfig) -> Vec<Violation> {
    let mut violations = Vec::new();
    for manifest in manifests {
        for model in &manifest.models {
            violations.extend(check_model(manifest, model, config));
        }
    }
    violations
}

/// The violations that actually fail a check run.
pub fn blocking_violations(violations: &[Violation]) -> Vec<&Violation> {
    violations.iter().filter(|v| !v.overridden).collect()
}
