//! Migration Plan - the ordered batch to apply plus rollback baselines
//!
//! A plan document carries two top-level keys: `migrations`, the ordered
//! `[component, migration]` pairs to apply, and `initial_states`, one
//! `[component, migration_or_"zero"]` entry per component to roll back to.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, MigrateResult};

/// A single migration to apply, addressed as a (component, migration) pair.
///
/// Both identifiers are opaque strings owned by the framework; ordering
/// between migrations of one component is taken from the plan's input order
/// and never recomputed here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct MigrationStep {
    pub component: String,
    pub migration: String,
}

impl MigrationStep {
    pub fn new(component: impl Into<String>, migration: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            migration: migration.into(),
        }
    }
}

impl From<(String, String)> for MigrationStep {
    fn from((component, migration): (String, String)) -> Self {
        Self {
            component,
            migration,
        }
    }
}

impl From<MigrationStep> for (String, String) {
    fn from(step: MigrationStep) -> Self {
        (step.component, step.migration)
    }
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component, self.migration)
    }
}

/// The migration state one component is rolled back to, where the literal
/// `"zero"` means "before any migration".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct InitialState {
    pub component: String,
    pub migration: String,
}

impl InitialState {
    pub fn new(component: impl Into<String>, migration: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            migration: migration.into(),
        }
    }
}

impl From<(String, String)> for InitialState {
    fn from((component, migration): (String, String)) -> Self {
        Self {
            component,
            migration,
        }
    }
}

impl From<InitialState> for (String, String) {
    fn from(state: InitialState) -> Self {
        (state.component, state.migration)
    }
}

/// An ordered migration batch plus per-component rollback baselines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationPlan {
    pub migrations: Vec<MigrationStep>,
    pub initial_states: Vec<InitialState>,
}

impl MigrationPlan {
    pub fn from_yaml(yaml: &str) -> MigrateResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> MigrateResult<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    /// Structural validation, run before any executor call.
    ///
    /// An empty `migrations` list is a valid no-op plan. Empty identifiers
    /// are rejected, and every component referenced by a step must have
    /// exactly one initial-state entry.
    pub fn validate(&self) -> MigrateResult<()> {
        for state in &self.initial_states {
            if state.component.is_empty() || state.migration.is_empty() {
                return Err(MigrateError::Configuration(format!(
                    "malformed initial state entry ['{}', '{}']",
                    state.component, state.migration
                )));
            }
        }
        for step in &self.migrations {
            if step.component.is_empty() || step.migration.is_empty() {
                return Err(MigrateError::Configuration(format!(
                    "malformed migration step ['{}', '{}']",
                    step.component, step.migration
                )));
            }
            match self.initial_state_count(&step.component) {
                0 => {
                    return Err(MigrateError::Configuration(format!(
                        "component '{}' not found in initial migration states",
                        step.component
                    )))
                }
                1 => {}
                n => {
                    return Err(MigrateError::Configuration(format!(
                        "component '{}' has {} initial migration states, expected exactly one",
                        step.component, n
                    )))
                }
            }
        }
        Ok(())
    }

    /// The rollback baseline recorded for `component`, if any.
    pub fn initial_state_for(&self, component: &str) -> Option<&InitialState> {
        self.initial_states
            .iter()
            .find(|state| state.component == component)
    }

    fn initial_state_count(&self, component: &str) -> usize {
        self.initial_states
            .iter()
            .filter(|state| state.component == component)
            .count()
    }
}
