//! Migration Result - the session's terminal outcome as a document
//!
//! Serializes as `{success, failure|null, unapplied, rollback_commands}` and
//! is a pure read view: emitting it any number of times never touches the
//! session.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MigrateResult;
use crate::plan::MigrationStep;

/// A successfully applied step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedMigration {
    pub migration: MigrationStep,
    /// Elapsed seconds for the batch this step ran in. Absent when the
    /// outcome was recovered from a failed batch's output, where only the
    /// step's status line is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub output: String,
}

/// The step the batch failed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedMigration {
    pub migration: MigrationStep,
    /// Elapsed seconds from batch start to the executor raising.
    pub duration: f64,
    /// Full output captured up to the failure.
    pub output: String,
    /// The executor's error rendered as text.
    pub error: String,
}

/// Directive returning one component to its recorded initial state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct RollbackDirective {
    pub component: String,
    pub migration: String,
}

impl From<(String, String)> for RollbackDirective {
    fn from((component, migration): (String, String)) -> Self {
        Self {
            component,
            migration,
        }
    }
}

impl From<RollbackDirective> for (String, String) {
    fn from(directive: RollbackDirective) -> Self {
        (directive.component, directive.migration)
    }
}

/// Structured record of a finished migration session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Steps that applied, in plan order.
    pub success: Vec<AppliedMigration>,
    /// The at-most-one step the batch failed on.
    pub failure: Option<FailedMigration>,
    /// Steps never reached, in plan order.
    pub unapplied: Vec<MigrationStep>,
    /// One directive per touched component, in first-touched order.
    pub rollback_commands: Vec<RollbackDirective>,
}

impl MigrationReport {
    pub fn to_yaml(&self) -> MigrateResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn write_to(&self, sink: &mut dyn Write) -> MigrateResult<()> {
        sink.write_all(self.to_yaml()?.as_bytes())?;
        Ok(())
    }

    pub fn write_to_file(&self, path: &Path) -> MigrateResult<()> {
        fs::write(path, self.to_yaml()?)?;
        tracing::info!(path = %path.display(), "wrote migration report");
        Ok(())
    }
}
