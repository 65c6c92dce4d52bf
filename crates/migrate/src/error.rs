//! Error types for migration orchestration.

use thiserror::Error;

use crate::plan::MigrationStep;

/// Result type alias for migration operations
pub type MigrateResult<T> = Result<T, MigrateError>;

#[derive(Debug, Error)]
pub enum MigrateError {
    /// The plan is structurally invalid: malformed step, missing or duplicate
    /// initial-state entry. Raised before any executor call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The executor raised while applying the batch. Carries the failed step
    /// identity when one could be attributed from the captured output.
    #[error("{}", failed_step_message(.step))]
    ExecutionFailed { step: Option<MigrationStep> },

    /// `apply_all` was called on a session that already ran its plan.
    #[error("Invalid session state: {0}")]
    InvalidState(String),

    /// The migration inventory for a store could not be read.
    #[error("Unable to check migrations for store '{database}': {error}")]
    Inventory { database: String, error: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn failed_step_message(step: &Option<MigrationStep>) -> String {
    match step {
        Some(step) => format!(
            "Migration failed for component '{}' - migration '{}'",
            step.component, step.migration
        ),
        None => "Migration batch failed after every queued step reported OK".to_string(),
    }
}
