//! Executor collaborators - the boundary into framework territory
//!
//! The session never talks to the framework's migration machinery directly;
//! it drives these narrow traits, injected at construction. Production use
//! shells out to the framework's management binary through
//! [`ProcessExecutor`]; tests script the traits directly.

use std::fmt;
use std::process::Command;

use crate::plan::MigrationStep;

/// Failure raised by an executor call: the underlying error rendered as text
/// plus whatever output had been captured before the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorFailure {
    pub error: String,
    pub output: String,
}

impl fmt::Display for ExecutorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for ExecutorFailure {}

/// Applies a batch of schema migrations against one store.
///
/// This is the sole call the migration session makes into the framework:
/// one blocking invocation per batch, returning the captured textual output
/// on success. There is no cancellation; callers needing timeouts implement
/// them inside an executor.
pub trait MigrationExecutor {
    fn apply_batch(&self, steps: &[MigrationStep], database: &str)
        -> Result<String, ExecutorFailure>;
}

/// Lists the framework's migration inventory (applied and pending) for one
/// store, as the textual listing the unapplied scanner consumes.
pub trait MigrationLister {
    fn list_migrations(&self, database: &str) -> Result<String, ExecutorFailure>;
}

/// Executor that drives the framework's management binary as a subprocess.
///
/// The program and leading arguments are injectable so deployments are not
/// bound to one binary name (a `manage` entry point, a wrapper script, ...).
/// Stdout is the captured output; a non-zero exit becomes a failure carrying
/// stderr as the error text and stdout as the partial output.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    program: String,
    base_args: Vec<String>,
}

impl ProcessExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
        }
    }

    /// Arguments placed before every subcommand, e.g. a settings flag the
    /// management binary needs on each call.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args.extend(args.into_iter().map(Into::into));
        self
    }

    fn run(&self, args: &[&str]) -> Result<String, ExecutorFailure> {
        tracing::debug!(program = %self.program, ?args, "invoking migration executor");
        let output = Command::new(&self.program)
            .args(&self.base_args)
            .args(args)
            .output()
            .map_err(|error| ExecutorFailure {
                error: format!("failed to spawn '{}': {}", self.program, error),
                output: String::new(),
            })?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            Ok(stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ExecutorFailure {
                error: format!(
                    "'{}' exited with {}: {}",
                    self.program,
                    output.status,
                    stderr.trim()
                ),
                output: stdout,
            })
        }
    }
}

impl MigrationExecutor for ProcessExecutor {
    fn apply_batch(
        &self,
        _steps: &[MigrationStep],
        database: &str,
    ) -> Result<String, ExecutorFailure> {
        // One framework invocation applies the whole pending graph; the
        // plan's step list is the session's expectation of what that graph
        // contains, not something this executor re-plans.
        self.run(&["migrate", "--database", database, "--no-input"])
    }
}

impl MigrationLister for ProcessExecutor {
    fn list_migrations(&self, database: &str) -> Result<String, ExecutorFailure> {
        self.run(&["show-migrations", "--database", database])
    }
}
