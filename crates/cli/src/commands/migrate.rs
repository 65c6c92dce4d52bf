use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use relkit_migrate::{
    scan_store, MigrateError, MigrationPlan, MigrationSession, ProcessExecutor,
};

/// Apply the plan as one batch. The result document goes to stdout (and the
/// optional output file) on the success and failure paths alike; the exit
/// code reports which path was taken.
pub fn run(
    plan_path: &Path,
    database: &str,
    manage: &str,
    output_file: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let plan = MigrationPlan::from_file(plan_path)
        .with_context(|| format!("loading migration plan {}", plan_path.display()))?;
    let executor = ProcessExecutor::new(manage);
    let mut session = MigrationSession::new(plan, database, executor)?;

    let failure = match session.apply_all() {
        Ok(()) => None,
        Err(error @ MigrateError::ExecutionFailed { .. }) => Some(error),
        Err(error) => return Err(error.into()),
    };

    let report = session.report();
    report.write_to(&mut io::stdout().lock())?;
    if let Some(path) = output_file {
        report
            .write_to_file(path)
            .with_context(|| format!("writing result document {}", path.display()))?;
    }

    match failure {
        None => Ok(ExitCode::SUCCESS),
        Some(error) => {
            eprintln!("Migration error: {error}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Inspect each store's migration inventory and emit one report document per
/// store. Only `--fail-on-unapplied` turns pending migrations into a failing
/// exit code; an unreachable store always fails.
pub fn show_unapplied(
    databases: &[String],
    manage: &str,
    fail_on_unapplied: bool,
) -> anyhow::Result<ExitCode> {
    let executor = ProcessExecutor::new(manage);
    let mut stdout = io::stdout().lock();
    let mut any_unapplied = false;
    for (index, database) in databases.iter().enumerate() {
        let report = scan_store(&executor, database)?;
        any_unapplied |= !report.is_empty();
        if index > 0 {
            writeln!(stdout, "---")?;
        }
        stdout.write_all(report.to_yaml()?.as_bytes())?;
    }

    if any_unapplied && fail_on_unapplied {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
