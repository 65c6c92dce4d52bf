//! Migration Session - applies a plan as one batch and tracks every outcome
//!
//! The session is the only stateful piece of the crate: it consumes a
//! validated plan, drives the injected executor exactly once, and sorts
//! every step into the success/failure/unapplied buckets that make up the
//! final report, together with the rollback directives needed to restore
//! each touched component's initial state.

use std::collections::VecDeque;
use std::time::Instant;

use crate::error::{MigrateError, MigrateResult};
use crate::executor::{ExecutorFailure, MigrationExecutor};
use crate::plan::{MigrationPlan, MigrationStep};
use crate::report::{AppliedMigration, FailedMigration, MigrationReport, RollbackDirective};
use crate::status;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, not yet applied.
    Pending,
    /// Inside `apply_all` (transient).
    Running,
    /// Every step applied.
    Succeeded,
    /// The batch failed; outcomes were recovered from its output.
    Failed,
}

/// Applies a migration plan against one store while keeping track of the
/// state of each migration.
///
/// A session runs its plan synchronously, once. After `apply_all` returns
/// the session is terminal and only the report accessor is useful.
#[derive(Debug)]
pub struct MigrationSession<E> {
    executor: E,
    database: String,
    plan: MigrationPlan,
    to_apply: VecDeque<MigrationStep>,
    state: SessionState,
    report: MigrationReport,
}

impl<E: MigrationExecutor> MigrationSession<E> {
    /// Build a session over `plan` targeting `database`.
    ///
    /// The plan is validated up front; no executor call happens here.
    pub fn new(plan: MigrationPlan, database: impl Into<String>, executor: E) -> MigrateResult<Self> {
        plan.validate()?;
        Ok(Self {
            to_apply: plan.migrations.iter().cloned().collect(),
            plan,
            database: database.into(),
            executor,
            state: SessionState::Pending,
            report: MigrationReport::default(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The structured outcome. Meaningful once the session is terminal;
    /// reading it never mutates the session.
    pub fn report(&self) -> &MigrationReport {
        &self.report
    }

    /// True while steps remain unconsumed.
    pub fn more_to_apply(&self) -> bool {
        !self.to_apply.is_empty()
    }

    /// Apply the whole plan in a single executor invocation.
    ///
    /// On success every step lands in the success bucket with the batch
    /// duration and output attached (per-step durations are not
    /// distinguishable in a batched run). On failure, per-step outcomes are
    /// recovered from the captured output and the error is re-raised with
    /// the failed step identity. Either way the session is then terminal:
    /// calling this again fails fast without touching the first result.
    pub fn apply_all(&mut self) -> MigrateResult<()> {
        if self.state != SessionState::Pending {
            return Err(MigrateError::InvalidState(format!(
                "apply_all called on a session that already ran its plan ({:?})",
                self.state
            )));
        }
        self.state = SessionState::Running;

        let steps: Vec<MigrationStep> = self.to_apply.iter().cloned().collect();
        tracing::info!(
            steps = steps.len(),
            database = %self.database,
            "applying migration batch"
        );
        let start = Instant::now();
        match self.executor.apply_batch(&steps, &self.database) {
            Ok(output) => {
                let duration = start.elapsed().as_secs_f64();
                while let Some(step) = self.to_apply.pop_front() {
                    self.report.success.push(AppliedMigration {
                        migration: step,
                        duration: Some(duration),
                        output: output.clone(),
                    });
                }
                self.add_rollback_directives()?;
                self.state = SessionState::Succeeded;
                tracing::info!(applied = self.report.success.len(), "migration batch succeeded");
                Ok(())
            }
            Err(failure) => {
                let duration = start.elapsed().as_secs_f64();
                let failed_step = self.recover_outcomes(&failure, duration);
                self.add_rollback_directives()?;
                self.state = SessionState::Failed;
                tracing::error!(step = ?failed_step, "migration batch failed");
                Err(MigrateError::ExecutionFailed { step: failed_step })
            }
        }
    }

    /// Reclassify queued steps from a failed batch's captured output.
    ///
    /// Leading `OK` status lines are successes, consumed from the front of
    /// the queue in order; the first non-`OK` status line marks the failure;
    /// everything still queued afterwards was never reached. A failure with
    /// no status line at all (a pre-flight error) is charged to the first
    /// queued step.
    fn recover_outcomes(
        &mut self,
        failure: &ExecutorFailure,
        duration: f64,
    ) -> Option<MigrationStep> {
        let mut failed_step = None;
        for line in status::scan_status_lines(&failure.output) {
            let Some(step) = self.to_apply.pop_front() else {
                break;
            };
            if line.ok {
                self.report.success.push(AppliedMigration {
                    migration: step,
                    duration: None,
                    output: line.line,
                });
            } else {
                failed_step = Some(step);
                break;
            }
        }
        if failed_step.is_none() {
            // No status line singled a step out; if anything is still queued
            // the batch must have died before reaching it.
            failed_step = self.to_apply.pop_front();
        }
        if let Some(step) = &failed_step {
            self.report.failure = Some(FailedMigration {
                migration: step.clone(),
                duration,
                output: failure.output.clone(),
                error: failure.error.clone(),
            });
        }
        while let Some(step) = self.to_apply.pop_front() {
            self.report.unapplied.push(step);
        }
        failed_step
    }

    /// One rollback directive per component with a success outcome, plus the
    /// failed component, in the order components first became relevant and
    /// each component at most once.
    fn add_rollback_directives(&mut self) -> MigrateResult<()> {
        let mut components: Vec<String> = Vec::new();
        for applied in &self.report.success {
            if !components.contains(&applied.migration.component) {
                components.push(applied.migration.component.clone());
            }
        }
        if let Some(failed) = &self.report.failure {
            if !components.contains(&failed.migration.component) {
                components.push(failed.migration.component.clone());
            }
        }

        let mut directives = Vec::with_capacity(components.len());
        for component in &components {
            let initial = self.plan.initial_state_for(component).ok_or_else(|| {
                MigrateError::Configuration(format!(
                    "component '{component}' not found in initial migration states"
                ))
            })?;
            directives.push(RollbackDirective {
                component: initial.component.clone(),
                migration: initial.migration.clone(),
            });
        }
        self.report.rollback_commands = directives;
        Ok(())
    }
}
