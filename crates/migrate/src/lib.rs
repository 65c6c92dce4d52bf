//! # relkit-migrate: batched schema-migration orchestration
//!
//! Applies an ordered migration plan through the host framework's migration
//! tooling in one batch, records per-migration success/failure/timing, and
//! derives the rollback directives needed to restore each component's
//! initial state. The framework itself stays behind the narrow collaborator
//! traits in [`executor`]; everything here is synchronous and runs a plan
//! exactly once per session.

pub mod error;
pub mod executor;
pub mod plan;
pub mod report;
pub mod session;
pub mod status;
pub mod unapplied;

// Re-export core types
pub use error::{MigrateError, MigrateResult};
pub use executor::{ExecutorFailure, MigrationExecutor, MigrationLister, ProcessExecutor};
pub use plan::{InitialState, MigrationPlan, MigrationStep};
pub use report::{AppliedMigration, FailedMigration, MigrationReport, RollbackDirective};
pub use session::{MigrationSession, SessionState};
pub use unapplied::{scan_listing, scan_store, UnappliedReport};
