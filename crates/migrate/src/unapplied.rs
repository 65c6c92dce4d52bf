//! Unapplied-migration scanning
//!
//! Turns the framework's migration inventory listing (component headers on
//! unindented lines, `[X]`/`[ ]` entries beneath them) into a report that is
//! deliberately shaped like a plan document: `migrations` lists what is
//! pending, `initial_states` the rollback baseline each component would need,
//! so a release pipeline can feed the report straight back into a run.

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, MigrateResult};
use crate::executor::MigrationLister;
use crate::plan::{InitialState, MigrationStep};
use crate::status;

/// Unapplied migrations for one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnappliedReport {
    pub database: String,
    /// Pending steps, in listing order.
    pub migrations: Vec<MigrationStep>,
    /// Last applied migration per component with pending steps, or `"zero"`.
    pub initial_states: Vec<InitialState>,
}

impl UnappliedReport {
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub fn to_yaml(&self) -> MigrateResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[derive(Default)]
struct ComponentEntries {
    name: String,
    applied: Vec<String>,
    unapplied: Vec<String>,
}

/// Parse a migration inventory listing for `database`.
///
/// Component names sit on unindented lines; their migrations follow,
/// indented, as `[X] name` (applied) or `[ ] name` (pending). Anything else
/// beneath a header (e.g. `(no migrations)`) is skipped. ANSI escapes are
/// stripped before matching.
pub fn scan_listing(database: &str, listing: &str) -> UnappliedReport {
    let mut components: Vec<ComponentEntries> = Vec::new();
    for raw in listing.lines() {
        let line = status::strip_ansi(raw);
        if line.trim().is_empty() {
            continue;
        }
        if !line.starts_with(' ') {
            components.push(ComponentEntries {
                name: line.trim().to_string(),
                ..Default::default()
            });
            continue;
        }
        let Some(current) = components.last_mut() else {
            continue;
        };
        let entry = line.trim();
        if let Some(name) = entry.strip_prefix("[X] ") {
            current.applied.push(name.trim().to_string());
        } else if let Some(name) = entry.strip_prefix("[ ] ") {
            current.unapplied.push(name.trim().to_string());
        }
    }

    let mut report = UnappliedReport {
        database: database.to_string(),
        migrations: Vec::new(),
        initial_states: Vec::new(),
    };
    for component in components {
        if component.unapplied.is_empty() {
            continue;
        }
        for migration in &component.unapplied {
            report
                .migrations
                .push(MigrationStep::new(&component.name, migration));
        }
        let baseline = component
            .applied
            .last()
            .cloned()
            .unwrap_or_else(|| "zero".to_string());
        report
            .initial_states
            .push(InitialState::new(&component.name, baseline));
    }
    report
}

/// Scan one store through the injected lister.
pub fn scan_store<L: MigrationLister>(lister: &L, database: &str) -> MigrateResult<UnappliedReport> {
    let listing = lister
        .list_migrations(database)
        .map_err(|failure| MigrateError::Inventory {
            database: database.to_string(),
            error: failure.error,
        })?;
    let report = scan_listing(database, &listing);
    tracing::info!(
        database,
        unapplied = report.migrations.len(),
        "scanned migration inventory"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutorFailure;

    const LISTING: &str = "\
orders
 [X] 0001_initial
 [X] 0002_add_index
 [ ] 0003_backfill
billing
 [ ] 0001_initial
 [ ] 0002_second
sessions
 [X] 0001_initial
contenttypes
 (no migrations)
";

    #[test]
    fn test_scan_collects_pending_steps_in_listing_order() {
        let report = scan_listing("default", LISTING);
        assert_eq!(
            report.migrations,
            vec![
                MigrationStep::new("orders", "0003_backfill"),
                MigrationStep::new("billing", "0001_initial"),
                MigrationStep::new("billing", "0002_second"),
            ]
        );
    }

    #[test]
    fn test_scan_derives_rollback_baselines() {
        let report = scan_listing("default", LISTING);
        assert_eq!(
            report.initial_states,
            vec![
                InitialState::new("orders", "0002_add_index"),
                InitialState::new("billing", "zero"),
            ]
        );
    }

    #[test]
    fn test_fully_applied_store_yields_empty_report() {
        let listing = "orders\n [X] 0001_initial\n";
        let report = scan_listing("default", listing);
        assert!(report.is_empty());
        assert!(report.initial_states.is_empty());
    }

    #[test]
    fn test_ansi_escaped_listing_scans_like_plain() {
        let colored = "\x1b[1morders\x1b[0m\n \x1b[31m[ ] 0001_initial\x1b[0m\n";
        let report = scan_listing("default", colored);
        assert_eq!(report.migrations, vec![MigrationStep::new("orders", "0001_initial")]);
        assert_eq!(report.initial_states, vec![InitialState::new("orders", "zero")]);
    }

    #[test]
    fn test_report_doubles_as_plan_document() {
        let report = scan_listing("default", LISTING);
        let rendered = report.to_yaml().unwrap();
        let plan = crate::plan::MigrationPlan::from_yaml(&rendered).unwrap();
        assert_eq!(plan.migrations, report.migrations);
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_scan_store_wraps_lister_failures() {
        struct DownLister;
        impl MigrationLister for DownLister {
            fn list_migrations(&self, _database: &str) -> Result<String, ExecutorFailure> {
                Err(ExecutorFailure {
                    error: "cannot connect to database".to_string(),
                    output: String::new(),
                })
            }
        }
        let error = scan_store(&DownLister, "replica").unwrap_err();
        assert!(matches!(error, MigrateError::Inventory { .. }));
        assert!(error.to_string().contains("replica"));
    }
}
