//! CSV report emission for detected violations.

use std::fs;
use std::path::Path;

use crate::checker::Violation;
use crate::error::KeywordResult;

/// Write one row per violation to `path`, creating parent directories as
/// needed. Overridden violations are included; the report is the audit
/// trail, not the pass/fail verdict.
pub fn write_report(violations: &[Violation], path: &Path) -> KeywordResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for violation in violations {
        writer.write_record(violation.report_row())?;
    }
    writer.flush()?;
    tracing::info!(
        path = %path.display(),
        violations = violations.len(),
        "wrote reserved keyword report"
    );
    Ok(())
}
