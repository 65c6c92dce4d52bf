use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use console::style;
use relkit_keywords::{
    blocking_violations, check_manifests, load_manifests, write_report, CheckerConfig,
};

/// Scan every model manifest against the reserved keyword lists, write the
/// CSV report, and fail the run iff a non-overridden conflict was found.
pub fn check(
    models_dir: &Path,
    keyword_file: &Path,
    override_file: Option<&Path>,
    report_path: &Path,
) -> anyhow::Result<ExitCode> {
    let config = CheckerConfig::load(keyword_file, override_file, report_path)?;
    let manifests = load_manifests(models_dir)
        .with_context(|| format!("loading model manifests from {}", models_dir.display()))?;
    println!(
        "Checking {} model manifest(s) for reserved keyword conflicts",
        manifests.len()
    );

    let violations = check_manifests(&manifests, &config);
    for violation in &violations {
        if violation.overridden {
            println!(
                "{}",
                style(format!("Violation detected but on override list: {violation}")).yellow()
            );
        } else {
            println!("{}", style(format!("Violation detected: {violation}")).red());
        }
    }

    let report_file = config.report_file();
    write_report(&violations, &report_file)
        .with_context(|| format!("writing report {}", report_file.display()))?;
    println!(
        "Wrote {} violation(s) to {}",
        violations.len(),
        report_file.display()
    );

    if blocking_violations(&violations).is_empty() {
        println!("No reserved keyword conflicts detected");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", style("Found reserved keyword conflicts!").red());
        Ok(ExitCode::FAILURE)
    }
}
