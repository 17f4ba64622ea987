//! Application service — build tool prerequisite checks.

use tracing::debug;

use agentdeploy_common::RuntimeDescriptor;

use crate::application::ports::CommandRunner;
use crate::domain::requirements::{DependencyReport, evaluate_requirement, requirements_for};

/// Check that the tools needed to package `runtimes` are installed and new
/// enough. Tools that are not needed are not run.
pub async fn check_dependency_versions(
    runner: &impl CommandRunner,
    runtimes: &[RuntimeDescriptor],
) -> DependencyReport {
    let mut report = DependencyReport::default();
    for req in requirements_for(runtimes) {
        let output = runner.run(req.binary, &["--version"], None).await;
        debug!(binary = req.binary, code = output.code, "checked tool version");
        let version_output = output.success().then_some(output.stdout.as_str());
        let (check, error) = evaluate_requirement(&req, version_output);
        report.checks.push(check);
        report.errors.extend(error);
    }
    report
}
