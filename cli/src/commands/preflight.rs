//! `agentdeploy preflight` — decide whether a deployment may proceed.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use agentdeploy_common::{DeploymentTarget, Region, validate_targets};

use crate::app::AppContext;
use crate::application::services::preflight::{
    BootstrapCheck, PreflightVerdict, check_bootstrap_needed, check_stack_deployability,
};
use crate::output::{json, progress};

/// Arguments for the preflight command.
#[derive(Args, Debug)]
pub struct PreflightArgs {
    /// Region the stacks live in
    #[arg(long)]
    pub region: Region,

    /// Stack to check; repeat to check several, in order
    #[arg(long = "stack", required = true)]
    pub stacks: Vec<String>,

    /// Deployment targets file (JSON array) to check for bootstrap
    #[arg(long)]
    pub targets: Option<PathBuf>,
}

/// Everything `preflight --json` prints.
#[derive(Debug, Serialize)]
pub struct PreflightReport {
    pub region: Region,
    pub stacks: PreflightVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<BootstrapCheck>,
}

/// Read and validate a deployment targets file.
///
/// # Errors
///
/// Returns an error if the file is unreadable, malformed or invalid.
pub fn load_targets(path: &Path) -> Result<Vec<DeploymentTarget>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let targets: Vec<DeploymentTarget> = serde_json::from_str(&content)
        .with_context(|| format!("cannot parse {}", path.display()))?;
    validate_targets(&targets)?;
    Ok(targets)
}

/// Run the preflight command. Exits non-zero when a stack blocks.
///
/// # Errors
///
/// Returns an error if the targets file is invalid or a stack query fails.
pub async fn run(app: &AppContext, args: &PreflightArgs) -> Result<ExitCode> {
    let targets = args.targets.as_deref().map(load_targets).transpose()?;
    let describer = app.stack_describer().await;

    let pb = progress::spinner(&app.output, "checking stack status...");
    let verdict = check_stack_deployability(&describer, args.region.as_str(), &args.stacks).await;
    progress::finish(&pb);
    let verdict = verdict?;

    let bootstrap = match &targets {
        Some(targets) => {
            let pb = progress::spinner(&app.output, "checking bootstrap status...");
            let check = check_bootstrap_needed(&describer, targets).await;
            progress::finish(&pb);
            Some(check)
        }
        None => None,
    };

    let exit = if verdict.can_deploy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    };

    if app.is_json() {
        json::print(&PreflightReport {
            region: args.region,
            stacks: verdict,
            bootstrap,
        })?;
    } else {
        app.renderer().render_preflight(&verdict, bootstrap.as_ref());
    }
    Ok(exit)
}
