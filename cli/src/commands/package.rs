//! `agentdeploy package` — build a deployable code artifact.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use agentdeploy_common::RuntimeDescriptor;

use crate::app::AppContext;
use crate::application::services::packaging::{CodeArtifactPackager, PackagerOptions};
use crate::domain::packaging::{PackagingRequest, default_output_path, default_staging_dir};
use crate::output::json;

/// Arguments for the package command.
#[derive(Args, Debug)]
pub struct PackageArgs {
    /// Project directory containing pyproject.toml or package.json
    #[arg(long, default_value = ".")]
    pub source: PathBuf,

    /// Runtime, e.g. PYTHON_3_12 or NODE_20
    #[arg(long)]
    pub runtime: RuntimeDescriptor,

    /// Artifact name (defaults to the source directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Staging directory (wiped before use)
    #[arg(long)]
    pub staging: Option<PathBuf>,

    /// Output zip path
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Archive the source without installing dependencies
    #[arg(long)]
    pub skip_install: bool,
}

/// Artifact name from the flag, else the source directory's name.
fn resolve_name(args: &PackageArgs, source: &Path) -> String {
    args.name.clone().unwrap_or_else(|| {
        source
            .file_name()
            .map_or_else(|| "agent".to_string(), |n| n.to_string_lossy().into_owned())
    })
}

/// Build the packaging request, filling in default paths.
///
/// # Errors
///
/// Returns an error if the source directory cannot be resolved.
pub fn build_request(args: &PackageArgs) -> Result<PackagingRequest> {
    let source = args
        .source
        .canonicalize()
        .with_context(|| format!("source directory {} not found", args.source.display()))?;
    let artifact_name = resolve_name(args, &source);
    Ok(PackagingRequest {
        staging_dir: args
            .staging
            .clone()
            .unwrap_or_else(|| default_staging_dir(&source, &artifact_name)),
        output_path: args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&source, &artifact_name)),
        runtime: args.runtime.clone(),
        source_dir: source,
        artifact_name,
    })
}

/// Run the package command.
///
/// # Errors
///
/// Returns an error if packaging fails.
pub async fn run(app: &AppContext, args: &PackageArgs) -> Result<ExitCode> {
    let request = build_request(args)?;
    let options = PackagerOptions {
        skip_install: args.skip_install || app.config.packaging.skip_install,
    };
    let packager = CodeArtifactPackager::new(&app.runner, &app.artifact_fs, options);

    app.output.header(&format!(
        "Packaging {} ({})",
        request.artifact_name, request.runtime
    ));
    let result = packager
        .package(&request, &app.reporter())
        .await
        .with_context(|| format!("packaging {}", request.artifact_name))?;

    if app.is_json() {
        json::print(&result)?;
    } else {
        app.renderer().render_packaging(&result);
    }
    Ok(ExitCode::SUCCESS)
}
