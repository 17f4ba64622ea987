//! `agentdeploy doctor` — check build tool prerequisites.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use agentdeploy_common::{Language, RuntimeDescriptor};

use crate::app::AppContext;
use crate::application::services::requirements::check_dependency_versions;
use crate::output::json;

/// Arguments for the doctor command.
#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Runtimes to check tools for; all languages when omitted
    #[arg(long = "runtime")]
    pub runtimes: Vec<RuntimeDescriptor>,
}

/// One descriptor per language, for checking every tool.
fn all_languages() -> Vec<RuntimeDescriptor> {
    [Language::Python, Language::Node]
        .into_iter()
        .filter_map(|lang| {
            let version = lang.supported_versions().last()?;
            RuntimeDescriptor::new(lang, version).ok()
        })
        .collect()
}

/// Run the doctor command. Exits non-zero when a tool is missing or too old.
///
/// # Errors
///
/// Returns an error if JSON output cannot be produced.
pub async fn run(app: &AppContext, args: &DoctorArgs) -> Result<ExitCode> {
    let runtimes = if args.runtimes.is_empty() {
        all_languages()
    } else {
        args.runtimes.clone()
    };
    let report = check_dependency_versions(&app.runner, &runtimes).await;

    if app.is_json() {
        json::print(&report)?;
    } else {
        app.renderer().render_doctor(&report);
    }
    Ok(if report.satisfied() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
