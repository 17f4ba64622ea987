//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed document on
//! stdout: the command's result on success, the error object on failure.

use anyhow::{Context, Result};
use serde::Serialize;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Print a command result as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print(value: &impl Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{text}");
    Ok(())
}

/// Stable machine-readable code for the error object.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    use agentdeploy_common::{RuntimeError, TargetError};

    use crate::domain::error::{ConfigError, PackagingError};

    if let Some(e) = err.downcast_ref::<PackagingError>() {
        return match e {
            PackagingError::MissingProjectFile(_) => "MISSING_PROJECT_FILE",
            PackagingError::MissingDependency { .. } => "MISSING_DEPENDENCY",
            PackagingError::InstallFailed { .. } => "INSTALL_FAILED",
            PackagingError::PlatformUnavailable { .. } => "PLATFORM_UNAVAILABLE",
            PackagingError::ArtifactSize { .. } => "ARTIFACT_TOO_LARGE",
        };
    }
    if err.downcast_ref::<RuntimeError>().is_some() {
        "UNSUPPORTED_RUNTIME"
    } else if err.downcast_ref::<TargetError>().is_some() {
        "INVALID_TARGETS"
    } else if err.downcast_ref::<ConfigError>().is_some() {
        "INVALID_CONFIG"
    } else {
        "ERROR"
    }
}
