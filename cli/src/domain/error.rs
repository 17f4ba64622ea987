//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::platform::PlatformIssue;

// ── Packaging errors ──────────────────────────────────────────────────────────

/// Errors raised while turning a source directory into a code artifact.
#[derive(Debug, Error)]
pub enum PackagingError {
    #[error("Required project file not found: {}", .0.display())]
    MissingProjectFile(PathBuf),

    #[error("{binary} is required. {hint}")]
    MissingDependency { binary: String, hint: String },

    #[error("{tool} failed:\n{output}")]
    InstallFailed { tool: String, output: String },

    #[error(
        "No compatible binary dependencies for the target platform after trying all platform candidates ({}).{}\n{}",
        .attempted.join(", "),
        format_platforms(.issue.platforms.as_deref()),
        .issue.message
    )]
    PlatformUnavailable {
        attempted: Vec<String>,
        issue: PlatformIssue,
    },

    #[error("Packaged artifact exceeds {limit} bytes (actual: {actual}).")]
    ArtifactSize { limit: u64, actual: u64 },
}

fn format_platforms(platforms: Option<&[String]>) -> String {
    match platforms {
        Some(p) if !p.is_empty() => format!(" Offending platform tags: {}.", p.join(", ")),
        _ => String::new(),
    }
}

// ── Stack query errors ────────────────────────────────────────────────────────

/// Errors reported by a stack describer that callers must tell apart.
#[derive(Debug, Error)]
pub enum StackQueryError {
    /// The remote service answered, and the stack does not exist.
    #[error("Stack with id {0} does not exist")]
    NotFound(String),
}

/// `true` when `err` carries the describer's "stack does not exist" signature.
#[must_use]
pub fn is_stack_not_found(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<StackQueryError>(),
        Some(StackQueryError::NotFound(_))
    )
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
