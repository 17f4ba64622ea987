//! Infrastructure-stack status classification.
//!
//! Pure functions only — no I/O, no async. Remote responses arrive as
//! [`StackDescription`] values whose fields are all optional; every
//! classification here handles their absence explicitly.

use std::collections::BTreeMap;

use serde::Serialize;

/// Well-known name of the per-account/region toolkit stack.
pub const TOOLKIT_STACK_NAME: &str = "CDKToolkit";

/// What a stack describer returns for an existing stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackDescription {
    /// Raw remote status (e.g. `UPDATE_COMPLETE`), when reported.
    pub status: Option<String>,
    /// Stack outputs keyed by output name.
    pub outputs: BTreeMap<String, String>,
}

/// Closed classification of remote stack statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackState {
    /// Healthy terminal state; updates are accepted.
    Complete,
    /// A create/update/delete/rollback/review operation is running.
    /// Expected to resolve on its own.
    InProgress,
    /// Failed or rolled-back terminal state that needs a human.
    Failed,
    /// A status this tool does not recognise.
    Unknown,
}

/// Complete statuses that accept further updates.
const COMPLETE_STATUSES: &[&str] = &[
    "CREATE_COMPLETE",
    "UPDATE_COMPLETE",
    "UPDATE_ROLLBACK_COMPLETE",
    "IMPORT_COMPLETE",
    "IMPORT_ROLLBACK_COMPLETE",
];

/// Rolled-back terminal statuses without a `FAILED` suffix. A stack in
/// `ROLLBACK_COMPLETE` cannot be updated; it must be deleted first.
const TERMINAL_ROLLBACK_STATUSES: &[&str] = &["ROLLBACK_COMPLETE"];

/// Toolkit stack statuses that count as bootstrapped.
const BOOTSTRAPPED_STATUSES: &[&str] = &["CREATE_COMPLETE", "UPDATE_COMPLETE", "UPDATE_ROLLBACK_COMPLETE"];

/// Classify a raw status.
///
/// Precedence: failed, then terminal rollback, then in-progress, then
/// complete. `UPDATE_ROLLBACK_FAILED` is therefore `Failed`, never
/// `InProgress` or `Complete`.
#[must_use]
pub fn classify_status(status: &str) -> StackState {
    if status.contains("FAILED") || TERMINAL_ROLLBACK_STATUSES.contains(&status) {
        StackState::Failed
    } else if status.contains("_IN_PROGRESS") {
        StackState::InProgress
    } else if COMPLETE_STATUSES.contains(&status) {
        StackState::Complete
    } else {
        StackState::Unknown
    }
}

/// Deployability of one named stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackStatusResult {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub can_deploy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StackStatusResult {
    /// Result for a stack the remote service reports as absent.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            exists: false,
            status: None,
            can_deploy: true,
            message: None,
        }
    }
}

/// Evaluate an existing stack's description.
///
/// Unknown or missing statuses fail open (`can_deploy = true`).
#[must_use]
pub fn evaluate_stack(stack_name: &str, description: &StackDescription) -> StackStatusResult {
    let Some(status) = description.status.as_deref() else {
        return StackStatusResult {
            exists: true,
            status: None,
            can_deploy: true,
            message: None,
        };
    };

    let (can_deploy, message) = match classify_status(status) {
        StackState::InProgress => (
            false,
            Some(format!(
                "Stack \"{stack_name}\" is currently in {status} state. Please wait for the operation to complete before deploying."
            )),
        ),
        StackState::Failed => (
            false,
            Some(format!(
                "Stack \"{stack_name}\" is in {status} state. Manual intervention may be required before deploying."
            )),
        ),
        StackState::Complete | StackState::Unknown => (true, None),
    };

    StackStatusResult {
        exists: true,
        status: Some(status.to_string()),
        can_deploy,
        message,
    }
}

/// The first stack found blocking a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockingStack {
    pub stack_name: String,
    pub result: StackStatusResult,
}

/// Whether an account/region has the toolkit stack provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapStatus {
    pub is_bootstrapped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_status: Option<String>,
}

/// Evaluate the toolkit stack's description.
#[must_use]
pub fn evaluate_bootstrap(description: &StackDescription) -> BootstrapStatus {
    let is_bootstrapped = description
        .status
        .as_deref()
        .is_some_and(|s| BOOTSTRAPPED_STATUSES.contains(&s));
    BootstrapStatus {
        is_bootstrapped,
        stack_status: description.status.clone(),
    }
}

/// CDK environment string for an account/region pair.
#[must_use]
pub fn format_cdk_environment(account: &str, region: &str) -> String {
    format!("aws://{account}/{region}")
}
