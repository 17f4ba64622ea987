//! Application service — deployment preflight.
//!
//! Combines the stack and bootstrap checks into the two verdicts the deploy
//! workflow consumes before it mutates anything. The two verdicts are
//! independent: a target may need bootstrapping and have no blocking stack.

use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use agentdeploy_common::DeploymentTarget;

use crate::application::ports::StackDescriber;
use crate::application::services::bootstrap::check_bootstrap_status;
use crate::application::services::stack_status::check_stacks_status;

/// Go/no-go for deploying over the named stacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreflightVerdict {
    pub can_deploy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking_stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// First target that still needs the toolkit stack, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapCheck {
    pub needs_bootstrap: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<DeploymentTarget>,
}

impl BootstrapCheck {
    fn not_needed() -> Self {
        Self {
            needs_bootstrap: false,
            target: None,
        }
    }
}

/// # Errors
///
/// Propagates stack query errors unchanged.
pub async fn check_stack_deployability(
    describer: &impl StackDescriber,
    region: &str,
    stack_names: &[String],
) -> Result<PreflightVerdict> {
    Ok(match check_stacks_status(describer, region, stack_names).await? {
        Some(blocker) => PreflightVerdict {
            can_deploy: false,
            blocking_stack: Some(blocker.stack_name),
            message: blocker.result.message,
        },
        None => PreflightVerdict {
            can_deploy: true,
            blocking_stack: None,
            message: None,
        },
    })
}

/// Scan `targets` in order and stop at the first one not yet bootstrapped.
///
/// A failed query counts as "not needed" for that target and the scan moves
/// on; this is the only place a remote error is swallowed.
pub async fn check_bootstrap_needed(
    describer: &impl StackDescriber,
    targets: &[DeploymentTarget],
) -> BootstrapCheck {
    for target in targets {
        match check_bootstrap_status(describer, target.region.as_str()).await {
            Ok(status) if !status.is_bootstrapped => {
                return BootstrapCheck {
                    needs_bootstrap: true,
                    target: Some(target.clone()),
                };
            }
            Ok(_) => {}
            Err(err) => {
                warn!(target = %target.name, region = %target.region, error = %err, "bootstrap check failed; assuming bootstrapped");
            }
        }
    }
    BootstrapCheck::not_needed()
}
