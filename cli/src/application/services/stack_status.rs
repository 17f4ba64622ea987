//! Application service — remote stack status use-cases.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Every call queries the remote service afresh; nothing is cached.

use anyhow::Result;
use tracing::debug;

use crate::application::ports::StackDescriber;
use crate::domain::error::is_stack_not_found;
use crate::domain::stack::{BlockingStack, StackStatusResult, evaluate_stack};

/// Deployability of a single stack.
///
/// # Errors
///
/// Any describer error other than "stack does not exist" is returned as is.
pub async fn check_stack_status(
    describer: &impl StackDescriber,
    region: &str,
    stack_name: &str,
) -> Result<StackStatusResult> {
    match describer.describe_stack(region, stack_name).await {
        Ok(description) => {
            let result = evaluate_stack(stack_name, &description);
            debug!(stack_name, region, status = ?result.status, can_deploy = result.can_deploy, "stack checked");
            Ok(result)
        }
        Err(err) if is_stack_not_found(&err) => {
            debug!(stack_name, region, "stack does not exist");
            Ok(StackStatusResult::not_found())
        }
        Err(err) => Err(err),
    }
}

/// First stack in `stack_names` that blocks a deployment, checked in order.
///
/// # Errors
///
/// Stops at, and returns, the first query error.
pub async fn check_stacks_status(
    describer: &impl StackDescriber,
    region: &str,
    stack_names: &[String],
) -> Result<Option<BlockingStack>> {
    for stack_name in stack_names {
        let result = check_stack_status(describer, region, stack_name).await?;
        if !result.can_deploy {
            return Ok(Some(BlockingStack {
                stack_name: stack_name.clone(),
                result,
            }));
        }
    }
    Ok(None)
}
