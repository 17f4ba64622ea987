//! Application service — toolkit stack (bootstrap) check.

use anyhow::Result;

use crate::application::ports::StackDescriber;
use crate::domain::error::is_stack_not_found;
use crate::domain::stack::{BootstrapStatus, TOOLKIT_STACK_NAME, evaluate_bootstrap};

/// Whether `region` (in the describer's account) has the toolkit stack.
///
/// # Errors
///
/// Query errors other than "stack does not exist" are returned as is.
pub async fn check_bootstrap_status(
    describer: &impl StackDescriber,
    region: &str,
) -> Result<BootstrapStatus> {
    match describer.describe_stack(region, TOOLKIT_STACK_NAME).await {
        Ok(description) => Ok(evaluate_bootstrap(&description)),
        Err(err) if is_stack_not_found(&err) => Ok(BootstrapStatus {
            is_bootstrapped: false,
            stack_status: None,
        }),
        Err(err) => Err(err),
    }
}
