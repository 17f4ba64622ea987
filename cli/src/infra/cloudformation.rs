//! Infrastructure implementation of the `StackDescriber` port.
//!
//! Talks to CloudFormation through the AWS SDK. Credentials and the optional
//! named profile come from the standard `aws_config` provider chain; the
//! region is chosen per query.

use anyhow::Result;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::operation::describe_stacks::{
    DescribeStacksError, DescribeStacksOutput,
};
use tracing::debug;

use crate::application::ports::StackDescriber;
use crate::domain::error::StackQueryError;
use crate::domain::stack::StackDescription;

/// Error code CloudFormation returns for `DescribeStacks` on a missing stack.
const NOT_FOUND_CODE: &str = "ValidationError";

/// `StackDescriber` backed by `aws-sdk-cloudformation`.
#[derive(Debug, Clone)]
pub struct CloudFormationStackDescriber {
    base: aws_sdk_cloudformation::Config,
}

impl CloudFormationStackDescriber {
    /// Describer over an explicit service config. The config's region is
    /// replaced on every query.
    #[must_use]
    pub fn new(base: aws_sdk_cloudformation::Config) -> Self {
        Self { base }
    }

    /// Load the shared AWS config, optionally pinned to a named profile.
    pub async fn load(profile: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let shared = loader.load().await;
        Self::new(aws_sdk_cloudformation::config::Builder::from(&shared).build())
    }

    fn client(&self, region: &str) -> Client {
        Client::from_conf(
            self.base
                .to_builder()
                .region(Region::new(region.to_string()))
                .build(),
        )
    }
}

/// `true` when CloudFormation answered that the stack does not exist.
fn is_not_found(err: &DescribeStacksError) -> bool {
    err.code() == Some(NOT_FOUND_CODE)
}

/// Map an SDK failure to the typed not-found error, or keep it whole.
fn describe_error(
    stack_name: &str,
    region: &str,
    err: SdkError<DescribeStacksError>,
) -> anyhow::Error {
    if err.as_service_error().is_some_and(is_not_found) {
        return StackQueryError::NotFound(stack_name.to_string()).into();
    }
    anyhow::Error::new(err).context(format!("describe-stacks failed for {stack_name} in {region}"))
}

/// First stack of a `DescribeStacks` answer. An empty list means not found.
fn first_stack(stack_name: &str, output: &DescribeStacksOutput) -> Result<StackDescription> {
    let stack = output
        .stacks()
        .first()
        .ok_or_else(|| StackQueryError::NotFound(stack_name.to_string()))?;
    let outputs = stack
        .outputs()
        .iter()
        .filter_map(|o| Some((o.output_key()?.to_string(), o.output_value()?.to_string())))
        .collect();
    Ok(StackDescription {
        status: stack.stack_status().map(|s| s.as_str().to_string()),
        outputs,
    })
}

impl StackDescriber for CloudFormationStackDescriber {
    async fn describe_stack(&self, region: &str, stack_name: &str) -> Result<StackDescription> {
        debug!(stack_name, region, "describing stack");
        let output = self
            .client(region)
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| describe_error(stack_name, region, e))?;
        first_stack(stack_name, &output)
    }
}
