// lib/crates/agentdeploy-common/src/target.rs

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Regions where the agent runtime is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "ap-northeast-1")]
    ApNortheast1,
    #[serde(rename = "ap-south-1")]
    ApSouth1,
    #[serde(rename = "ap-southeast-1")]
    ApSoutheast1,
    #[serde(rename = "ap-southeast-2")]
    ApSoutheast2,
    #[serde(rename = "eu-central-1")]
    EuCentral1,
    #[serde(rename = "eu-west-1")]
    EuWest1,
    #[serde(rename = "us-east-1")]
    UsEast1,
    #[serde(rename = "us-east-2")]
    UsEast2,
    #[serde(rename = "us-west-2")]
    UsWest2,
}

impl Region {
    pub const ALL: [Region; 9] = [
        Self::ApNortheast1,
        Self::ApSouth1,
        Self::ApSoutheast1,
        Self::ApSoutheast2,
        Self::EuCentral1,
        Self::EuWest1,
        Self::UsEast1,
        Self::UsEast2,
        Self::UsWest2,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApNortheast1 => "ap-northeast-1",
            Self::ApSouth1 => "ap-south-1",
            Self::ApSoutheast1 => "ap-southeast-1",
            Self::ApSoutheast2 => "ap-southeast-2",
            Self::EuCentral1 => "eu-central-1",
            Self::EuWest1 => "eu-west-1",
            Self::UsEast1 => "us-east-1",
            Self::UsEast2 => "us-east-2",
            Self::UsWest2 => "us-west-2",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| TargetError::UnsupportedRegion(s.to_string()))
    }
}

/// Errors in the deployment target list.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error(
        "Invalid deployment target name '{0}': must start with a letter, contain only alphanumeric characters and hyphens, and be at most 64 characters"
    )]
    InvalidName(String),

    #[error("Invalid account '{account}' for target '{target}': AWS account ID must be exactly 12 digits")]
    InvalidAccount { target: String, account: String },

    #[error("Duplicate deployment target name: {0}")]
    DuplicateName(String),

    #[error("Unsupported region '{0}'")]
    UnsupportedRegion(String),
}

/// A named account/region pair a project deploys to (`aws-targets.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentTarget {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub account: String,
    pub region: Region,
}

impl DeploymentTarget {
    /// Check name and account format for a single target.
    pub fn validate(&self) -> Result<(), TargetError> {
        if !is_valid_target_name(&self.name) {
            return Err(TargetError::InvalidName(self.name.clone()));
        }
        if self.account.len() != 12 || !self.account.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TargetError::InvalidAccount {
                target: self.name.clone(),
                account: self.account.clone(),
            });
        }
        Ok(())
    }
}

fn is_valid_target_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.len() <= 64
        && first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Validate every target and reject duplicate names.
pub fn validate_targets(targets: &[DeploymentTarget]) -> Result<(), TargetError> {
    let mut seen = HashSet::new();
    for target in targets {
        target.validate()?;
        if !seen.insert(target.name.as_str()) {
            return Err(TargetError::DuplicateName(target.name.clone()));
        }
    }
    Ok(())
}
