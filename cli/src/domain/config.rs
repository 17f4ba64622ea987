//! Domain types and validators for agentdeploy configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &["aws.profile", "packaging.skip_install"];
pub const VALID_BOOL_VALUES: &[&str] = &["true", "false"];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.agentdeploy/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AgentdeployConfig {
    pub aws: AwsConfig,
    pub packaging: PackagingConfig,
}

/// Settings applied when loading the AWS SDK configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AwsConfig {
    /// Named profile for the SDK credential chain; the default chain when unset.
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PackagingConfig {
    /// Default for `package --skip-install`.
    pub skip_install: bool,
}

impl AgentdeployConfig {
    /// Apply an already-validated `key = value` pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "aws.profile" => {
                self.aws.profile = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "packaging.skip_install" => self.packaging.skip_install = value == "true",
            _ => {}
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |valid: String| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        valid,
    };
    match key {
        "packaging.skip_install" if !VALID_BOOL_VALUES.contains(&value) => {
            Err(invalid(VALID_BOOL_VALUES.join(", ")).into())
        }
        "aws.profile"
            if value
                .chars()
                .any(|c| c.is_whitespace() || c.is_control()) =>
        {
            Err(invalid("a profile name without whitespace, or empty to unset".to_string()).into())
        }
        _ => Ok(()),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
