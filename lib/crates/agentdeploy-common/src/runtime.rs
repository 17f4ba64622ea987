// lib/crates/agentdeploy-common/src/runtime.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported Python runtime versions, oldest first.
pub const PYTHON_VERSIONS: &[&str] = &["3.10", "3.11", "3.12", "3.13"];

/// Supported Node.js runtime versions, oldest first.
pub const NODE_VERSIONS: &[&str] = &["18", "20", "22"];

/// Errors raised when a runtime descriptor cannot be built.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Unsupported runtime '{runtime}': {language} packaging is not supported. Supported languages: Python, Node")]
    UnsupportedLanguage { runtime: String, language: String },

    #[error("Unsupported runtime '{runtime}': supported {language} versions are {supported}")]
    UnsupportedVersion {
        runtime: String,
        language: Language,
        supported: String,
    },
}

/// Source language of an agent runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Python,
    Node,
}

impl Language {
    /// Versions accepted for this language.
    #[must_use]
    pub fn supported_versions(self) -> &'static [&'static str] {
        match self {
            Self::Python => PYTHON_VERSIONS,
            Self::Node => NODE_VERSIONS,
        }
    }

    fn constant_prefix(self) -> &'static str {
        match self {
            Self::Python => "PYTHON",
            Self::Node => "NODE",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Python => f.write_str("Python"),
            Self::Node => f.write_str("Node"),
        }
    }
}

/// Language plus runtime version, e.g. Python 3.12.
///
/// Serialized in the project-config constant form (`PYTHON_3_12`, `NODE_20`).
/// Construction always validates against the fixed supported set, so a value
/// of this type is never an unsupported runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuntimeDescriptor {
    language: Language,
    version: String,
}

impl RuntimeDescriptor {
    /// Build a descriptor from a language and a dotted version (`"3.12"`, `"20"`).
    pub fn new(language: Language, version: &str) -> Result<Self, RuntimeError> {
        if !language.supported_versions().contains(&version) {
            return Err(RuntimeError::UnsupportedVersion {
                runtime: format!("{language} {version}"),
                language,
                supported: language.supported_versions().join(", "),
            });
        }
        Ok(Self {
            language,
            version: version.to_string(),
        })
    }

    /// Parse the constant form used in project configuration.
    ///
    /// `PYTHON_3_12` becomes Python `3.12`; `NODE_20` becomes Node `20`.
    /// The language prefix is matched case-insensitively.
    pub fn parse(value: &str) -> Result<Self, RuntimeError> {
        let (prefix, version) = value.split_once('_').unwrap_or((value, ""));
        let language = match prefix.to_ascii_uppercase().as_str() {
            "PYTHON" => Language::Python,
            "NODE" => Language::Node,
            _ => {
                return Err(RuntimeError::UnsupportedLanguage {
                    runtime: value.to_string(),
                    language: prefix.to_string(),
                });
            }
        };
        let dotted = version.replace('_', ".");
        Self::new(language, &dotted).map_err(|_| RuntimeError::UnsupportedVersion {
            runtime: value.to_string(),
            language,
            supported: language.supported_versions().join(", "),
        })
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Dotted version string, e.g. `"3.12"` or `"20"`.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Constant form, e.g. `PYTHON_3_12`.
    #[must_use]
    pub fn constant(&self) -> String {
        format!(
            "{}_{}",
            self.language.constant_prefix(),
            self.version.replace('.', "_")
        )
    }
}

impl fmt::Display for RuntimeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.constant())
    }
}

impl FromStr for RuntimeDescriptor {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RuntimeDescriptor {
    type Error = RuntimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RuntimeDescriptor> for String {
    fn from(value: RuntimeDescriptor) -> Self {
        value.constant()
    }
}
