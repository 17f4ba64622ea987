//! Minimum tool versions for building agent runtimes.
//!
//! Pure functions only — version strings come in, verdicts go out.

use std::sync::LazyLock;

use agentdeploy_common::{Language, RuntimeDescriptor};
use regex::Regex;
use semver::Version;
use serde::Serialize;

pub const MIN_UV_VERSION: Version = Version::new(0, 9, 2);
pub const MIN_NODE_VERSION: Version = Version::new(18, 0, 0);

const UV_INSTALL_URL: &str = "https://github.com/astral-sh/uv#installation";
const NODE_INSTALL_URL: &str = "https://nodejs.org/";

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("valid regex")
});

/// Outcome of one tool check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyCheck {
    pub binary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    pub required: String,
    pub satisfied: bool,
}

/// All checks for a set of runtimes, plus messages for the failed ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
    pub checks: Vec<DependencyCheck>,
    pub errors: Vec<String>,
}

impl DependencyReport {
    #[must_use]
    pub fn satisfied(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A tool whose presence and version are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequirement {
    pub binary: &'static str,
    pub minimum: Option<Version>,
    pub install_url: &'static str,
}

/// Tools needed to package the given runtimes, deduplicated, uv first.
#[must_use]
pub fn requirements_for(runtimes: &[RuntimeDescriptor]) -> Vec<ToolRequirement> {
    let python = runtimes.iter().any(|r| r.language() == Language::Python);
    let node = runtimes.iter().any(|r| r.language() == Language::Node);

    let mut out = Vec::new();
    if python {
        out.push(ToolRequirement {
            binary: "uv",
            minimum: Some(MIN_UV_VERSION),
            install_url: UV_INSTALL_URL,
        });
    }
    if node {
        out.push(ToolRequirement {
            binary: "npm",
            minimum: None,
            install_url: NODE_INSTALL_URL,
        });
        out.push(ToolRequirement {
            binary: "node",
            minimum: Some(MIN_NODE_VERSION),
            install_url: NODE_INSTALL_URL,
        });
    }
    out
}

/// Extract the first `X.Y.Z` from a `--version` line (`uv 0.9.2 (abc)`, `v20.11.1`).
#[must_use]
pub fn parse_tool_version(output: &str) -> Option<Version> {
    let caps = VERSION_RE.captures(output)?;
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

/// Judge one tool from its `--version` output (`None` when it did not run).
#[must_use]
pub fn evaluate_requirement(
    req: &ToolRequirement,
    version_output: Option<&str>,
) -> (DependencyCheck, Option<String>) {
    let required = req
        .minimum
        .as_ref()
        .map_or_else(|| "any".to_string(), |v| format!(">= {v}"));

    let Some(output) = version_output else {
        let error = match &req.minimum {
            Some(min) => format!(
                "'{}' not found. Install {} >= {min} from {}",
                req.binary, req.binary, req.install_url
            ),
            None => format!("'{}' not found. Install it from {}", req.binary, req.install_url),
        };
        return (
            DependencyCheck {
                binary: req.binary.to_string(),
                current: None,
                required,
                satisfied: false,
            },
            Some(error),
        );
    };

    let current = parse_tool_version(output);
    let error = match (&req.minimum, &current) {
        (None, _) => None,
        (Some(min), Some(cur)) if cur >= min => None,
        (Some(min), Some(cur)) => Some(format!(
            "{} {cur} is below minimum required version {min}",
            req.binary
        )),
        (Some(min), None) => Some(format!(
            "Could not determine {} version from '{}'. Minimum required version is {min}",
            req.binary,
            output.trim()
        )),
    };

    (
        DependencyCheck {
            binary: req.binary.to_string(),
            current: current.map(|v| v.to_string()),
            required,
            satisfied: error.is_none(),
        },
        error,
    )
}
