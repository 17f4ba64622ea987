//! Dependency-resolver failure analysis.
//!
//! Pure text inspection — no I/O. Decides whether a failed `uv pip install`
//! failed because no pre-built wheel exists for the target CPU/OS/libc
//! combination, as opposed to network, auth or syntax problems.

use std::sync::LazyLock;

use regex::Regex;

/// A line announcing which platform tags the resolver tried.
static PLATFORM_HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?i)platforms:\s*([^\n]+)").expect("valid regex")
});

/// Linux binary-compatibility tier tokens (`manylinux2014_aarch64`,
/// `manylinux_2_28_aarch64`, ...).
static MANYLINUX_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?i)(manylinux[^\s,]+)").expect("valid regex")
});

/// Phrasings resolvers use when every platform tag was exhausted.
static NO_WHEELS_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?i)(has no wheels with a matching platform tag|no compatible (?:wheels|tags) found)")
        .expect("valid regex")
});

/// Lines kept on each side of the matching line in an issue excerpt.
const EXCERPT_CONTEXT: usize = 3;

/// A resolver failure attributed to missing platform binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformIssue {
    /// Trimmed excerpt of the tool output around the matching line.
    pub message: String,
    /// Platform tags named by the resolver, when it listed them.
    pub platforms: Option<Vec<String>>,
}

/// Inspect the output of a failed resolver run.
///
/// Returns `None` when the failure is not a platform-compatibility problem,
/// so the caller can surface the raw error unchanged.
#[must_use]
pub fn detect_unavailable_platform(stdout: &str, stderr: &str) -> Option<PlatformIssue> {
    let combined = format!("{stdout}\n{stderr}");

    if let Some(hint) = PLATFORM_HINT_RE
        .captures(&combined)
        .and_then(|c| c.get(1))
    {
        let platforms: Vec<String> = MANYLINUX_TOKEN_RE
            .find_iter(hint.as_str())
            .map(|m| m.as_str().to_string())
            .collect();
        if !platforms.is_empty() {
            return Some(PlatformIssue {
                message: relevant_block(&combined, &PLATFORM_HINT_RE),
                platforms: Some(platforms),
            });
        }
    }

    if NO_WHEELS_RE.is_match(&combined) {
        return Some(PlatformIssue {
            message: relevant_block(&combined, &NO_WHEELS_RE),
            platforms: None,
        });
    }

    None
}

fn relevant_block(text: &str, pattern: &Regex) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let Some(index) = lines.iter().position(|line| pattern.is_match(line)) else {
        return text.trim().to_string();
    };
    let start = index.saturating_sub(EXCERPT_CONTEXT);
    let end = (index + EXCERPT_CONTEXT + 1).min(lines.len());
    lines[start..end]
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
