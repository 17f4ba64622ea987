//! Packaging domain types and pure helpers.
//!
//! No I/O here: paths are only joined and formatted, never touched.

use std::path::{Path, PathBuf};

use agentdeploy_common::{Language, RuntimeDescriptor};
use serde::Serialize;

/// Maximum size of a deployable code artifact (250 MiB).
pub const MAX_ARTIFACT_SIZE_BYTES: u64 = 250 * 1024 * 1024;

/// `uv --python-platform` values tried in order, newest glibc baseline first.
///
/// The deployment target is always Linux on ARM64, whatever the build host.
pub const PYTHON_PLATFORM_CANDIDATES: [&str; 3] = [
    "aarch64-manylinux_2_34",
    "aarch64-manylinux_2_28",
    "aarch64-manylinux2014",
];

pub const UV_BINARY: &str = "uv";
pub const NPM_BINARY: &str = "npm";

pub const UV_INSTALL_HINT: &str =
    "Install uv from https://github.com/astral-sh/uv#installation and ensure it is on your PATH.";
pub const NPM_INSTALL_HINT: &str =
    "Install Node.js (which ships npm) from https://nodejs.org/ and ensure npm is on your PATH.";

/// Per-project directory holding default staging trees and artifacts.
pub const BUILD_DIR: &str = ".agentdeploy";

/// Directory and file names never copied into the staging tree.
pub const STAGING_EXCLUDES: &[&str] = &[
    BUILD_DIR,
    ".git",
    ".venv",
    "__pycache__",
    "node_modules",
    ".pytest_cache",
    ".mypy_cache",
    ".DS_Store",
];

/// One packaging invocation.
#[derive(Debug, Clone)]
pub struct PackagingRequest {
    pub source_dir: PathBuf,
    pub runtime: RuntimeDescriptor,
    pub staging_dir: PathBuf,
    pub output_path: PathBuf,
    pub artifact_name: String,
}

/// A finished artifact. The caller owns the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackagingResult {
    pub artifact_path: PathBuf,
    pub size_bytes: u64,
}

/// Manifest that must exist at the root of a project in `language`.
#[must_use]
pub fn manifest_file(language: Language) -> &'static str {
    match language {
        Language::Python => "pyproject.toml",
        Language::Node => "package.json",
    }
}

/// Installer binary and its install hint.
#[must_use]
pub fn installer(language: Language) -> (&'static str, &'static str) {
    match language {
        Language::Python => (UV_BINARY, UV_INSTALL_HINT),
        Language::Node => (NPM_BINARY, NPM_INSTALL_HINT),
    }
}

/// File name of an artifact: `<name>.zip`.
#[must_use]
pub fn artifact_zip_name(name: &str) -> String {
    format!("{name}.zip")
}

/// Default staging directory for `name` under a project root.
#[must_use]
pub fn default_staging_dir(project_root: &Path, name: &str) -> PathBuf {
    project_root.join(BUILD_DIR).join("staging").join(name)
}

/// Default artifact path for `name` under a project root.
#[must_use]
pub fn default_output_path(project_root: &Path, name: &str) -> PathBuf {
    project_root
        .join(BUILD_DIR)
        .join("dist")
        .join(artifact_zip_name(name))
}

/// Arguments for a cross-platform `uv pip install` into `target`.
#[must_use]
pub fn uv_install_args(
    runtime: &RuntimeDescriptor,
    manifest: &Path,
    target: &Path,
    platform: &str,
) -> Vec<String> {
    vec![
        "pip".into(),
        "install".into(),
        "--no-config".into(),
        "--target".into(),
        target.display().to_string(),
        "--python-version".into(),
        runtime.version().to_string(),
        "--python-platform".into(),
        platform.to_string(),
        "--only-binary".into(),
        ":all:".into(),
        "--upgrade".into(),
        "-r".into(),
        manifest.display().to_string(),
    ]
}

/// Arguments for a production-only `npm install` into `prefix`.
#[must_use]
pub fn npm_install_args(prefix: &Path) -> Vec<String> {
    vec![
        "install".into(),
        "--omit=dev".into(),
        "--prefix".into(),
        prefix.display().to_string(),
    ]
}

/// Stdout and stderr of a failed tool run, or a fallback naming the exit code.
#[must_use]
pub fn failure_output(tool: &str, code: i32, stdout: &str, stderr: &str) -> String {
    let combined = format!("{stdout}\n{stderr}");
    let trimmed = combined.trim();
    if trimmed.is_empty() {
        format!("{tool} failed with exit code {code}")
    } else {
        trimmed.to_string()
    }
}
