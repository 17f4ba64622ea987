//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::config::AgentdeployConfig;
use crate::domain::stack::StackDescription;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Captured result of one child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubprocessOutput {
    /// Exit code; `-1` when the process could not be spawned or was killed
    /// by a signal.
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl SubprocessOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program to completion and capture its output.
    ///
    /// Never fails: a spawn failure is reported as `code = -1` with the OS
    /// error text in `stderr`.
    async fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> SubprocessOutput;
}

// ── Remote Stack Port ─────────────────────────────────────────────────────────

/// Reads the current state of an infrastructure stack.
#[allow(async_fn_in_trait)]
pub trait StackDescriber {
    /// Describe `stack_name` in `region`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::StackQueryError::NotFound`] when the stack
    /// does not exist; any other error means the query itself failed.
    async fn describe_stack(&self, region: &str, stack_name: &str) -> Result<StackDescription>;
}

// ── Artifact Filesystem Port ──────────────────────────────────────────────────

/// Filesystem operations needed to stage and archive a code artifact.
/// Sync trait — blocking I/O on local disk.
pub trait ArtifactFs {
    fn exists(&self, path: &Path) -> bool;
    /// Remove any previous contents of `dir` and recreate it empty.
    fn prepare_staging(&self, dir: &Path) -> Result<()>;
    /// Copy `source` into `staging`, skipping caches, VCS metadata and a
    /// previous archive at `output`.
    fn copy_source_tree(&self, source: &Path, staging: &Path, output: &Path) -> Result<()>;
    /// Zip the contents of `dir` into `output`, returning the archive size.
    fn write_archive(&self, dir: &Path, output: &Path) -> Result<u64>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts persistence of the user configuration file.
pub trait ConfigStore {
    fn load(&self) -> Result<AgentdeployConfig>;
    fn save(&self, config: &AgentdeployConfig) -> Result<()>;
    fn path(&self) -> Result<PathBuf>;
}
