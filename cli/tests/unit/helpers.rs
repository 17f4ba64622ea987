//! Port doubles shared by the unit tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use anyhow::Result;

use agentdeploy_cli::application::ports::{
    ArtifactFs, CommandRunner, ConfigStore, ProgressReporter, StackDescriber, SubprocessOutput,
};
use agentdeploy_cli::domain::StackQueryError;
use agentdeploy_cli::domain::config::AgentdeployConfig;
use agentdeploy_cli::domain::stack::StackDescription;

// ---------------------------------------------------------------------------
// Subprocess outputs
// ---------------------------------------------------------------------------

pub fn ok(stdout: &str) -> SubprocessOutput {
    SubprocessOutput {
        code: 0,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub fn fail(code: i32, stderr: &str) -> SubprocessOutput {
    SubprocessOutput {
        code,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// What a spawn failure looks like through the runner port.
pub fn not_installed(program: &str) -> SubprocessOutput {
    fail(-1, &format!("failed to spawn {program}: No such file or directory"))
}

/// Resolver output naming the platform tags it could not satisfy.
pub fn no_wheels(platform_tag: &str) -> SubprocessOutput {
    fail(
        1,
        &format!(
            "  x No solution found when resolving dependencies:\n  Because numpy==2.1.0 has no wheels with a matching platform tag\n  (e.g., `{platform_tag}`), we can conclude it cannot be used.\n  hint: Wheels are available for platforms: manylinux_2_17_x86_64, macosx_11_0_arm64"
        ),
    )
}

// ---------------------------------------------------------------------------
// CommandRunner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl RecordedCall {
    /// Value following `flag` in the recorded arguments.
    pub fn arg_after(&self, flag: &str) -> Option<&str> {
        let pos = self.args.iter().position(|a| a == flag)?;
        self.args.get(pos + 1).map(String::as_str)
    }
}

type Script = Box<dyn Fn(&str, &[&str]) -> SubprocessOutput>;

/// Runner whose answers come from a closure over `(program, args)`.
/// Every call is recorded in order.
pub struct ScriptedRunner {
    script: Script,
    calls: RefCell<Vec<RecordedCall>>,
}

impl ScriptedRunner {
    pub fn new(script: impl Fn(&str, &[&str]) -> SubprocessOutput + 'static) -> Self {
        Self {
            script: Box::new(script),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Every program answers `--version` and succeeds otherwise.
    pub fn always_ok() -> Self {
        Self::new(|_, _| ok("tool 1.0.0"))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Calls that were not `--version` checks.
    pub fn work_calls(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.args != ["--version"])
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> SubprocessOutput {
        self.calls.borrow_mut().push(RecordedCall {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            cwd: cwd.map(Path::to_path_buf),
        });
        (self.script)(program, args)
    }
}

impl CommandRunner for &ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> SubprocessOutput {
        (**self).run(program, args, cwd).await
    }
}

// ---------------------------------------------------------------------------
// StackDescriber
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum StackAnswer {
    Status(Option<&'static str>),
    NotFound,
    Fail(&'static str),
}

/// Describer keyed by `(region, stack)`. Unscripted stacks do not exist.
#[derive(Default)]
pub struct ScriptedDescriber {
    answers: HashMap<(String, String), StackAnswer>,
    queried: RefCell<Vec<(String, String)>>,
}

impl ScriptedDescriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, region: &str, stack: &str, answer: StackAnswer) -> Self {
        self.answers
            .insert((region.to_string(), stack.to_string()), answer);
        self
    }

    pub fn with_status(self, region: &str, stack: &str, status: &'static str) -> Self {
        self.with(region, stack, StackAnswer::Status(Some(status)))
    }

    /// Stack names queried, in order.
    pub fn queried_stacks(&self) -> Vec<String> {
        self.queried.borrow().iter().map(|(_, s)| s.clone()).collect()
    }

    /// Regions queried, in order.
    pub fn queried_regions(&self) -> Vec<String> {
        self.queried.borrow().iter().map(|(r, _)| r.clone()).collect()
    }
}

impl StackDescriber for ScriptedDescriber {
    async fn describe_stack(&self, region: &str, stack_name: &str) -> Result<StackDescription> {
        let key = (region.to_string(), stack_name.to_string());
        self.queried.borrow_mut().push(key.clone());
        match self.answers.get(&key).cloned().unwrap_or(StackAnswer::NotFound) {
            StackAnswer::Status(status) => Ok(StackDescription {
                status: status.map(ToString::to_string),
                outputs: Default::default(),
            }),
            StackAnswer::NotFound => Err(StackQueryError::NotFound(stack_name.to_string()).into()),
            StackAnswer::Fail(msg) => Err(anyhow::anyhow!(msg)),
        }
    }
}

// ---------------------------------------------------------------------------
// ArtifactFs
// ---------------------------------------------------------------------------

/// In-memory filesystem: a set of existing paths and a fixed archive size.
pub struct MemoryArtifactFs {
    existing: BTreeSet<PathBuf>,
    archive_size: u64,
    pub staged: Cell<bool>,
    pub archived: RefCell<Option<(PathBuf, PathBuf)>>,
}

impl MemoryArtifactFs {
    pub fn new(archive_size: u64) -> Self {
        Self {
            existing: BTreeSet::new(),
            archive_size,
            staged: Cell::new(false),
            archived: RefCell::new(None),
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.existing.insert(path.into());
        self
    }
}

impl ArtifactFs for MemoryArtifactFs {
    fn exists(&self, path: &Path) -> bool {
        self.existing.contains(path)
    }

    fn prepare_staging(&self, _dir: &Path) -> Result<()> {
        Ok(())
    }

    fn copy_source_tree(&self, _source: &Path, _staging: &Path, _output: &Path) -> Result<()> {
        self.staged.set(true);
        Ok(())
    }

    fn write_archive(&self, dir: &Path, output: &Path) -> Result<u64> {
        *self.archived.borrow_mut() = Some((dir.to_path_buf(), output.to_path_buf()));
        Ok(self.archive_size)
    }
}

// ---------------------------------------------------------------------------
// ProgressReporter
// ---------------------------------------------------------------------------

/// Reporter that keeps warnings so tests can assert on fallbacks.
#[derive(Default)]
pub struct RecordingReporter {
    pub warnings: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}

// ---------------------------------------------------------------------------
// ConfigStore
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryConfigStore {
    pub config: RefCell<AgentdeployConfig>,
    pub saves: Cell<usize>,
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<AgentdeployConfig> {
        Ok(self.config.borrow().clone())
    }

    fn save(&self, config: &AgentdeployConfig) -> Result<()> {
        *self.config.borrow_mut() = config.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("/tmp/agentdeploy-test/config.yaml"))
    }
}
