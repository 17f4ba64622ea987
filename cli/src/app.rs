//! Application context — unified state passed to every command handler.
//!
//! Built once in `Cli::run()` from the global flags and the user config, so
//! no handler constructs its own output context or infrastructure adapters.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::AgentdeployConfig;
use crate::infra::artifact_fs::LocalArtifactFs;
use crate::infra::cloudformation::CloudFormationStackDescriber;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::output::{HumanRenderer, OutputContext, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Persistent user configuration.
    pub config_store: YamlConfigStore,
    /// Configuration loaded at startup.
    pub config: AgentdeployConfig,
    /// Subprocess runner for the build tools.
    pub runner: TokioCommandRunner,
    /// Local staging and archive filesystem.
    pub artifact_fs: LocalArtifactFs,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let config_store = YamlConfigStore::from_env()?;
        let config = config_store.load()?;

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet)
                .with_json(flags.output.json),
            mode,
            config_store,
            config,
            runner: TokioCommandRunner::new(),
            artifact_fs: LocalArtifactFs,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Stack describer using the configured AWS profile.
    pub async fn stack_describer(&self) -> CloudFormationStackDescriber {
        CloudFormationStackDescriber::load(self.config.aws.profile.as_deref()).await
    }
}
