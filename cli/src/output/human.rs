//! Human-readable terminal renderer.

use crate::application::services::preflight::{BootstrapCheck, PreflightVerdict};
use crate::domain::config::AgentdeployConfig;
use crate::domain::packaging::PackagingResult;
use crate::domain::requirements::DependencyReport;
use crate::domain::stack::format_cdk_environment;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render a finished artifact.
    pub fn render_packaging(&self, result: &PackagingResult) {
        self.ctx.kv("Artifact:", &result.artifact_path.display().to_string());
        self.ctx.kv("Size:", &format_size(result.size_bytes));
    }

    /// Render the stack verdict and, when checked, the bootstrap verdict.
    pub fn render_preflight(&self, verdict: &PreflightVerdict, bootstrap: Option<&BootstrapCheck>) {
        if verdict.can_deploy {
            self.ctx.success("No stack is blocking deployment");
        } else {
            let stack = verdict.blocking_stack.as_deref().unwrap_or("unknown");
            self.ctx.error(&format!("Stack \"{stack}\" is blocking deployment"));
            if let Some(message) = &verdict.message {
                self.ctx.error(message);
            }
        }

        let Some(check) = bootstrap else {
            return;
        };
        match (check.needs_bootstrap, &check.target) {
            (true, Some(target)) => {
                self.ctx.warn(&format!(
                    "Target \"{}\" is not bootstrapped",
                    target.name
                ));
                self.ctx.info(&format!(
                    "Run: cdk bootstrap {}",
                    format_cdk_environment(&target.account, target.region.as_str())
                ));
            }
            _ => self.ctx.success("All targets are bootstrapped"),
        }
    }

    /// Render tool prerequisite checks.
    pub fn render_doctor(&self, report: &DependencyReport) {
        self.ctx.header("Build tools:");
        if report.checks.is_empty() {
            self.ctx.info("No runtimes given; nothing to check");
        }
        for check in &report.checks {
            let current = check.current.as_deref().unwrap_or("not found");
            let line = format!("{} {current} (required {})", check.binary, check.required);
            if check.satisfied {
                self.ctx.success(&line);
            } else {
                self.ctx.warn(&line);
            }
        }
        for error in &report.errors {
            self.ctx.error(error);
        }
    }

    /// Render the effective configuration.
    pub fn render_config(&self, config: &AgentdeployConfig, path: &str) {
        self.ctx.header("Configuration:");
        self.ctx.kv("File:", path);
        self.ctx.kv(
            "aws.profile:",
            config.aws.profile.as_deref().unwrap_or("(default chain)"),
        );
        self.ctx.kv(
            "packaging.skip_install:",
            if config.packaging.skip_install {
                "true"
            } else {
                "false"
            },
        );
    }
}

/// Byte count with a binary-unit suffix, e.g. `12.3 MiB`.
#[must_use]
#[allow(clippy::cast_precision_loss)] // display only
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
