//! Application service — code artifact packaging use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use agentdeploy_common::Language;

use crate::application::ports::{ArtifactFs, CommandRunner, ProgressReporter};
use crate::domain::error::PackagingError;
use crate::domain::packaging::{
    MAX_ARTIFACT_SIZE_BYTES, NPM_BINARY, PYTHON_PLATFORM_CANDIDATES, PackagingRequest,
    PackagingResult, UV_BINARY, failure_output, installer, manifest_file, npm_install_args,
    uv_install_args,
};
use crate::domain::platform::detect_unavailable_platform;

/// Construction-time switches for [`CodeArtifactPackager`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PackagerOptions {
    /// Stage and archive the source without checking for or running the
    /// dependency installer.
    pub skip_install: bool,
}

/// Turns a source directory into a single deployable zip.
pub struct CodeArtifactPackager<'a, C, F> {
    runner: &'a C,
    fs: &'a F,
    options: PackagerOptions,
}

impl<'a, C: CommandRunner, F: ArtifactFs> CodeArtifactPackager<'a, C, F> {
    pub fn new(runner: &'a C, fs: &'a F, options: PackagerOptions) -> Self {
        Self {
            runner,
            fs,
            options,
        }
    }

    /// Package `request` and return the artifact location and size.
    ///
    /// The staging directory is wiped first; the artifact at
    /// `request.output_path` belongs to the caller afterwards, including when
    /// it is rejected for size.
    ///
    /// # Errors
    ///
    /// Returns a [`PackagingError`] for a missing manifest, a missing tool,
    /// installer failures and oversize artifacts, or an I/O error from the
    /// filesystem port.
    pub async fn package(
        &self,
        request: &PackagingRequest,
        reporter: &impl ProgressReporter,
    ) -> Result<PackagingResult> {
        let language = request.runtime.language();
        let manifest = request.source_dir.join(manifest_file(language));
        if !self.fs.exists(&manifest) {
            return Err(PackagingError::MissingProjectFile(manifest).into());
        }

        if self.options.skip_install {
            debug!("skip_install set; dependency installer not checked");
        } else {
            self.ensure_installer(language).await?;
        }

        reporter.step("staging source...");
        self.fs
            .prepare_staging(&request.staging_dir)
            .with_context(|| format!("preparing {}", request.staging_dir.display()))?;
        self.fs
            .copy_source_tree(&request.source_dir, &request.staging_dir, &request.output_path)
            .with_context(|| format!("copying {}", request.source_dir.display()))?;

        if !self.options.skip_install {
            match language {
                Language::Python => self.install_python(request, reporter).await?,
                Language::Node => self.install_node(request, reporter).await?,
            }
        }

        reporter.step("creating archive...");
        let size_bytes = self
            .fs
            .write_archive(&request.staging_dir, &request.output_path)
            .with_context(|| format!("writing {}", request.output_path.display()))?;

        if size_bytes > MAX_ARTIFACT_SIZE_BYTES {
            return Err(PackagingError::ArtifactSize {
                limit: MAX_ARTIFACT_SIZE_BYTES,
                actual: size_bytes,
            }
            .into());
        }

        info!(
            artifact = %request.output_path.display(),
            size_bytes,
            runtime = %request.runtime,
            "artifact packaged"
        );
        reporter.success(&format!(
            "packaged {} ({size_bytes} bytes)",
            request.artifact_name
        ));

        Ok(PackagingResult {
            artifact_path: request.output_path.clone(),
            size_bytes,
        })
    }

    async fn ensure_installer(&self, language: Language) -> Result<()> {
        let (binary, hint) = installer(language);
        let output = self.runner.run(binary, &["--version"], None).await;
        if output.success() {
            debug!(binary, version = %output.stdout.trim(), "installer found");
            return Ok(());
        }
        Err(PackagingError::MissingDependency {
            binary: binary.to_string(),
            hint: hint.to_string(),
        }
        .into())
    }

    async fn install_python(
        &self,
        request: &PackagingRequest,
        reporter: &impl ProgressReporter,
    ) -> Result<()> {
        let manifest = request.source_dir.join(manifest_file(Language::Python));
        let mut last_issue = None;

        for platform in PYTHON_PLATFORM_CANDIDATES {
            reporter.step(&format!("installing dependencies for {platform}..."));
            let args = uv_install_args(&request.runtime, &manifest, &request.staging_dir, platform);
            let argv: Vec<&str> = args.iter().map(String::as_str).collect();
            debug!(program = UV_BINARY, args = ?argv, "running installer");

            let output = self
                .runner
                .run(UV_BINARY, &argv, Some(&request.source_dir))
                .await;
            if output.success() {
                info!(platform, "dependencies installed");
                return Ok(());
            }

            let Some(issue) = detect_unavailable_platform(&output.stdout, &output.stderr) else {
                return Err(PackagingError::InstallFailed {
                    tool: "uv pip install".to_string(),
                    output: failure_output("uv pip install", output.code, &output.stdout, &output.stderr),
                }
                .into());
            };
            warn!(platform, "no compatible wheels; trying next platform tag");
            reporter.warn(&format!("no compatible wheels for {platform}"));
            last_issue = Some(issue);
        }

        let issue = last_issue.context("no platform candidates to try")?;
        Err(PackagingError::PlatformUnavailable {
            attempted: PYTHON_PLATFORM_CANDIDATES
                .iter()
                .map(ToString::to_string)
                .collect(),
            issue,
        }
        .into())
    }

    async fn install_node(
        &self,
        request: &PackagingRequest,
        reporter: &impl ProgressReporter,
    ) -> Result<()> {
        reporter.step("installing production dependencies...");
        let args = npm_install_args(&request.staging_dir);
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        debug!(program = NPM_BINARY, args = ?argv, "running installer");

        let output = self
            .runner
            .run(NPM_BINARY, &argv, Some(&request.staging_dir))
            .await;
        if output.success() {
            info!("dependencies installed");
            return Ok(());
        }
        Err(PackagingError::InstallFailed {
            tool: "npm install".to_string(),
            output: failure_output("npm install", output.code, &output.stdout, &output.stderr),
        }
        .into())
    }
}
