//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution. The child is killed if the future is dropped.

use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::application::ports::{CommandRunner, SubprocessOutput};

/// Exit code reported when the program could not be started, or exited
/// without a code (killed by a signal).
pub const SPAWN_FAILURE_CODE: i32 = -1;

/// Production `CommandRunner`. No timeout of its own: build tools run as
/// long as they need to.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> SubprocessOutput {
        let mut command = tokio::process::Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) => {
                debug!(program, error = %err, "spawn failed");
                return SubprocessOutput {
                    code: SPAWN_FAILURE_CODE,
                    stdout: String::new(),
                    stderr: format!("failed to spawn {program}: {err}"),
                };
            }
        };

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        let (status, stdout, stderr) = tokio::join!(
            child.wait(),
            async {
                let mut buf = Vec::new();
                if let Some(ref mut h) = stdout_handle {
                    let _ = h.read_to_end(&mut buf).await;
                }
                buf
            },
            async {
                let mut buf = Vec::new();
                if let Some(ref mut h) = stderr_handle {
                    let _ = h.read_to_end(&mut buf).await;
                }
                buf
            },
        );

        let stdout = String::from_utf8_lossy(&stdout).into_owned();
        let mut stderr = String::from_utf8_lossy(&stderr).into_owned();
        let code = match status {
            Ok(status) => status.code().unwrap_or(SPAWN_FAILURE_CODE),
            Err(err) => {
                stderr.push_str(&format!("\nwaiting for {program}: {err}"));
                SPAWN_FAILURE_CODE
            }
        };
        debug!(program, code, "process exited");

        SubprocessOutput {
            code,
            stdout,
            stderr,
        }
    }
}
