//! Spawning the `git` binary inside the resolved repository root.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::CommandError;

/// Ceiling for read-only commands whose output is captured.
pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(30);

/// Ceiling for commands that change the repository.
pub const EXEC_TIMEOUT: Duration = Duration::from_secs(60);

/// Narrow interface over running git subcommands.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a read-only subcommand and return stdout followed by stderr,
    /// trimmed. A non-zero exit is an error.
    async fn run_capture(&self, args: &[&str]) -> Result<String, CommandError>;

    /// Run a subcommand and return its exit code.
    async fn run(&self, args: &[&str]) -> Result<i32, CommandError>;
}

/// [`CommandRunner`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
    capture_timeout: Duration,
    exec_timeout: Duration,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            capture_timeout: CAPTURE_TIMEOUT,
            exec_timeout: EXEC_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, capture: Duration, exec: Duration) -> Self {
        self.capture_timeout = capture;
        self.exec_timeout = exec;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that `git` can be found on PATH.
    pub fn check_installed() -> Result<(), CommandError> {
        which::which("git").map(|_| ()).map_err(|_| CommandError::NotInstalled)
    }

    async fn spawn(&self, args: &[&str], limit: Duration) -> Result<Output, CommandError> {
        let command = args.join(" ");
        debug!(root = %self.root.display(), "git {}", command);

        let child = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        timeout(limit, child)
            .await
            .map_err(|_| CommandError::Timeout {
                command: command.clone(),
                secs: limit.as_secs(),
            })?
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound && Self::check_installed().is_err() {
                    CommandError::NotInstalled
                } else {
                    CommandError::SpawnFailed { command, source }
                }
            })
    }
}

fn merged_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text.trim().to_string()
}

#[async_trait]
impl CommandRunner for GitCli {
    async fn run_capture(&self, args: &[&str]) -> Result<String, CommandError> {
        let output = self.spawn(args, self.capture_timeout).await?;
        let text = merged_output(&output);

        if !output.status.success() {
            return Err(CommandError::NonZeroExit {
                command: args.join(" "),
                code: output.status.code().unwrap_or(-1),
                output: text,
            });
        }

        Ok(text)
    }

    async fn run(&self, args: &[&str]) -> Result<i32, CommandError> {
        let output = self.spawn(args, self.exec_timeout).await?;
        let code = output.status.code().unwrap_or(-1);

        if code != 0 {
            warn!("git {} exited with {}:\n{}", args.join(" "), code, merged_output(&output));
        }

        Ok(code)
    }
}
