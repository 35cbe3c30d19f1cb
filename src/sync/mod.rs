//! Configuration sync: the Claude config tree as a git repository.
//!
//! The whole of `~/.claude` is versioned through the user's own remote.
//! Every operation shells out to the system `git` via [`GitCommand`], a
//! typed builder with a timeout and consistent error mapping. Git's output
//! is surfaced as-is; failures are reported, never retried.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::GIT_COMMAND_TIMEOUT;
use crate::core::WorkbenchError;
use crate::utils::platform::get_git_command;
use crate::utils::safe_write;

/// Captured output of a git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Type-safe builder for git command execution.
///
/// Uses `git -C <dir>` so operations are independent of the process
/// working directory.
pub struct GitCommand {
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    timeout_duration: Duration,
}

impl GitCommand {
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            current_dir: None,
            timeout_duration: GIT_COMMAND_TIMEOUT,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Run the command, capturing output. Non-zero exit codes are errors
    /// carrying whatever git wrote (git sometimes reports errors on
    /// stdout).
    pub async fn execute(self) -> Result<GitOutput> {
        let git = get_git_command()?;

        let mut full_args = Vec::new();
        if let Some(ref dir) = self.current_dir {
            full_args.push("-C".to_string());
            full_args.push(dir.display().to_string());
        }
        full_args.extend(self.args.clone());

        tracing::debug!(target: "git", "Executing: {git} {}", full_args.join(" "));

        let mut cmd = Command::new(git);
        cmd.args(&full_args).stdout(Stdio::piped()).stderr(Stdio::piped());

        let operation = self.args.first().cloned().unwrap_or_else(|| "git".to_string());
        let output = timeout(self.timeout_duration, cmd.output())
            .await
            .map_err(|_| WorkbenchError::GitCommandError {
                operation: operation.clone(),
                stderr: format!(
                    "timed out after {} seconds; run manually: git {}",
                    self.timeout_duration.as_secs(),
                    full_args.join(" ")
                ),
            })?
            .with_context(|| format!("Failed to execute git {}", full_args.join(" ")))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(WorkbenchError::GitCommandError {
                operation,
                stderr: if stderr.is_empty() { stdout } else { stderr },
            }
            .into());
        }

        Ok(GitOutput { stdout, stderr })
    }
}

impl Default for GitCommand {
    fn default() -> Self {
        Self::new()
    }
}

/// Sync status of the config repository.
#[derive(Debug, Clone)]
pub struct SyncStatus {
    pub initialized: bool,
    pub remote: Option<String>,
    pub branch: Option<String>,
    /// `status --porcelain` lines, one per changed path
    pub changes: Vec<String>,
}

/// Git-backed sync over one Claude config directory.
pub struct ConfigSync {
    claude_dir: PathBuf,
}

impl ConfigSync {
    pub fn new(claude_dir: PathBuf) -> Self {
        Self { claude_dir }
    }

    fn git(&self) -> GitCommand {
        GitCommand::new().current_dir(&self.claude_dir)
    }

    pub fn is_initialized(&self) -> bool {
        self.claude_dir.join(".git").exists()
    }

    fn require_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(WorkbenchError::SyncNotInitialized {
                path: self.claude_dir.display().to_string(),
            }
            .into())
        }
    }

    /// Initialize the repository, seed a `.gitignore`, and optionally wire
    /// up the remote.
    pub async fn init(&self, remote_url: Option<&str>) -> Result<()> {
        crate::utils::ensure_dir(&self.claude_dir)?;
        self.git().args(["init"]).execute().await?;

        // sensitive or machine-local files stay out of the remote
        let gitignore = self.claude_dir.join(".gitignore");
        if !gitignore.exists() {
            safe_write(
                &gitignore,
                "settings.local.json\nprojects/\ntodos/\nstatsig/\n*.log\n",
            )?;
        }

        if let Some(url) = remote_url {
            // replace any previous origin rather than failing on re-init
            let existing = self.git().args(["remote"]).execute().await?;
            if existing.stdout.lines().any(|r| r.trim() == "origin") {
                self.git().args(["remote", "set-url", "origin", url]).execute().await?;
            } else {
                self.git().args(["remote", "add", "origin", url]).execute().await?;
            }
        }
        Ok(())
    }

    /// Current status: remote, branch, and changed paths.
    pub async fn status(&self) -> Result<SyncStatus> {
        if !self.is_initialized() {
            return Ok(SyncStatus {
                initialized: false,
                remote: None,
                branch: None,
                changes: Vec::new(),
            });
        }

        let remote = self
            .git()
            .args(["remote", "get-url", "origin"])
            .execute()
            .await
            .ok()
            .map(|o| o.stdout.trim().to_string());

        let branch = self
            .git()
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .execute()
            .await
            .ok()
            .map(|o| o.stdout.trim().to_string());

        let porcelain = self.git().args(["status", "--porcelain"]).execute().await?;
        let changes = porcelain
            .stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        Ok(SyncStatus {
            initialized: true,
            remote,
            branch,
            changes,
        })
    }

    /// Stage everything, commit, and push. Returns git's push output.
    /// A clean tree commits nothing but still pushes.
    pub async fn push(&self, message: &str) -> Result<GitOutput> {
        self.require_initialized()?;
        self.git().args(["add", "-A"]).execute().await?;

        let status = self.git().args(["status", "--porcelain"]).execute().await?;
        if !status.stdout.trim().is_empty() {
            self.git().args(["commit", "-m", message]).execute().await?;
        }

        let branch = self
            .git()
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .execute()
            .await?;
        self.git()
            .args(["push", "-u", "origin", branch.stdout.trim()])
            .execute()
            .await
    }

    /// Pull the remote state. Returns git's output verbatim.
    pub async fn pull(&self) -> Result<GitOutput> {
        self.require_initialized()?;
        self.git().args(["pull"]).execute().await
    }
}
