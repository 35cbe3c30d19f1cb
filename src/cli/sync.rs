//! The `sync` command family: back up the config tree through git.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use super::AppContext;
use crate::outln;
use crate::sync::ConfigSync;

#[derive(Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    command: SyncSubcommand,
}

#[derive(Subcommand)]
enum SyncSubcommand {
    /// Initialize git in ~/.claude and optionally set the remote
    Init {
        /// Remote URL (e.g. git@github.com:me/claude-config.git)
        remote: Option<String>,
    },
    /// Show repository, remote, and pending changes
    Status,
    /// Stage, commit, and push the configuration
    Push {
        /// Commit message
        #[arg(short, long, default_value = "Update Claude configuration")]
        message: String,
    },
    /// Pull the configuration from the remote
    Pull,
}

impl SyncCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        let sync = ConfigSync::new(ctx.paths.claude_dir().to_path_buf());

        match self.command {
            SyncSubcommand::Init { remote } => {
                sync.init(remote.as_deref()).await?;
                match remote {
                    Some(url) => outln!(ctx, "Initialized sync with remote {url}"),
                    None => outln!(ctx, "Initialized local repository (no remote yet)"),
                }
                Ok(())
            }
            SyncSubcommand::Status => {
                let status = sync.status().await?;
                if !status.initialized {
                    outln!(ctx, "{} not a git repository; run `cwb sync init`", "sync:".yellow());
                    return Ok(());
                }
                outln!(ctx, "branch: {}", status.branch.as_deref().unwrap_or("-"));
                outln!(ctx, "remote: {}", status.remote.as_deref().unwrap_or("(none)"));
                if status.changes.is_empty() {
                    outln!(ctx, "{}", "clean".green());
                } else {
                    outln!(ctx, "{} pending change(s):", status.changes.len());
                    for change in &status.changes {
                        outln!(ctx, "  {change}");
                    }
                }
                Ok(())
            }
            SyncSubcommand::Push { message } => {
                let output = sync.push(&message).await?;
                // git reports push results on stderr
                if !output.stderr.is_empty() {
                    outln!(ctx, "{}", output.stderr.trim_end());
                }
                if !output.stdout.is_empty() {
                    outln!(ctx, "{}", output.stdout.trim_end());
                }
                Ok(())
            }
            SyncSubcommand::Pull => {
                let output = sync.pull().await?;
                if !output.stdout.is_empty() {
                    outln!(ctx, "{}", output.stdout.trim_end());
                }
                if !output.stderr.is_empty() {
                    outln!(ctx, "{}", output.stderr.trim_end());
                }
                Ok(())
            }
        }
    }
}
