//! The `backup` command family.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use super::AppContext;
use crate::backup::format_size;
use crate::outln;

#[derive(Args)]
pub struct BackupCommand {
    #[command(subcommand)]
    command: BackupSubcommand,
}

#[derive(Subcommand)]
enum BackupSubcommand {
    /// Create a full backup of ~/.claude
    Create,
    /// List backups, newest first
    List,
    /// Restore a backup over ~/.claude
    Restore {
        /// Backup name as shown by `backup list`
        name: String,
    },
}

impl BackupCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<()> {
        let backups = ctx.backups();

        match self.command {
            BackupSubcommand::Create => {
                let path = backups.create_full_backup()?;
                outln!(ctx, "Backup created at {}", path.display());
                Ok(())
            }
            BackupSubcommand::List => {
                let list = backups.list()?;
                if list.is_empty() {
                    outln!(ctx, "No backups yet");
                    return Ok(());
                }
                for info in list {
                    outln!(
                        ctx,
                        "{:<34} {:>10}  {}",
                        info.name.bold(),
                        format_size(info.size_bytes),
                        info.metadata.date.dimmed()
                    );
                }
                Ok(())
            }
            BackupSubcommand::Restore { name } => {
                backups.restore(&name)?;
                outln!(ctx, "Restored {name} over {}", ctx.paths.claude_dir().display());
                Ok(())
            }
        }
    }
}
