//! The `perm` command family: the allow/deny/ask rule arrays.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use super::AppContext;
use super::common::settings_path;
use crate::outln;
use crate::permissions::{PermissionLevel, build_permission, parse_permission};
use crate::settings::Settings;

#[derive(Args)]
pub struct PermCommand {
    #[command(subcommand)]
    command: PermSubcommand,

    /// Edit settings.local.json instead of settings.json
    #[arg(long, global = true)]
    local: bool,
}

#[derive(Subcommand)]
enum PermSubcommand {
    /// List rules as parsed rows
    List,
    /// Add a rule to a level
    Add {
        level: PermissionLevel,
        /// Tool name (Bash, Read, WebFetch, mcp__server__tool, ...)
        tool: String,
        /// Pattern for the tool, when it takes one
        pattern: Option<String>,
    },
    /// Remove a rule from a level (exact string match)
    Remove {
        level: PermissionLevel,
        entry: String,
    },
    /// Move a rule between levels
    Move {
        from: PermissionLevel,
        to: PermissionLevel,
        entry: String,
    },
}

impl PermCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<()> {
        let path = settings_path(ctx, self.local);
        let mut settings = Settings::load_or_default(&path)?;

        match self.command {
            PermSubcommand::List => {
                let Some(permissions) = &settings.permissions else {
                    outln!(ctx, "No permission rules in {}", path.display());
                    return Ok(());
                };
                for level in [PermissionLevel::Allow, PermissionLevel::Deny, PermissionLevel::Ask] {
                    for entry in permissions.level(level) {
                        let parsed = parse_permission(entry);
                        let level_label = match level {
                            PermissionLevel::Allow => level.label().green(),
                            PermissionLevel::Deny => level.label().red(),
                            PermissionLevel::Ask => level.label().yellow(),
                        };
                        outln!(
                            ctx,
                            "{:<6} {:<10} {}",
                            level_label,
                            parsed.kind.label(),
                            parsed.pattern
                        );
                    }
                }
                Ok(())
            }
            PermSubcommand::Add {
                level,
                tool,
                pattern,
            } => {
                let entry = build_permission(&tool, pattern.as_deref());
                let list = settings.permissions_mut().level_mut(level);
                if list.contains(&entry) {
                    outln!(ctx, "'{entry}' is already in {level}");
                    return Ok(());
                }
                list.push(entry.clone());
                settings.save(&path, &ctx.backups())?;
                outln!(ctx, "Added '{entry}' to {level}");
                Ok(())
            }
            PermSubcommand::Remove { level, entry } => {
                let list = settings.permissions_mut().level_mut(level);
                let before = list.len();
                list.retain(|e| e != &entry);
                if list.len() == before {
                    anyhow::bail!("'{entry}' is not in {level}");
                }
                settings.save(&path, &ctx.backups())?;
                outln!(ctx, "Removed '{entry}' from {level}");
                Ok(())
            }
            PermSubcommand::Move { from, to, entry } => {
                let source = settings.permissions_mut().level_mut(from);
                let before = source.len();
                source.retain(|e| e != &entry);
                if source.len() == before {
                    anyhow::bail!("'{entry}' is not in {from}");
                }
                let dest = settings.permissions_mut().level_mut(to);
                if !dest.contains(&entry) {
                    dest.push(entry.clone());
                }
                settings.save(&path, &ctx.backups())?;
                outln!(ctx, "Moved '{entry}' from {from} to {to}");
                Ok(())
            }
        }
    }
}
