//! The `hooks` command family: event handlers in the settings files.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use super::AppContext;
use super::common::{content_from, settings_path};
use crate::hooks::{self, HookEvent};
use crate::outln;
use crate::settings::Settings;

#[derive(Args)]
pub struct HooksCommand {
    #[command(subcommand)]
    command: HooksSubcommand,

    /// Edit settings.local.json instead of settings.json
    #[arg(long, global = true)]
    local: bool,
}

#[derive(Subcommand)]
enum HooksSubcommand {
    /// Show the nine events and how many entries each has
    List,
    /// Print the raw hooks block as JSON
    Show,
    /// Insert a template entry for an event
    Add {
        /// Event name (PreToolUse, Stop, SessionStart, ...)
        event: String,
    },
    /// Replace the whole hooks block from a file (or stdin)
    Edit {
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Remove all entries for an event
    Remove { event: String },
}

impl HooksCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<()> {
        let path = settings_path(ctx, self.local);
        let mut settings = Settings::load_or_default(&path)?;

        match self.command {
            HooksSubcommand::List => {
                for status in hooks::event_statuses(&settings)? {
                    let marker = if status.entries > 0 {
                        format!("{} ({})", "configured".green(), status.entries)
                    } else {
                        "-".dimmed().to_string()
                    };
                    let name = if status.known {
                        status.event.clone()
                    } else {
                        format!("{} (unknown event)", status.event)
                    };
                    outln!(ctx, "{name:<18} {marker}");
                }
                Ok(())
            }
            HooksSubcommand::Show => {
                match &settings.hooks {
                    Some(value) => println!("{}", serde_json::to_string_pretty(value)?),
                    None => outln!(ctx, "No hooks block in {}", path.display()),
                }
                Ok(())
            }
            HooksSubcommand::Add { event } => {
                let event = HookEvent::from_name(&event);
                hooks::add_template(&mut settings, &event)?;
                settings.save(&path, &ctx.backups())?;
                outln!(ctx, "Added a template entry for {}", event.as_str());
                Ok(())
            }
            HooksSubcommand::Edit { file } => {
                let raw = content_from(file.as_deref())?;
                hooks::replace_block(&mut settings, &raw)?;
                settings.save(&path, &ctx.backups())?;
                outln!(ctx, "Replaced the hooks block in {}", path.display());
                Ok(())
            }
            HooksSubcommand::Remove { event } => {
                let Some(value) = &settings.hooks else {
                    anyhow::bail!("no hooks block in {}", path.display());
                };
                let mut block = hooks::parse_block(value)?;
                if block.remove(&event).is_none() {
                    anyhow::bail!("no entries for event '{event}'");
                }
                settings.hooks = Some(serde_json::to_value(&block)?);
                settings.save(&path, &ctx.backups())?;
                outln!(ctx, "Removed all entries for {event}");
                Ok(())
            }
        }
    }
}
