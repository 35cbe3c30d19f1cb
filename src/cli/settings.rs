//! The `settings` command family: direct views and edits of the settings
//! files (env vars, model, merged project view).

use anyhow::Result;
use clap::{Args, Subcommand};

use super::AppContext;
use super::common::{resolve_scope, settings_path};
use crate::config::Scope;
use crate::outln;
use crate::settings::{Settings, merged_view};

#[derive(Args)]
pub struct SettingsCommand {
    #[command(subcommand)]
    command: SettingsSubcommand,

    /// Edit settings.local.json instead of settings.json
    #[arg(long, global = true)]
    local: bool,
}

#[derive(Subcommand)]
enum SettingsSubcommand {
    /// Print a settings file as JSON; for project scope, --merged overlays
    /// local over shared
    Show {
        #[arg(long)]
        merged: bool,
    },
    /// Environment variables in the settings file
    #[command(subcommand)]
    Env(EnvSubcommand),
    /// The model key in the settings file
    #[command(subcommand)]
    Model(ModelSubcommand),
}

#[derive(Subcommand)]
enum EnvSubcommand {
    List,
    Set { key: String, value: String },
    Unset { key: String },
}

#[derive(Subcommand)]
enum ModelSubcommand {
    Get,
    Set { model: String },
    Unset,
}

impl SettingsCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<()> {
        let path = settings_path(ctx, self.local);

        match self.command {
            SettingsSubcommand::Show { merged } => {
                if merged {
                    let Scope::Project(_) = resolve_scope(ctx) else {
                        anyhow::bail!("--merged requires --project");
                    };
                    let scope = resolve_scope(ctx);
                    let shared = Settings::load_or_default(&ctx.paths.settings_file(&scope))?;
                    let local =
                        Settings::load_or_default(&ctx.paths.settings_local_file(&scope))?;
                    println!("{}", serde_json::to_string_pretty(&merged_view(&shared, &local)?)?);
                } else {
                    let settings = Settings::load_or_default(&path)?;
                    println!("{}", serde_json::to_string_pretty(&settings)?);
                }
                Ok(())
            }
            SettingsSubcommand::Env(cmd) => {
                let mut settings = Settings::load_or_default(&path)?;
                match cmd {
                    EnvSubcommand::List => {
                        match &settings.env {
                            Some(env) if !env.is_empty() => {
                                for (key, value) in env {
                                    outln!(ctx, "{key}={}", display_value(value));
                                }
                            }
                            _ => outln!(ctx, "No env entries in {}", path.display()),
                        }
                        Ok(())
                    }
                    EnvSubcommand::Set { key, value } => {
                        settings
                            .env_mut()
                            .insert(key.clone(), serde_json::Value::String(value));
                        settings.save(&path, &ctx.backups())?;
                        outln!(ctx, "Set {key}");
                        Ok(())
                    }
                    EnvSubcommand::Unset { key } => {
                        if settings.env_mut().remove(&key).is_none() {
                            anyhow::bail!("'{key}' is not set");
                        }
                        settings.save(&path, &ctx.backups())?;
                        outln!(ctx, "Unset {key}");
                        Ok(())
                    }
                }
            }
            SettingsSubcommand::Model(cmd) => {
                let mut settings = Settings::load_or_default(&path)?;
                match cmd {
                    ModelSubcommand::Get => {
                        outln!(ctx, "{}", settings.model.as_deref().unwrap_or("(default)"));
                        Ok(())
                    }
                    ModelSubcommand::Set { model } => {
                        settings.model = Some(model.clone());
                        settings.save(&path, &ctx.backups())?;
                        outln!(ctx, "Model set to {model}");
                        Ok(())
                    }
                    ModelSubcommand::Unset => {
                        settings.model = None;
                        settings.save(&path, &ctx.backups())?;
                        outln!(ctx, "Model reset to default");
                        Ok(())
                    }
                }
            }
        }
    }
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
