//! The `prefs` command family: the workbench's own preferences.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use super::AppContext;
use crate::outln;
use crate::prefs::{Prefs, TabEntry};

#[derive(Args)]
pub struct PrefsCommand {
    #[command(subcommand)]
    command: PrefsSubcommand,
}

#[derive(Subcommand)]
enum PrefsSubcommand {
    /// Print all preferences as JSON
    Show,
    /// Read one key (theme, font.family, font.size, github.token,
    /// github.timeout)
    Get { key: String },
    /// Write one key
    Set { key: String, value: String },
    /// Tab layout operations
    #[command(subcommand)]
    Tabs(TabsSubcommand),
}

#[derive(Subcommand)]
enum TabsSubcommand {
    /// List tabs in order
    List,
    /// Add a tab entry
    Add { id: String, title: String },
    /// Rename a tab
    Rename { id: String, title: String },
    /// Move a tab to a position (0-based)
    Move { id: String, position: usize },
    /// Hide a tab without losing its position
    Hide { id: String },
    /// Show a hidden tab
    Show { id: String },
}

impl PrefsCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<()> {
        let path = ctx.paths.prefs_file();
        let mut prefs = Prefs::load_or_default(&path);

        match self.command {
            PrefsSubcommand::Show => {
                println!("{}", serde_json::to_string_pretty(&prefs)?);
                Ok(())
            }
            PrefsSubcommand::Get { key } => {
                let value = match key.as_str() {
                    "theme" => prefs.theme.clone(),
                    "font.family" => prefs.font_family.clone().unwrap_or_default(),
                    "font.size" => prefs
                        .font_size
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    "github.token" => prefs.github.token.clone(),
                    "github.timeout" => prefs.github_timeout().as_secs().to_string(),
                    other => anyhow::bail!("unknown preference key '{other}'"),
                };
                outln!(ctx, "{value}");
                Ok(())
            }
            PrefsSubcommand::Set { key, value } => {
                match key.as_str() {
                    "theme" => prefs.theme = value.clone(),
                    "font.family" => prefs.font_family = Some(value.clone()),
                    "font.size" => prefs.font_size = Some(value.parse()?),
                    "github.token" => prefs.github.token = value.clone(),
                    "github.timeout" => prefs.github.request_timeout = Some(value.parse()?),
                    other => anyhow::bail!("unknown preference key '{other}'"),
                }
                prefs.save(&path)?;
                outln!(ctx, "Set {key}");
                Ok(())
            }
            PrefsSubcommand::Tabs(cmd) => {
                match cmd {
                    TabsSubcommand::List => {
                        if prefs.tabs.is_empty() {
                            outln!(ctx, "No tab layout configured (frontend default order)");
                            return Ok(());
                        }
                        for (i, tab) in prefs.tabs.iter().enumerate() {
                            let visibility = if tab.visible {
                                String::new()
                            } else {
                                format!(" {}", "(hidden)".dimmed())
                            };
                            outln!(ctx, "{i}: {} - {}{visibility}", tab.id.bold(), tab.title);
                        }
                        return Ok(());
                    }
                    TabsSubcommand::Add { id, title } => {
                        if prefs.tab(&id).is_some() {
                            anyhow::bail!("tab '{id}' already exists");
                        }
                        prefs.tabs.push(TabEntry {
                            id,
                            title,
                            visible: true,
                        });
                    }
                    TabsSubcommand::Rename { id, title } => {
                        if !prefs.rename_tab(&id, &title) {
                            anyhow::bail!("no tab with id '{id}'");
                        }
                    }
                    TabsSubcommand::Move { id, position } => {
                        if !prefs.move_tab(&id, position) {
                            anyhow::bail!("no tab with id '{id}'");
                        }
                    }
                    TabsSubcommand::Hide { id } => {
                        set_tab_visibility(&mut prefs, &id, false)?;
                    }
                    TabsSubcommand::Show { id } => {
                        set_tab_visibility(&mut prefs, &id, true)?;
                    }
                }
                prefs.save(&path)?;
                outln!(ctx, "Tab layout updated (restart frontends to apply)");
                Ok(())
            }
        }
    }
}

fn set_tab_visibility(prefs: &mut Prefs, id: &str, visible: bool) -> Result<()> {
    match prefs.tabs.iter_mut().find(|t| t.id == id) {
        Some(tab) => {
            tab.visible = visible;
            Ok(())
        }
        None => anyhow::bail!("no tab with id '{id}'"),
    }
}
