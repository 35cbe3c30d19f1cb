//! The `plugin` command family: enabled plugins, marketplaces, browsing,
//! and installation through the Claude CLI.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use super::AppContext;
use super::common::{settings_path, spinner};
use crate::github::{GitHubClient, RepoRef};
use crate::outln;
use crate::plugins::marketplace::fetch_marketplace;
use crate::plugins::{
    self, MarketplaceEntry, MarketplaceSource, PluginConfig, parse_plugin_ref,
};
use crate::settings::Settings;

#[derive(Args)]
pub struct PluginCommand {
    #[command(subcommand)]
    command: PluginSubcommand,
}

#[derive(Subcommand)]
enum PluginSubcommand {
    /// Show enabled plugins and installed repositories
    List,
    /// Enable a plugin (plugin-name@marketplace-name)
    Enable { name: String },
    /// Disable a plugin without removing it
    Disable { name: String },
    /// Remove a plugin from enabledPlugins
    Remove { name: String },
    /// Install a plugin via `claude plugin install`
    Install { name: String },
    /// Browse a marketplace repository's plugins
    Browse { repo: String },
    /// Show the current GitHub API rate limit
    RateLimit,
    /// Manage marketplace registrations
    #[command(subcommand)]
    Marketplace(MarketplaceSubcommand),
}

#[derive(Subcommand)]
enum MarketplaceSubcommand {
    /// List known marketplaces from both registries
    List,
    /// Register a GitHub marketplace in known_marketplaces.json
    Add {
        name: String,
        /// GitHub repository (owner/repo)
        repo: String,
        /// Register in settings.json extraKnownMarketplaces instead
        #[arg(long)]
        extra: bool,
    },
    /// Remove a marketplace registration
    Remove {
        name: String,
        /// Remove from settings.json extraKnownMarketplaces instead
        #[arg(long)]
        extra: bool,
    },
}

impl PluginCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        match self.command {
            PluginSubcommand::List => self.list(ctx),
            PluginSubcommand::Enable { ref name } => self.set_enabled(ctx, name, true),
            PluginSubcommand::Disable { ref name } => self.set_enabled(ctx, name, false),
            PluginSubcommand::Remove { ref name } => self.remove(ctx, name),
            PluginSubcommand::Install { ref name } => self.install(ctx, name).await,
            PluginSubcommand::Browse { ref repo } => self.browse(ctx, repo).await,
            PluginSubcommand::RateLimit => self.rate_limit(ctx).await,
            PluginSubcommand::Marketplace(ref cmd) => self.marketplace(ctx, cmd),
        }
    }

    fn list(&self, ctx: &AppContext) -> Result<()> {
        let settings = Settings::load_or_default(&settings_path(ctx, false))?;
        match &settings.enabled_plugins {
            Some(plugins) if !plugins.is_empty() => {
                outln!(ctx, "{}", "Enabled plugins (settings.json)".bold());
                for (name, enabled) in plugins {
                    let state = if *enabled { "on".green() } else { "off".red() };
                    outln!(ctx, "  {name:<40} {state}");
                }
            }
            _ => outln!(ctx, "No plugins in enabledPlugins"),
        }

        let config = PluginConfig::load_or_default(&ctx.paths.plugin_config_file())?;
        if config.repositories.is_empty() {
            outln!(ctx, "No installed plugin repositories");
        } else {
            outln!(ctx, "{}", "Installed repositories (plugins/config.json)".bold());
            for name in config.repositories.keys() {
                outln!(ctx, "  {name}");
            }
        }
        Ok(())
    }

    fn set_enabled(&self, ctx: &AppContext, name: &str, enabled: bool) -> Result<()> {
        parse_plugin_ref(name)?;
        let path = settings_path(ctx, false);
        let mut settings = Settings::load_or_default(&path)?;
        settings
            .enabled_plugins_mut()
            .insert(name.to_string(), enabled);
        settings.save(&path, &ctx.backups())?;
        outln!(ctx, "{} {name}", if enabled { "Enabled" } else { "Disabled" });
        Ok(())
    }

    fn remove(&self, ctx: &AppContext, name: &str) -> Result<()> {
        let path = settings_path(ctx, false);
        let mut settings = Settings::load_or_default(&path)?;
        if settings.enabled_plugins_mut().remove(name).is_none() {
            anyhow::bail!("'{name}' is not in enabledPlugins");
        }
        settings.save(&path, &ctx.backups())?;
        outln!(ctx, "Removed {name}");
        Ok(())
    }

    async fn install(&self, ctx: &AppContext, name: &str) -> Result<()> {
        let bar = spinner(ctx, &format!("claude plugin install {name}"));
        let outcome = plugins::install_plugin(name).await?;
        bar.finish_and_clear();

        // the CLI's output is the user's feedback, verbatim
        if !outcome.stdout.is_empty() {
            print!("{}", outcome.stdout);
        }
        if !outcome.stderr.is_empty() {
            eprint!("{}", outcome.stderr);
        }
        if !outcome.success {
            anyhow::bail!("claude plugin install failed");
        }
        Ok(())
    }

    async fn browse(&self, ctx: &AppContext, repo: &str) -> Result<()> {
        let repo = RepoRef::parse(repo)?;
        let client = GitHubClient::new(
            Some(ctx.prefs.github.token.clone()),
            ctx.prefs.github_timeout(),
        )?;

        let bar = spinner(ctx, &format!("fetching marketplace metadata from {repo}"));
        let data = fetch_marketplace(&client, &repo).await;
        bar.finish_and_clear();
        let data = data?;

        if let Some(name) = &data.name {
            outln!(ctx, "{} ({})", name.bold(), data.strategy.describe());
        } else {
            outln!(ctx, "{} ({})", repo.to_string().bold(), data.strategy.describe());
        }
        for plugin in &data.plugins {
            outln!(
                ctx,
                "  {:<28} {:<10} {}",
                plugin.name,
                plugin.version.as_deref().unwrap_or("-"),
                plugin.description.as_deref().unwrap_or("").dimmed()
            );
        }
        Ok(())
    }

    async fn rate_limit(&self, ctx: &AppContext) -> Result<()> {
        let client = GitHubClient::new(
            Some(ctx.prefs.github.token.clone()),
            ctx.prefs.github_timeout(),
        )?;
        let limit = client.rate_limit().await?;
        outln!(ctx, "{}/{} requests remaining", limit.remaining, limit.limit);
        if limit.remaining == 0 {
            outln!(ctx, "resets at unix time {}", limit.reset);
        }
        Ok(())
    }

    fn marketplace(&self, ctx: &AppContext, cmd: &MarketplaceSubcommand) -> Result<()> {
        match cmd {
            MarketplaceSubcommand::List => {
                let known =
                    plugins::load_known_marketplaces(&ctx.paths.known_marketplaces_file())?;
                if known.is_empty() {
                    outln!(ctx, "No marketplaces in known_marketplaces.json");
                } else {
                    outln!(ctx, "{}", "known_marketplaces.json".bold());
                    for (name, entry) in &known {
                        outln!(
                            ctx,
                            "  {name:<24} {} ({})",
                            entry.source.location(),
                            entry.source.source.as_deref().unwrap_or("unknown")
                        );
                    }
                }

                let settings = Settings::load_or_default(&settings_path(ctx, false))?;
                if let Some(extra) = &settings.extra_known_marketplaces {
                    if !extra.is_empty() {
                        outln!(ctx, "{}", "settings.json extraKnownMarketplaces".bold());
                        for name in extra.keys() {
                            outln!(ctx, "  {name}");
                        }
                    }
                }
                Ok(())
            }
            MarketplaceSubcommand::Add { name, repo, extra } => {
                RepoRef::parse(repo)?;
                if *extra {
                    let path = settings_path(ctx, false);
                    let mut settings = Settings::load_or_default(&path)?;
                    let entry = serde_json::to_value(MarketplaceEntry {
                        source: MarketplaceSource::github(repo),
                        other: Default::default(),
                    })?;
                    settings
                        .extra_known_marketplaces
                        .get_or_insert_with(Default::default)
                        .insert(name.clone(), entry);
                    settings.save(&path, &ctx.backups())?;
                } else {
                    let path = ctx.paths.known_marketplaces_file();
                    let mut known = plugins::load_known_marketplaces(&path)?;
                    known.insert(
                        name.clone(),
                        MarketplaceEntry {
                            source: MarketplaceSource::github(repo),
                            other: Default::default(),
                        },
                    );
                    plugins::save_known_marketplaces(&path, &known)?;
                }
                outln!(ctx, "Registered marketplace '{name}' ({repo})");
                Ok(())
            }
            MarketplaceSubcommand::Remove { name, extra } => {
                if *extra {
                    let path = settings_path(ctx, false);
                    let mut settings = Settings::load_or_default(&path)?;
                    let removed = settings
                        .extra_known_marketplaces
                        .as_mut()
                        .and_then(|m| m.remove(name))
                        .is_some();
                    if !removed {
                        anyhow::bail!("'{name}' is not in extraKnownMarketplaces");
                    }
                    settings.save(&path, &ctx.backups())?;
                } else {
                    let path = ctx.paths.known_marketplaces_file();
                    let mut known = plugins::load_known_marketplaces(&path)?;
                    if known.remove(name).is_none() {
                        anyhow::bail!("'{name}' is not in known_marketplaces.json");
                    }
                    plugins::save_known_marketplaces(&path, &known)?;
                }
                outln!(ctx, "Removed marketplace '{name}'");
                Ok(())
            }
        }
    }
}
