//! Command-line interface for the workbench.
//!
//! Every editor screen of the configuration workbench is a subcommand
//! family here: `template`, `deploy`, `mcp`, `perm`, `hooks`, `plugin`,
//! `prompt`, `settings`, `sync`, `prefs`, `backup`, and `open`. Each
//! command module owns its argument structs and an `execute` method; the
//! persistence logic lives in the library modules, which receive their
//! dependencies through [`AppContext`] rather than globals.
//!
//! # Global options
//!
//! - `--verbose` / `--quiet` - output level (sets the tracing filter)
//! - `--project <path>` - select project scope for scoped commands
//! - `--no-progress` - disable progress bars for automation
//!
//! # Examples
//!
//! ```bash
//! cwb template list agents
//! cwb deploy agents code-reviewer --project ~/work/api
//! cwb mcp add filesystem --template npx --package @modelcontextprotocol/server-filesystem
//! cwb perm add allow Bash "git:*"
//! cwb plugin browse anthropics/claude-code
//! cwb sync push -m "weekly backup"
//! ```

mod backup;
mod common;
mod deploy;
mod hooks;
mod mcp;
mod open;
mod perm;
mod plugin;
mod prefs;
mod prompt;
mod settings;
mod sync;
mod template;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::backup::BackupManager;
use crate::config::Paths;
use crate::prefs::Prefs;

/// Shared context handed to every command.
///
/// Explicit dependency injection: path layout, loaded preferences, and
/// output flags travel together instead of living in module-level state.
pub struct AppContext {
    pub paths: Paths,
    pub prefs: Prefs,
    pub project: Option<PathBuf>,
    pub quiet: bool,
    pub no_progress: bool,
}

impl AppContext {
    /// Backup manager rooted at the configured directories.
    pub fn backups(&self) -> BackupManager {
        BackupManager::new(self.paths.backups_dir(), self.paths.claude_dir().to_path_buf())
    }

    /// True when progress bars should be drawn.
    pub fn progress_enabled(&self) -> bool {
        !self.no_progress
            && !self.quiet
            && std::env::var(crate::constants::ENV_NO_PROGRESS).is_err()
    }
}

/// Top-level CLI for the Claude Code configuration workbench.
#[derive(Parser)]
#[command(
    name = "cwb",
    about = "Workbench for Claude Code configuration",
    version,
    long_about = "Browse, create, edit, and deploy Claude Code configuration artifacts: \
                  templates, MCP servers, permissions, hooks, plugins, and prompts."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug) output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Project directory for project-scoped operations
    #[arg(short, long, global = true, value_name = "PATH")]
    project: Option<String>,

    /// Disable progress bars and spinners
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the template library
    Template(template::TemplateCommand),
    /// Deploy templates into a Claude configuration tree
    Deploy(deploy::DeployCommand),
    /// Manage MCP server configurations
    Mcp(mcp::McpCommand),
    /// Manage permission rules
    Perm(perm::PermCommand),
    /// Manage hook configurations
    Hooks(hooks::HooksCommand),
    /// Manage plugins and marketplaces
    Plugin(plugin::PluginCommand),
    /// Manage prompts and import them from GitHub
    Prompt(prompt::PromptCommand),
    /// Inspect and edit settings files
    Settings(settings::SettingsCommand),
    /// Sync the Claude configuration through a git remote
    Sync(sync::SyncCommand),
    /// Workbench preferences (theme, font, tab layout)
    Prefs(prefs::PrefsCommand),
    /// Create, list, and restore configuration backups
    Backup(backup::BackupCommand),
    /// Open a configuration directory in the file manager
    Open(open::OpenCommand),
}

impl Cli {
    /// Execute the parsed command.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        let paths = Paths::discover()?;
        let prefs = Prefs::load_or_default(&paths.prefs_file());
        let project = match &self.project {
            Some(raw) => Some(crate::utils::platform::resolve_path(raw)?),
            None => None,
        };

        let ctx = AppContext {
            paths,
            prefs,
            project,
            quiet: self.quiet,
            no_progress: self.no_progress,
        };

        match self.command {
            Commands::Template(cmd) => cmd.execute(&ctx),
            Commands::Deploy(cmd) => cmd.execute(&ctx),
            Commands::Mcp(cmd) => cmd.execute(&ctx).await,
            Commands::Perm(cmd) => cmd.execute(&ctx),
            Commands::Hooks(cmd) => cmd.execute(&ctx),
            Commands::Plugin(cmd) => cmd.execute(&ctx).await,
            Commands::Prompt(cmd) => cmd.execute(&ctx).await,
            Commands::Settings(cmd) => cmd.execute(&ctx),
            Commands::Sync(cmd) => cmd.execute(&ctx).await,
            Commands::Prefs(cmd) => cmd.execute(&ctx),
            Commands::Backup(cmd) => cmd.execute(&ctx),
            Commands::Open(cmd) => cmd.execute(&ctx),
        }
    }

    fn init_logging(&self) {
        use tracing_subscriber::EnvFilter;

        let default = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}
