//! The `prompt` command family: the promptInfo.json store and GitHub
//! import with per-item conflict resolution.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::AppContext;
use super::common::{content_from, spinner};
use crate::github::{GitHubClient, RepoRef};
use crate::outln;
use crate::prompts::{
    self, ConflictResolution, PromptRecord, find_prompt, load_prompts, save_prompts,
};

#[derive(Args)]
pub struct PromptCommand {
    #[command(subcommand)]
    command: PromptSubcommand,
}

#[derive(Subcommand)]
enum PromptSubcommand {
    /// List prompt records
    List,
    /// Print one prompt's text
    Show { cmd: String },
    /// Add a prompt; text from --file or stdin
    Add {
        /// Command key (CMD)
        cmd: String,
        /// Display name (ACT); defaults to the command key
        #[arg(long)]
        act: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Remove a prompt
    Remove { cmd: String },
    /// Enable a prompt
    Enable { cmd: String },
    /// Disable a prompt
    Disable { cmd: String },
    /// Import prompts from a GitHub repository
    Import {
        /// Repository (owner/repo or a github.com URL)
        repo: String,
        /// Strategy for records whose CMD already exists
        #[arg(long, value_enum, default_value = "skip")]
        on_conflict: ConflictResolution,
        /// Fetch and report only; write nothing
        #[arg(long)]
        dry_run: bool,
    },
}

impl PromptCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        let path = ctx.paths.prompt_info_file();
        let mut records = load_prompts(&path)?;

        match self.command {
            PromptSubcommand::List => {
                if records.is_empty() {
                    outln!(ctx, "No prompts in {}", path.display());
                    return Ok(());
                }
                for record in &records {
                    let state = if record.enable { "on".green() } else { "off".red() };
                    outln!(ctx, "{:<20} {:<4} {}", record.cmd.bold(), state, record.act);
                }
                Ok(())
            }
            PromptSubcommand::Show { cmd } => {
                let index = find_prompt(&records, &cmd).ok_or_else(|| {
                    crate::core::WorkbenchError::PromptNotFound { cmd: cmd.clone() }
                })?;
                println!("{}", records[index].prompt);
                Ok(())
            }
            PromptSubcommand::Add { cmd, act, file } => {
                if find_prompt(&records, &cmd).is_some() {
                    anyhow::bail!("prompt '{cmd}' already exists");
                }
                let text = content_from(file.as_deref())?;
                records.push(PromptRecord {
                    act: act.unwrap_or_else(|| cmd.clone()),
                    cmd: cmd.clone(),
                    prompt: text.trim_end().to_string(),
                    enable: true,
                    other: BTreeMap::new(),
                });
                save_prompts(&path, &records)?;
                outln!(ctx, "Added '{cmd}'");
                Ok(())
            }
            PromptSubcommand::Remove { cmd } => {
                let index = find_prompt(&records, &cmd).ok_or_else(|| {
                    crate::core::WorkbenchError::PromptNotFound { cmd: cmd.clone() }
                })?;
                records.remove(index);
                save_prompts(&path, &records)?;
                outln!(ctx, "Removed '{cmd}'");
                Ok(())
            }
            PromptSubcommand::Enable { cmd } => {
                prompts::set_enabled(&mut records, &cmd, true)?;
                save_prompts(&path, &records)?;
                outln!(ctx, "Enabled '{cmd}'");
                Ok(())
            }
            PromptSubcommand::Disable { cmd } => {
                prompts::set_enabled(&mut records, &cmd, false)?;
                save_prompts(&path, &records)?;
                outln!(ctx, "Disabled '{cmd}'");
                Ok(())
            }
            PromptSubcommand::Import {
                repo,
                on_conflict,
                dry_run,
            } => {
                let repo = RepoRef::parse(&repo)?;
                let client = GitHubClient::new(
                    Some(ctx.prefs.github.token.clone()),
                    ctx.prefs.github_timeout(),
                )?;

                let bar = spinner(ctx, &format!("fetching prompts from {repo}"));
                let fetched = prompts::fetch_prompts(&client, &repo).await;
                bar.finish_and_clear();
                let fetched = fetched?;

                if fetched.from_markdown {
                    outln!(
                        ctx,
                        "promptInfo.json not found; synthesized {} prompt(s) from .md files",
                        fetched.prompts.len()
                    );
                }

                // apply the chosen strategy to every conflicting CMD
                let resolutions: BTreeMap<String, ConflictResolution> = fetched
                    .prompts
                    .iter()
                    .filter(|p| find_prompt(&records, &p.cmd).is_some())
                    .map(|p| (p.cmd.clone(), on_conflict))
                    .collect();

                if dry_run {
                    outln!(
                        ctx,
                        "{} fetched, {} conflicting (dry run, nothing written)",
                        fetched.prompts.len(),
                        resolutions.len()
                    );
                    return Ok(());
                }

                let report = prompts::merge_prompts(&mut records, fetched.prompts, &resolutions);
                save_prompts(&path, &records)?;
                outln!(
                    ctx,
                    "{} added, {} updated, {} skipped",
                    report.added.to_string().green(),
                    report.updated,
                    report.skipped
                );
                Ok(())
            }
        }
    }
}
