//! The `template` command family: the library of reusable definitions.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use super::AppContext;
use super::common::content_from;
use crate::outln;
use crate::templates::{Entry, TemplateKind, TemplateStore};

#[derive(Args)]
pub struct TemplateCommand {
    #[command(subcommand)]
    command: TemplateSubcommand,
}

#[derive(Subcommand)]
enum TemplateSubcommand {
    /// List templates of a kind, grouped by folder
    List {
        kind: TemplateKind,
    },
    /// Print a template's content
    Show {
        kind: TemplateKind,
        name: String,
    },
    /// Show a template's frontmatter summary
    Info {
        kind: TemplateKind,
        name: String,
    },
    /// Add a template from a file (or stdin with `-`)
    Add {
        kind: TemplateKind,
        /// Template name, optionally with one folder level (`folder/name`)
        name: String,
        /// Content source; defaults to stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Overwrite an existing template
        #[arg(long)]
        force: bool,
    },
    /// Replace a template's content from a file (or stdin)
    Edit {
        kind: TemplateKind,
        name: String,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Delete a template
    Delete {
        kind: TemplateKind,
        name: String,
    },
    /// Instantiate a template under a new name and print the result
    New {
        kind: TemplateKind,
        /// Source template
        template: String,
        /// Name for the new artifact ({name} placeholders are filled in)
        target_name: String,
        /// Also save the result as a template under the target name
        #[arg(long)]
        save: bool,
    },
    /// Import every matching file from a directory as templates
    BulkAdd {
        kind: TemplateKind,
        dir: PathBuf,
    },
}

impl TemplateCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<()> {
        let store = TemplateStore::new(ctx.paths.templates_dir());
        match self.command {
            TemplateSubcommand::List { kind } => {
                let entries = store.entries(kind)?;
                if entries.is_empty() {
                    outln!(ctx, "No {kind} templates yet");
                    return Ok(());
                }
                for entry in entries {
                    match entry {
                        Entry::Folder { name, templates } => {
                            outln!(ctx, "{}/", name.bold());
                            for template in templates {
                                outln!(ctx, "  {name}/{template}");
                            }
                        }
                        Entry::Template { name } => outln!(ctx, "{name}"),
                    }
                }
                Ok(())
            }
            TemplateSubcommand::Show { kind, name } => {
                print!("{}", store.read(kind, &name)?);
                Ok(())
            }
            TemplateSubcommand::Info { kind, name } => {
                let info = store.info(kind, &name)?;
                outln!(ctx, "{}: {}", "name".bold(), info.name.as_deref().unwrap_or("-"));
                outln!(
                    ctx,
                    "{}: {}",
                    "description".bold(),
                    info.description.as_deref().unwrap_or("-")
                );
                for (label, value) in [
                    ("tools", &info.tools),
                    ("model", &info.model),
                    ("color", &info.color),
                ] {
                    if let Some(value) = value {
                        outln!(ctx, "{}: {value}", label.bold());
                    }
                }
                for (key, value) in &info.extra {
                    outln!(ctx, "{}: {}", key.bold(), serde_yaml::to_string(value)?.trim());
                }
                Ok(())
            }
            TemplateSubcommand::Add {
                kind,
                name,
                file,
                force,
            } => {
                if !force && store.template_path(kind, &name).exists() {
                    anyhow::bail!("template '{name}' already exists (use --force to overwrite)");
                }
                let content = content_from(file.as_deref())?;
                let path = store.save(kind, &name, &content)?;
                outln!(ctx, "Saved {}", path.display());
                Ok(())
            }
            TemplateSubcommand::Edit { kind, name, file } => {
                // read first so an unknown name errors before stdin is consumed
                store.read(kind, &name)?;
                let content = content_from(file.as_deref())?;
                store.save(kind, &name, &content)?;
                outln!(ctx, "Updated {name}");
                Ok(())
            }
            TemplateSubcommand::Delete { kind, name } => {
                if store.delete(kind, &name)? {
                    outln!(ctx, "Deleted {name}");
                } else {
                    outln!(ctx, "No such template: {name}");
                }
                Ok(())
            }
            TemplateSubcommand::New {
                kind,
                template,
                target_name,
                save,
            } => {
                let content = store.instantiate(kind, &template, &target_name)?;
                if save {
                    store.save(kind, &target_name, &content)?;
                    outln!(ctx, "Saved template {target_name}");
                } else {
                    print!("{content}");
                }
                Ok(())
            }
            TemplateSubcommand::BulkAdd { kind, dir } => {
                let report = store.bulk_add(kind, &dir)?;
                outln!(
                    ctx,
                    "{} added, {} skipped (already present)",
                    report.added,
                    report.skipped
                );
                Ok(())
            }
        }
    }
}
