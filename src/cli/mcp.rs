//! The `mcp` command family: server entries across the three scopes.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::collections::BTreeMap;

use super::AppContext;
use crate::mcp::{
    self, InvocationTemplate, McpScope, McpServerConfig, McpStore, ProjectTarget,
};
use crate::outln;

#[derive(Args)]
pub struct McpCommand {
    #[command(subcommand)]
    command: McpSubcommand,

    /// Scope to operate on; defaults to project when --project is set,
    /// local otherwise
    #[arg(long, global = true, value_enum)]
    scope: Option<McpScope>,

    /// Which file a project-scope write lands in
    #[arg(long, global = true, value_enum, default_value = "mcp-json")]
    target: ProjectTarget,
}

#[derive(Subcommand)]
enum McpSubcommand {
    /// List servers, tagged with their origin file
    List,
    /// Print one server's configuration as JSON
    Show { name: String },
    /// Add or replace a server entry
    Add {
        name: String,
        /// Pre-fill command/args from a convention
        #[arg(long, value_enum, requires = "package")]
        template: Option<InvocationTemplate>,
        /// Package for --template (e.g. @modelcontextprotocol/server-filesystem)
        #[arg(long, requires = "template")]
        package: Option<String>,
        /// Command for stdio servers
        #[arg(long, conflicts_with = "template")]
        command: Option<String>,
        /// Arguments for --command, repeatable
        #[arg(long = "arg")]
        args: Vec<String>,
        /// URL for http/sse servers
        #[arg(long, conflicts_with_all = ["template", "command"])]
        url: Option<String>,
        /// Transport for --url servers
        #[arg(long, default_value = "http")]
        transport: String,
        /// Environment variables as KEY=VALUE, repeatable
        #[arg(long = "env")]
        env: Vec<String>,
        /// Wrap the command with `cmd /c` (Windows invocation syntax)
        #[arg(long)]
        wrap_cmd: bool,
    },
    /// Remove a server entry
    Remove { name: String },
    /// Wrap a server's command with `cmd /c`
    Wrap { name: String },
    /// Strip a server's `cmd /c` wrapper
    Unwrap { name: String },
    /// Structurally validate servers; --fix applies the suggested fixes
    Validate {
        /// Validate one server instead of all
        name: Option<String>,
        /// Apply fixes (wrap bare npx commands)
        #[arg(long)]
        fix: bool,
    },
}

impl McpCommand {
    fn scope(&self, ctx: &AppContext) -> McpScope {
        self.scope.unwrap_or(if ctx.project.is_some() {
            McpScope::Project
        } else {
            McpScope::Local
        })
    }

    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        let scope = self.scope(ctx);
        let target = self.target;
        let store = McpStore::new(&ctx.paths);
        let project = ctx.project.as_deref();

        match self.command {
            McpSubcommand::List => {
                let rows = store.list(scope, project)?;
                if rows.is_empty() {
                    outln!(ctx, "No MCP servers in {scope} scope");
                    return Ok(());
                }
                for row in rows {
                    let kind = if row.config.url.is_some() {
                        row.config.transport.clone().unwrap_or_else(|| "http".into())
                    } else {
                        "stdio".to_string()
                    };
                    outln!(
                        ctx,
                        "{:<24} {:<6} {}",
                        row.name.bold(),
                        kind,
                        row.origin.label().dimmed()
                    );
                }
                Ok(())
            }
            McpSubcommand::Show { name } => {
                let row = store.get(scope, project, &name)?;
                println!("{}", serde_json::to_string_pretty(&row.config)?);
                Ok(())
            }
            McpSubcommand::Add {
                name,
                template,
                package,
                command,
                args,
                url,
                transport,
                env,
                wrap_cmd,
            } => {
                let mut config = build_config(template, package, command, args, url, transport)?;
                if !env.is_empty() {
                    config.env = Some(parse_env(&env)?);
                }
                if wrap_cmd {
                    config = mcp::wrap_with_cmd(&config);
                }
                mcp::validate(&name, &config, cfg!(windows))?;

                let path = store.upsert(scope, project, target, &name, config)?;
                outln!(ctx, "Saved '{name}' to {}", path.display());
                Ok(())
            }
            McpSubcommand::Remove { name } => {
                if store.remove(scope, project, target, &name)? {
                    outln!(ctx, "Removed '{name}'");
                } else {
                    outln!(ctx, "No server named '{name}' in the selected target");
                }
                Ok(())
            }
            McpSubcommand::Wrap { name } => {
                let row = store.get(scope, project, &name)?;
                let wrapped = mcp::wrap_with_cmd(&row.config);
                // write back to the file the entry came from
                store.upsert(scope, project, row.origin.project_target(), &name, wrapped)?;
                outln!(ctx, "Wrapped '{name}' with cmd /c");
                Ok(())
            }
            McpSubcommand::Unwrap { name } => {
                let row = store.get(scope, project, &name)?;
                let stripped = mcp::strip_cmd_wrapper(&row.config);
                store.upsert(scope, project, row.origin.project_target(), &name, stripped)?;
                outln!(ctx, "Stripped cmd /c wrapper from '{name}'");
                Ok(())
            }
            McpSubcommand::Validate { name, fix } => {
                let rows = match name {
                    Some(name) => vec![store.get(scope, project, &name)?],
                    None => store.list(scope, project)?,
                };

                let mut problems = 0;
                for row in rows {
                    match mcp::validate(&row.name, &row.config, cfg!(windows)) {
                        Ok(report) if report.warnings.is_empty() => {
                            outln!(ctx, "{} {}", "ok".green(), row.name);
                        }
                        Ok(report) => {
                            for warning in &report.warnings {
                                outln!(ctx, "{} {}: {warning}", "warn".yellow(), row.name);
                            }
                            if fix {
                                let fixed = mcp::auto_fix(&row.config);
                                store.upsert(
                                    scope,
                                    project,
                                    row.origin.project_target(),
                                    &row.name,
                                    fixed,
                                )?;
                                outln!(ctx, "  fixed {}", row.name);
                            }
                        }
                        Err(e) => {
                            problems += 1;
                            eprintln!("{} {}: {e:#}", "error".red(), row.name);
                        }
                    }
                }
                if problems > 0 {
                    anyhow::bail!("{problems} invalid server(s)");
                }
                Ok(())
            }
        }
    }
}

fn build_config(
    template: Option<InvocationTemplate>,
    package: Option<String>,
    command: Option<String>,
    args: Vec<String>,
    url: Option<String>,
    transport: String,
) -> Result<McpServerConfig> {
    if let Some(template) = template {
        let Some(package) = package else {
            anyhow::bail!("--template requires --package");
        };
        return Ok(mcp::from_template(template, &package));
    }
    if let Some(url) = url {
        return Ok(McpServerConfig {
            transport: Some(transport),
            url: Some(url),
            ..Default::default()
        });
    }
    if let Some(command) = command {
        return Ok(McpServerConfig {
            command: Some(command),
            args,
            ..Default::default()
        });
    }
    anyhow::bail!("specify one of --template, --command, or --url");
}

fn parse_env(pairs: &[String]) -> Result<BTreeMap<String, serde_json::Value>> {
    let mut env = BTreeMap::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            anyhow::bail!("--env expects KEY=VALUE, got '{pair}'");
        };
        env.insert(key.to_string(), serde_json::Value::String(value.to_string()));
    }
    Ok(env)
}
