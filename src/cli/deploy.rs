//! The `deploy` command: copy templates into a Claude configuration tree.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::AppContext;
use super::common::{progress_bar, resolve_scope};
use crate::deploy::Deployer;
use crate::outln;
use crate::templates::{TemplateKind, TemplateStore};

#[derive(Args)]
pub struct DeployCommand {
    /// Template kind to deploy
    kind: TemplateKind,

    /// Template names; `--all` deploys every template of the kind
    names: Vec<String>,

    /// Deploy every template of the kind
    #[arg(long, conflicts_with = "names")]
    all: bool,
}

impl DeployCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<()> {
        let store = TemplateStore::new(ctx.paths.templates_dir());
        let scope = resolve_scope(ctx);

        let names = if self.all {
            store.list(self.kind)?
        } else if self.names.is_empty() {
            anyhow::bail!("nothing to deploy: pass template names or --all");
        } else {
            self.names
        };

        let bar = progress_bar(ctx, names.len() as u64, "deploying");
        let deployer = Deployer::new(&ctx.paths, &store);

        // deploy one at a time so the bar tracks real progress
        let mut report = crate::deploy::DeployReport::default();
        for name in &names {
            let one = deployer.deploy(self.kind, std::slice::from_ref(name), &scope)?;
            report.deployed.extend(one.deployed);
            report.skipped.extend(one.skipped);
            report.failed.extend(one.failed);
            bar.inc(1);
        }
        bar.finish_and_clear();

        let (deployed, skipped, failed) = report.counts();
        outln!(
            ctx,
            "{} deployed, {} skipped, {} failed ({} scope)",
            deployed.to_string().green(),
            skipped,
            failed,
            scope.label()
        );
        for name in &report.skipped {
            outln!(ctx, "  {} {name} (already exists)", "skip".yellow());
        }
        for (name, error) in &report.failed {
            eprintln!("  {} {name}: {error}", "fail".red());
        }

        if failed > 0 {
            anyhow::bail!("{failed} template(s) failed to deploy");
        }
        Ok(())
    }
}
