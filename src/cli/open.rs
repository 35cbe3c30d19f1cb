//! The `open` command: jump to a configuration directory in the platform
//! file manager.

use anyhow::Result;
use clap::Args;

use super::AppContext;
use crate::outln;
use crate::utils::platform::open_in_file_manager;

/// Which directory to open.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OpenTarget {
    /// ~/.claude
    Claude,
    /// The project's .claude directory (needs --project)
    Project,
    /// The workbench template library
    Templates,
    /// The workbench backup directory
    Backups,
}

#[derive(Args)]
pub struct OpenCommand {
    #[arg(value_enum)]
    target: OpenTarget,
}

impl OpenCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<()> {
        let dir = match self.target {
            OpenTarget::Claude => ctx.paths.claude_dir().to_path_buf(),
            OpenTarget::Project => match &ctx.project {
                Some(project) => project.join(".claude"),
                None => anyhow::bail!("`open project` requires --project"),
            },
            OpenTarget::Templates => ctx.paths.templates_dir(),
            OpenTarget::Backups => ctx.paths.backups_dir(),
        };

        if !dir.exists() {
            anyhow::bail!("{} does not exist yet", dir.display());
        }
        open_in_file_manager(&dir)?;
        outln!(ctx, "Opened {}", dir.display());
        Ok(())
    }
}
