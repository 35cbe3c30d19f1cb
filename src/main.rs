//! Workbench CLI entry point.
//!
//! Parses arguments, executes the selected command, and renders failures
//! as user-friendly errors with suggestions.

use anyhow::Result;
use clap::Parser;
use claude_workbench::cli;
use claude_workbench::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
