//! Helpers shared by the command modules.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use super::AppContext;
use crate::config::Scope;
use crate::core::WorkbenchError;

/// Resolve the scope for scoped commands: `--project <path>` selects
/// project scope, otherwise user scope.
pub fn resolve_scope(ctx: &AppContext) -> Scope {
    match &ctx.project {
        Some(path) => Scope::Project(path.clone()),
        None => Scope::User,
    }
}

/// The settings file a command targets: shared by default, the local
/// overlay with `--local`.
pub fn settings_path(ctx: &AppContext, local: bool) -> std::path::PathBuf {
    let scope = resolve_scope(ctx);
    if local {
        ctx.paths.settings_local_file(&scope)
    } else {
        ctx.paths.settings_file(&scope)
    }
}

/// Content from a file argument, or stdin when the argument is `-` or
/// absent.
pub fn content_from(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => crate::utils::read_text_file(path),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| WorkbenchError::IoError(e))?;
            Ok(buffer)
        }
    }
}

/// A spinner for one network round trip, hidden under `--no-progress`.
pub fn spinner(ctx: &AppContext, message: &str) -> ProgressBar {
    if !ctx.progress_enabled() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("static template"),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// A counting bar for bulk operations, hidden under `--no-progress`.
pub fn progress_bar(ctx: &AppContext, len: u64, message: &str) -> ProgressBar {
    if !ctx.progress_enabled() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}").expect("static template"),
    );
    bar.set_message(message.to_string());
    bar
}

/// Print unless `--quiet`.
#[macro_export]
macro_rules! outln {
    ($ctx:expr, $($arg:tt)*) => {
        if !$ctx.quiet {
            println!($($arg)*);
        }
    };
}
