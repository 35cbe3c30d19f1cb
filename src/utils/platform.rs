//! Platform-specific helpers: executable discovery, path expansion, and the
//! file-manager opener.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::core::WorkbenchError;

/// Checks if the current platform is Windows (compile-time).
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Gets the home directory path for the current user.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Could not determine home directory")
}

/// Resolves a user-supplied path: tilde expansion plus environment
/// variables, without requiring the path to exist.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)
        .map_err(|e| anyhow::anyhow!("Failed to expand path '{path}': {e}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Returns the git command name for this platform, verifying it exists.
pub fn get_git_command() -> Result<&'static str> {
    if which::which("git").is_ok() {
        Ok("git")
    } else {
        Err(WorkbenchError::GitNotFound.into())
    }
}

/// Locates the Claude Code CLI executable.
///
/// Windows installs expose `claude.cmd`; everywhere else it is `claude`.
pub fn find_claude_cli() -> Result<PathBuf> {
    for candidate in ["claude", "claude.cmd"] {
        if let Ok(path) = which::which(candidate) {
            return Ok(path);
        }
    }
    Err(WorkbenchError::ClaudeCliNotFound.into())
}

/// Opens a directory in the platform file manager.
///
/// Uses `explorer` on Windows, `open` on macOS, `xdg-open` elsewhere. The
/// child is spawned and not awaited; the opener owns its own lifetime.
pub fn open_in_file_manager(path: &Path) -> Result<()> {
    let opener = if cfg!(windows) {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    std::process::Command::new(opener)
        .arg(path)
        .spawn()
        .with_context(|| format!("Failed to launch {opener} for {}", path.display()))?;
    Ok(())
}
