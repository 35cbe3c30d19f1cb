//! Path resolution for every file the workbench edits.
//!
//! The workbench never invents locations: it edits the exact files the
//! Claude Code CLI reads. This module centralizes that layout:
//!
//! - user scope: `~/.claude/` (settings, agents/commands/skills, plugins,
//!   prompts, `.mcp.json`)
//! - project scope: `<project>/.claude/` plus `.mcp.json` at the project
//!   root
//! - the global `~/.claude.json` with its path-keyed `projects` map
//! - the workbench's own state under `~/.config/claude-workbench/`
//!   (preferences, templates, backups)
//!
//! Tests point `CWB_CLAUDE_DIR` at a scratch directory to avoid touching a
//! real home.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::constants::{
    CLAUDE_DIR, CLAUDE_JSON_FILE, ENV_CLAUDE_DIR, KNOWN_MARKETPLACES_FILE, MCP_FILE,
    PLUGIN_CONFIG_FILE, PROMPT_INFO_FILE, SETTINGS_FILE, SETTINGS_LOCAL_FILE,
};
use crate::utils::platform::get_home_dir;

/// Which configuration tree an operation targets.
///
/// Project scope carries the project root; everything else hangs off the
/// user's home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// `~/.claude/`
    User,
    /// `<project>/.claude/` and `.mcp.json` at the project root
    Project(PathBuf),
}

impl Scope {
    /// Human-readable scope name for messages and listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Project(_) => "project",
        }
    }
}

/// Resolved filesystem layout for one workbench invocation.
///
/// Constructed once at startup and passed by reference to every store, per
/// the no-singletons rule: screens (subcommands) receive their dependencies
/// explicitly.
#[derive(Debug, Clone)]
pub struct Paths {
    /// `~/.claude`
    claude_dir: PathBuf,
    /// `~/.claude.json`
    claude_json: PathBuf,
    /// Workbench state directory (preferences, templates, backups)
    state_dir: PathBuf,
}

impl Paths {
    /// Build a layout from explicit locations. Used by tests and by
    /// frontends that manage their own directories.
    pub fn from_parts(claude_dir: PathBuf, claude_json: PathBuf, state_dir: PathBuf) -> Self {
        Self {
            claude_dir,
            claude_json,
            state_dir,
        }
    }

    /// Resolve the standard layout, honoring the `CWB_CLAUDE_DIR` override.
    pub fn discover() -> Result<Self> {
        let (claude_dir, claude_json) = match std::env::var(ENV_CLAUDE_DIR) {
            Ok(dir) if !dir.is_empty() => {
                let dir = PathBuf::from(dir);
                let json = dir
                    .parent()
                    .map(|p| p.join(CLAUDE_JSON_FILE))
                    .unwrap_or_else(|| dir.join(CLAUDE_JSON_FILE));
                (dir, json)
            }
            _ => {
                let home = get_home_dir()?;
                (home.join(CLAUDE_DIR), home.join(CLAUDE_JSON_FILE))
            }
        };

        let state_dir = match std::env::var(crate::constants::ENV_STATE_DIR) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()
                .unwrap_or_else(|| claude_dir.clone())
                .join("claude-workbench"),
        };

        Ok(Self {
            claude_dir,
            claude_json,
            state_dir,
        })
    }

    /// The user-level Claude directory (`~/.claude`).
    pub fn claude_dir(&self) -> &Path {
        &self.claude_dir
    }

    /// The global `~/.claude.json` file.
    pub fn claude_json(&self) -> &Path {
        &self.claude_json
    }

    /// Workbench state directory.
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Template root inside the workbench state directory.
    pub fn templates_dir(&self) -> PathBuf {
        self.state_dir.join("templates")
    }

    /// Backup root inside the workbench state directory.
    pub fn backups_dir(&self) -> PathBuf {
        self.state_dir.join("backups")
    }

    /// Workbench preferences file, honoring the `CWB_CONFIG` override.
    pub fn prefs_file(&self) -> PathBuf {
        match std::env::var(crate::constants::ENV_CONFIG) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => self.state_dir.join("config.json"),
        }
    }

    /// The `.claude` directory for a scope.
    pub fn scope_dir(&self, scope: &Scope) -> PathBuf {
        match scope {
            Scope::User => self.claude_dir.clone(),
            Scope::Project(root) => root.join(CLAUDE_DIR),
        }
    }

    /// Shared settings file for a scope.
    pub fn settings_file(&self, scope: &Scope) -> PathBuf {
        self.scope_dir(scope).join(SETTINGS_FILE)
    }

    /// Local settings overlay for a scope.
    pub fn settings_local_file(&self, scope: &Scope) -> PathBuf {
        self.scope_dir(scope).join(SETTINGS_LOCAL_FILE)
    }

    /// Artifact directory (`agents`, `commands`, `skills`) for a scope.
    pub fn artifact_dir(&self, scope: &Scope, kind: &str) -> PathBuf {
        self.scope_dir(scope).join(kind)
    }

    /// `.mcp.json` shared at a project root.
    pub fn project_mcp_file(&self, project: &Path) -> PathBuf {
        project.join(MCP_FILE)
    }

    /// `~/.claude/.mcp.json` (user-local MCP servers).
    pub fn local_mcp_file(&self) -> PathBuf {
        self.claude_dir.join(MCP_FILE)
    }

    /// `~/.claude/prompt/promptInfo.json`.
    pub fn prompt_info_file(&self) -> PathBuf {
        self.claude_dir.join(PROMPT_INFO_FILE)
    }

    /// `~/.claude/plugins/config.json`.
    pub fn plugin_config_file(&self) -> PathBuf {
        self.claude_dir.join(PLUGIN_CONFIG_FILE)
    }

    /// `~/.claude/plugins/known_marketplaces.json`.
    pub fn known_marketplaces_file(&self) -> PathBuf {
        self.claude_dir.join(KNOWN_MARKETPLACES_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_paths(root: &Path) -> Paths {
        Paths {
            claude_dir: root.join(".claude"),
            claude_json: root.join(".claude.json"),
            state_dir: root.join("state"),
        }
    }

    #[test]
    fn scope_paths_split_user_and_project() {
        let tmp = tempfile::TempDir::new().unwrap();
        let paths = test_paths(tmp.path());
        let project = tmp.path().join("proj");

        assert_eq!(
            paths.settings_file(&Scope::User),
            tmp.path().join(".claude/settings.json")
        );
        assert_eq!(
            paths.settings_local_file(&Scope::Project(project.clone())),
            project.join(".claude/settings.local.json")
        );
        assert_eq!(paths.project_mcp_file(&project), project.join(".mcp.json"));
        assert_eq!(
            paths.artifact_dir(&Scope::Project(project.clone()), "agents"),
            project.join(".claude/agents")
        );
    }

    #[test]
    fn state_files_live_under_state_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let paths = test_paths(tmp.path());
        assert_eq!(paths.templates_dir(), tmp.path().join("state/templates"));
        assert_eq!(paths.backups_dir(), tmp.path().join("state/backups"));
    }
}
