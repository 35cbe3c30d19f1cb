//! MCP (Model Context Protocol) server configuration management.
//!
//! Server entries live in three places, depending on scope:
//!
//! - **user**: the top-level `mcpServers` map in `~/.claude.json`
//! - **local**: `~/.claude/.mcp.json`
//! - **project**: `.mcp.json` at the project root (team-shared), plus a
//!   project-keyed block inside `~/.claude.json`'s `projects` map
//!
//! Project listings merge both project stores and tag every entry with its
//! origin file. Mutating commands take an explicit [`ProjectTarget`]; the
//! file a save lands in is never inferred from which entry was touched
//! last.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::Paths;
use crate::core::WorkbenchError;
use crate::utils::{read_json_file, write_json_file};

/// Individual MCP server configuration.
///
/// Either command-based (stdio) with `command`/`args`, or HTTP-based with
/// `type`/`url`/`headers`. `env` applies to both. The `_note` field and any
/// unknown keys ride along untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct McpServerConfig {
    /// The command to execute (stdio servers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Arguments to pass to the command (stdio servers)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Environment variables for the server process
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, Value>>,

    /// Transport type for HTTP servers ("http" or "sse")
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,

    /// Server URL (HTTP servers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// HTTP headers (HTTP servers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, Value>>,

    /// Free-text annotation some tools attach
    #[serde(default, rename = "_note", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Unknown fields, preserved verbatim
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// An `.mcp.json` file: the `mcpServers` map plus whatever else is there.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McpConfig {
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: BTreeMap<String, McpServerConfig>,

    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl McpConfig {
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            read_json_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_file(path, self)
    }
}

/// One project's block inside `~/.claude.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(rename = "mcpServers", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mcp_servers: BTreeMap<String, McpServerConfig>,

    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// The global `~/.claude.json` file.
///
/// Only the parts the workbench edits are typed; the rest of this large
/// file is preserved through the flattened map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaudeJson {
    #[serde(rename = "mcpServers", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mcp_servers: BTreeMap<String, McpServerConfig>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub projects: BTreeMap<String, ProjectEntry>,

    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl ClaudeJson {
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            read_json_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_file(path, self)
    }
}

/// Which store an MCP operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum McpScope {
    /// Top-level `mcpServers` in `~/.claude.json`
    User,
    /// `~/.claude/.mcp.json`
    Local,
    /// The project stores (`.mcp.json` + `~/.claude.json` projects block)
    Project,
}

impl std::fmt::Display for McpScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::User => "user",
            Self::Local => "local",
            Self::Project => "project",
        };
        f.write_str(label)
    }
}

/// Explicit save target within project scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ProjectTarget {
    /// `.mcp.json` at the project root (team-shared)
    #[default]
    McpJson,
    /// The project-keyed block in `~/.claude.json` (user-private)
    ClaudeJson,
}

/// Where a listed server entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerOrigin {
    UserClaudeJson,
    LocalMcpJson,
    ProjectMcpJson,
    ProjectClaudeJson,
}

impl ServerOrigin {
    /// The project target that writes back to this origin. Meaningless for
    /// user/local origins, where the scope alone picks the file.
    pub fn project_target(self) -> ProjectTarget {
        match self {
            Self::ProjectClaudeJson => ProjectTarget::ClaudeJson,
            _ => ProjectTarget::McpJson,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UserClaudeJson => "~/.claude.json",
            Self::LocalMcpJson => "~/.claude/.mcp.json",
            Self::ProjectMcpJson => ".mcp.json",
            Self::ProjectClaudeJson => "~/.claude.json (projects)",
        }
    }
}

/// One row of a server listing.
#[derive(Debug, Clone)]
pub struct ServerListing {
    pub name: String,
    pub config: McpServerConfig,
    pub origin: ServerOrigin,
}

/// Store facade over the scope files.
pub struct McpStore<'a> {
    paths: &'a Paths,
}

impl<'a> McpStore<'a> {
    pub fn new(paths: &'a Paths) -> Self {
        Self { paths }
    }

    fn project_key(project: &Path) -> String {
        project.display().to_string()
    }

    /// List servers for a scope. Project scope returns the merged view,
    /// `.mcp.json` entries first, each row tagged with its origin.
    pub fn list(&self, scope: McpScope, project: Option<&Path>) -> Result<Vec<ServerListing>> {
        let mut rows = Vec::new();
        match scope {
            McpScope::User => {
                let global = ClaudeJson::load_or_default(self.paths.claude_json())?;
                for (name, config) in global.mcp_servers {
                    rows.push(ServerListing {
                        name,
                        config,
                        origin: ServerOrigin::UserClaudeJson,
                    });
                }
            }
            McpScope::Local => {
                let config = McpConfig::load_or_default(&self.paths.local_mcp_file())?;
                for (name, server) in config.mcp_servers {
                    rows.push(ServerListing {
                        name,
                        config: server,
                        origin: ServerOrigin::LocalMcpJson,
                    });
                }
            }
            McpScope::Project => {
                let project = require_project(project)?;
                let shared = McpConfig::load_or_default(&self.paths.project_mcp_file(project))?;
                for (name, server) in shared.mcp_servers {
                    rows.push(ServerListing {
                        name,
                        config: server,
                        origin: ServerOrigin::ProjectMcpJson,
                    });
                }
                let global = ClaudeJson::load_or_default(self.paths.claude_json())?;
                if let Some(entry) = global.projects.get(&Self::project_key(project)) {
                    for (name, server) in &entry.mcp_servers {
                        rows.push(ServerListing {
                            name: name.clone(),
                            config: server.clone(),
                            origin: ServerOrigin::ProjectClaudeJson,
                        });
                    }
                }
            }
        }
        Ok(rows)
    }

    /// Fetch one server by name from a scope's merged view.
    pub fn get(
        &self,
        scope: McpScope,
        project: Option<&Path>,
        name: &str,
    ) -> Result<ServerListing> {
        self.list(scope, project)?
            .into_iter()
            .find(|row| row.name == name)
            .ok_or_else(|| {
                WorkbenchError::McpServerNotFound {
                    name: name.to_string(),
                    scope: scope.to_string(),
                }
                .into()
            })
    }

    /// Insert or replace a server entry.
    ///
    /// `target` picks the file within project scope and is ignored for the
    /// other scopes. Returns the path that was written.
    pub fn upsert(
        &self,
        scope: McpScope,
        project: Option<&Path>,
        target: ProjectTarget,
        name: &str,
        config: McpServerConfig,
    ) -> Result<PathBuf> {
        match scope {
            McpScope::User => {
                let path = self.paths.claude_json().to_path_buf();
                let mut global = ClaudeJson::load_or_default(&path)?;
                global.mcp_servers.insert(name.to_string(), config);
                global.save(&path)?;
                Ok(path)
            }
            McpScope::Local => {
                let path = self.paths.local_mcp_file();
                let mut file = McpConfig::load_or_default(&path)?;
                file.mcp_servers.insert(name.to_string(), config);
                file.save(&path)?;
                Ok(path)
            }
            McpScope::Project => {
                let project = require_project(project)?;
                match target {
                    ProjectTarget::McpJson => {
                        let path = self.paths.project_mcp_file(project);
                        let mut file = McpConfig::load_or_default(&path)?;
                        file.mcp_servers.insert(name.to_string(), config);
                        file.save(&path)?;
                        Ok(path)
                    }
                    ProjectTarget::ClaudeJson => {
                        let path = self.paths.claude_json().to_path_buf();
                        let mut global = ClaudeJson::load_or_default(&path)?;
                        global
                            .projects
                            .entry(Self::project_key(project))
                            .or_default()
                            .mcp_servers
                            .insert(name.to_string(), config);
                        global.save(&path)?;
                        Ok(path)
                    }
                }
            }
        }
    }

    /// Remove a server entry. Returns true when something was removed.
    pub fn remove(
        &self,
        scope: McpScope,
        project: Option<&Path>,
        target: ProjectTarget,
        name: &str,
    ) -> Result<bool> {
        match scope {
            McpScope::User => {
                let path = self.paths.claude_json().to_path_buf();
                let mut global = ClaudeJson::load_or_default(&path)?;
                let removed = global.mcp_servers.remove(name).is_some();
                if removed {
                    global.save(&path)?;
                }
                Ok(removed)
            }
            McpScope::Local => {
                let path = self.paths.local_mcp_file();
                let mut file = McpConfig::load_or_default(&path)?;
                let removed = file.mcp_servers.remove(name).is_some();
                if removed {
                    file.save(&path)?;
                }
                Ok(removed)
            }
            McpScope::Project => {
                let project = require_project(project)?;
                match target {
                    ProjectTarget::McpJson => {
                        let path = self.paths.project_mcp_file(project);
                        let mut file = McpConfig::load_or_default(&path)?;
                        let removed = file.mcp_servers.remove(name).is_some();
                        if removed {
                            file.save(&path)?;
                        }
                        Ok(removed)
                    }
                    ProjectTarget::ClaudeJson => {
                        let path = self.paths.claude_json().to_path_buf();
                        let mut global = ClaudeJson::load_or_default(&path)?;
                        let removed = global
                            .projects
                            .get_mut(&Self::project_key(project))
                            .map(|entry| entry.mcp_servers.remove(name).is_some())
                            .unwrap_or(false);
                        if removed {
                            global.save(&path)?;
                        }
                        Ok(removed)
                    }
                }
            }
        }
    }
}

fn require_project(project: Option<&Path>) -> Result<&Path> {
    project.ok_or_else(|| {
        WorkbenchError::ConfigError {
            message: "project scope requires --project <path>".to_string(),
        }
        .into()
    })
}

// ---------------------------------------------------------------------------
// Invocation templates and the Windows cmd wrapper
// ---------------------------------------------------------------------------

/// Pre-fill conventions for the add dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InvocationTemplate {
    /// `npx -y <package>`
    Npx,
    /// `uvx <package>`
    Uvx,
}

/// Build a stdio config from an invocation template and a package name.
pub fn from_template(template: InvocationTemplate, package: &str) -> McpServerConfig {
    let (command, args) = match template {
        InvocationTemplate::Npx => ("npx", vec!["-y".to_string(), package.to_string()]),
        InvocationTemplate::Uvx => ("uvx", vec![package.to_string()]),
    };
    McpServerConfig {
        command: Some(command.to_string()),
        args,
        ..Default::default()
    }
}

/// True when a config is already wrapped with `cmd /c` (or `/k`).
pub fn is_cmd_wrapped(config: &McpServerConfig) -> bool {
    config.command.as_deref() == Some("cmd")
        && matches!(config.args.first().map(String::as_str), Some("/c" | "/k"))
}

/// Wrap a stdio command with `cmd /c` for Windows invocation.
///
/// A plain string prepend: `command` becomes the first argument after
/// `/c`. Already-wrapped configs are returned unchanged.
pub fn wrap_with_cmd(config: &McpServerConfig) -> McpServerConfig {
    if is_cmd_wrapped(config) {
        return config.clone();
    }
    let Some(command) = config.command.clone() else {
        return config.clone();
    };
    let mut wrapped = config.clone();
    let mut args = vec!["/c".to_string(), command];
    args.extend(config.args.iter().cloned());
    wrapped.command = Some("cmd".to_string());
    wrapped.args = args;
    wrapped
}

/// Strip a `cmd /c` wrapper, restoring the inner command. Unwrapped
/// configs are returned unchanged.
pub fn strip_cmd_wrapper(config: &McpServerConfig) -> McpServerConfig {
    if !is_cmd_wrapped(config) || config.args.len() < 2 {
        return config.clone();
    }
    let mut stripped = config.clone();
    stripped.command = Some(config.args[1].clone());
    stripped.args = config.args[2..].to_vec();
    stripped
}

/// Structural validation findings for one server entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Advisory findings that auto-fix can address
    pub warnings: Vec<String>,
}

/// Validate a server entry's structure.
///
/// stdio entries need a command, HTTP entries need a url, and an entry
/// cannot be both. `windows` adds the bare-`npx` advisory (Windows cannot
/// execute npm shims without the `cmd /c` wrapper).
pub fn validate(name: &str, config: &McpServerConfig, windows: bool) -> Result<ValidationReport> {
    let has_command = config.command.is_some();
    let is_http = matches!(config.transport.as_deref(), Some("http" | "sse"));

    if let Some(transport) = config.transport.as_deref() {
        if !matches!(transport, "http" | "sse") {
            return Err(WorkbenchError::McpServerInvalid {
                name: name.to_string(),
                reason: format!("unknown transport type '{transport}'"),
            }
            .into());
        }
    }

    if is_http {
        if config.url.is_none() {
            return Err(WorkbenchError::McpServerInvalid {
                name: name.to_string(),
                reason: "http/sse servers require a url".to_string(),
            }
            .into());
        }
        if has_command {
            return Err(WorkbenchError::McpServerInvalid {
                name: name.to_string(),
                reason: "server cannot have both a command and a url transport".to_string(),
            }
            .into());
        }
    } else if !has_command {
        return Err(WorkbenchError::McpServerInvalid {
            name: name.to_string(),
            reason: "stdio servers require a command".to_string(),
        }
        .into());
    }

    let mut warnings = Vec::new();
    if windows && config.command.as_deref() == Some("npx") {
        warnings.push("npx requires the `cmd /c` wrapper on Windows (use --fix)".to_string());
    }
    Ok(ValidationReport { warnings })
}

/// Apply the structural fixes [`validate`] warns about.
pub fn auto_fix(config: &McpServerConfig) -> McpServerConfig {
    if config.command.as_deref() == Some("npx") {
        wrap_with_cmd(config)
    } else {
        config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths(tmp: &TempDir) -> Paths {
        Paths::from_parts(
            tmp.path().join(".claude"),
            tmp.path().join(".claude.json"),
            tmp.path().join("state"),
        )
    }

    fn stdio(command: &str, args: &[&str]) -> McpServerConfig {
        McpServerConfig {
            command: Some(command.to_string()),
            args: args.iter().map(|s| (*s).to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn wrap_then_strip_restores_original() {
        let original = stdio("npx", &["-y", "@acme/server"]);
        let wrapped = wrap_with_cmd(&original);
        assert_eq!(wrapped.command.as_deref(), Some("cmd"));
        assert_eq!(wrapped.args, ["/c", "npx", "-y", "@acme/server"]);
        assert!(is_cmd_wrapped(&wrapped));

        // wrapping again is a no-op
        assert_eq!(wrap_with_cmd(&wrapped), wrapped);

        let stripped = strip_cmd_wrapper(&wrapped);
        assert_eq!(stripped, original);
        // stripping an unwrapped config is a no-op
        assert_eq!(strip_cmd_wrapper(&original), original);
    }

    #[test]
    fn templates_prefill_stdio_convention() {
        let npx = from_template(InvocationTemplate::Npx, "@acme/server");
        assert_eq!(npx.command.as_deref(), Some("npx"));
        assert_eq!(npx.args, ["-y", "@acme/server"]);

        let uvx = from_template(InvocationTemplate::Uvx, "mcp-server-git");
        assert_eq!(uvx.command.as_deref(), Some("uvx"));
        assert_eq!(uvx.args, ["mcp-server-git"]);
    }

    #[test]
    fn validate_rejects_contradictions() {
        assert!(validate("a", &McpServerConfig::default(), false).is_err());

        let mut both = stdio("npx", &[]);
        both.transport = Some("http".to_string());
        both.url = Some("https://example.com".to_string());
        assert!(validate("a", &both, false).is_err());

        let mut http = McpServerConfig::default();
        http.transport = Some("sse".to_string());
        assert!(validate("a", &http, false).is_err());
        http.url = Some("https://example.com/sse".to_string());
        assert!(validate("a", &http, false).is_ok());
    }

    #[test]
    fn windows_advisory_and_auto_fix() {
        let bare = stdio("npx", &["-y", "pkg"]);
        let report = validate("a", &bare, true).unwrap();
        assert_eq!(report.warnings.len(), 1);

        let fixed = auto_fix(&bare);
        assert!(is_cmd_wrapped(&fixed));
        assert!(validate("a", &fixed, true).unwrap().warnings.is_empty());

        // non-npx commands are left alone
        let python = stdio("python", &["server.py"]);
        assert_eq!(auto_fix(&python), python);
    }

    #[test]
    fn project_listing_merges_both_stores_with_origins() {
        let tmp = TempDir::new().unwrap();
        let paths = paths(&tmp);
        let store = McpStore::new(&paths);
        let project = tmp.path().join("proj");

        store
            .upsert(
                McpScope::Project,
                Some(&project),
                ProjectTarget::McpJson,
                "shared-server",
                stdio("npx", &["-y", "a"]),
            )
            .unwrap();
        store
            .upsert(
                McpScope::Project,
                Some(&project),
                ProjectTarget::ClaudeJson,
                "private-server",
                stdio("uvx", &["b"]),
            )
            .unwrap();

        let rows = store.list(McpScope::Project, Some(&project)).unwrap();
        assert_eq!(rows.len(), 2);
        let shared = rows.iter().find(|r| r.name == "shared-server").unwrap();
        assert_eq!(shared.origin, ServerOrigin::ProjectMcpJson);
        let private = rows.iter().find(|r| r.name == "private-server").unwrap();
        assert_eq!(private.origin, ServerOrigin::ProjectClaudeJson);

        // the files landed where the explicit target said
        assert!(paths.project_mcp_file(&project).exists());
        let global = ClaudeJson::load_or_default(paths.claude_json()).unwrap();
        assert!(global.projects[&project.display().to_string()]
            .mcp_servers
            .contains_key("private-server"));
    }

    #[test]
    fn remove_only_touches_the_named_target() {
        let tmp = TempDir::new().unwrap();
        let paths = paths(&tmp);
        let store = McpStore::new(&paths);
        let project = tmp.path().join("proj");

        for (target, name) in [
            (ProjectTarget::McpJson, "same-name"),
            (ProjectTarget::ClaudeJson, "same-name"),
        ] {
            store
                .upsert(McpScope::Project, Some(&project), target, name, stdio("x", &[]))
                .unwrap();
        }

        let removed = store
            .remove(McpScope::Project, Some(&project), ProjectTarget::McpJson, "same-name")
            .unwrap();
        assert!(removed);

        let rows = store.list(McpScope::Project, Some(&project)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].origin, ServerOrigin::ProjectClaudeJson);
    }

    #[test]
    fn user_scope_round_trips_and_preserves_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        let paths = paths(&tmp);
        crate::utils::safe_write(
            paths.claude_json(),
            r#"{"numStartups": 12, "mcpServers": {}, "projects": {}}"#,
        )
        .unwrap();

        let store = McpStore::new(&paths);
        store
            .upsert(
                McpScope::User,
                None,
                ProjectTarget::default(),
                "fs",
                stdio("npx", &["-y", "@modelcontextprotocol/server-filesystem"]),
            )
            .unwrap();

        let raw: Value = crate::utils::read_json_file(paths.claude_json()).unwrap();
        assert_eq!(raw["numStartups"], 12);
        assert_eq!(raw["mcpServers"]["fs"]["command"], "npx");

        let missing = store.get(McpScope::User, None, "nope");
        assert!(missing.is_err());
    }
}
