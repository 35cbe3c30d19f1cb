//! Deploying templates into a Claude configuration tree.
//!
//! A deploy copies template content into the scope's artifact directory
//! (`agents/`, `commands/`, `skills/`) or, for MCP templates, inserts the
//! entry into the scope's server map. Existing targets are never touched:
//! same-named files count as skipped, there is no merge. Per-item failures
//! are collected so one bad template does not abort a bulk deploy.

use anyhow::Result;
use std::path::Path;

use crate::config::{Paths, Scope};
use crate::mcp::{McpScope, McpServerConfig, McpStore, ProjectTarget};
use crate::templates::{TemplateKind, TemplateStore};
use crate::utils::{ensure_dir, safe_write};

/// Outcome of one bulk deploy.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub deployed: Vec<String>,
    pub skipped: Vec<String>,
    /// (template name, error message) pairs
    pub failed: Vec<(String, String)>,
}

impl DeployReport {
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.deployed.len(), self.skipped.len(), self.failed.len())
    }
}

/// Deploys templates into user or project scope.
pub struct Deployer<'a> {
    paths: &'a Paths,
    store: &'a TemplateStore,
}

impl<'a> Deployer<'a> {
    pub fn new(paths: &'a Paths, store: &'a TemplateStore) -> Self {
        Self { paths, store }
    }

    /// Deploy a set of templates of one kind into a scope.
    pub fn deploy(
        &self,
        kind: TemplateKind,
        names: &[String],
        scope: &Scope,
    ) -> Result<DeployReport> {
        let mut report = DeployReport::default();
        for name in names {
            match self.deploy_one(kind, name, scope) {
                Ok(true) => report.deployed.push(name.clone()),
                Ok(false) => report.skipped.push(name.clone()),
                Err(e) => report.failed.push((name.clone(), format!("{e:#}"))),
            }
        }
        Ok(report)
    }

    /// Deploy one template. Returns false when the target already existed.
    fn deploy_one(&self, kind: TemplateKind, name: &str, scope: &Scope) -> Result<bool> {
        let content = self.store.read(kind, name)?;
        match kind.artifact_dir() {
            Some(dir_name) => {
                let dir = self.paths.artifact_dir(scope, dir_name);
                self.deploy_file(&dir, name, kind.extension(), &content)
            }
            None => self.deploy_mcp_entry(name, &content, scope),
        }
    }

    /// File-based deploy: templates keep only their base name; the library
    /// folder level is organization, not deployment structure.
    fn deploy_file(&self, dir: &Path, name: &str, ext: &str, content: &str) -> Result<bool> {
        let base = name.rsplit('/').next().unwrap_or(name);
        let target = dir.join(format!("{base}.{ext}"));
        if target.exists() {
            return Ok(false);
        }
        ensure_dir(dir)?;
        safe_write(&target, content)?;
        Ok(true)
    }

    /// MCP deploy: the template JSON is one server entry (or a
    /// single-entry `mcpServers` map); it lands in the scope's server map
    /// under the template's base name.
    fn deploy_mcp_entry(&self, name: &str, content: &str, scope: &Scope) -> Result<bool> {
        let base = name.rsplit('/').next().unwrap_or(name).to_string();
        let config = parse_mcp_template(content)?;

        let store = McpStore::new(self.paths);
        let (mcp_scope, project) = match scope {
            Scope::User => (McpScope::Local, None),
            Scope::Project(root) => (McpScope::Project, Some(root.as_path())),
        };

        let existing = store.list(mcp_scope, project)?;
        if existing.iter().any(|row| row.name == base) {
            return Ok(false);
        }
        store.upsert(mcp_scope, project, ProjectTarget::McpJson, &base, config)?;
        Ok(true)
    }
}

/// Accepts either a bare server config or a `{"mcpServers": {name: cfg}}`
/// wrapper with exactly one entry.
fn parse_mcp_template(content: &str) -> Result<McpServerConfig> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| anyhow::anyhow!("template is not valid JSON: {e}"))?;

    if let Some(servers) = value.get("mcpServers").and_then(|v| v.as_object()) {
        let mut configs = servers.values();
        match (configs.next(), configs.next()) {
            (Some(first), None) => return Ok(serde_json::from_value(first.clone())?),
            _ => {
                return Err(anyhow::anyhow!(
                    "template must contain exactly one server under mcpServers"
                ));
            }
        }
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::calculate_checksum;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Paths, TemplateStore) {
        let tmp = TempDir::new().unwrap();
        let paths = Paths::from_parts(
            tmp.path().join(".claude"),
            tmp.path().join(".claude.json"),
            tmp.path().join("state"),
        );
        let store = TemplateStore::new(paths.templates_dir());
        (tmp, paths, store)
    }

    #[test]
    fn deploy_creates_file_with_exact_content() {
        let (tmp, paths, store) = setup();
        store.save(TemplateKind::Agents, "helper", "# helper\n").unwrap();

        let deployer = Deployer::new(&paths, &store);
        let report = deployer
            .deploy(TemplateKind::Agents, &["helper".to_string()], &Scope::User)
            .unwrap();
        assert_eq!(report.counts(), (1, 0, 0));

        let deployed = tmp.path().join(".claude/agents/helper.md");
        assert_eq!(std::fs::read_to_string(deployed).unwrap(), "# helper\n");
    }

    #[test]
    fn existing_target_is_skipped_and_untouched() {
        let (tmp, paths, store) = setup();
        store.save(TemplateKind::Commands, "deploy", "new content").unwrap();
        let target = tmp.path().join(".claude/commands/deploy.md");
        safe_write(&target, "original content").unwrap();
        let before = calculate_checksum(&target).unwrap();

        let deployer = Deployer::new(&paths, &store);
        let report = deployer
            .deploy(TemplateKind::Commands, &["deploy".to_string()], &Scope::User)
            .unwrap();
        assert_eq!(report.counts(), (0, 1, 0));
        assert_eq!(calculate_checksum(&target).unwrap(), before);
    }

    #[test]
    fn folder_templates_deploy_under_base_name() {
        let (tmp, paths, store) = setup();
        store
            .save(TemplateKind::Agents, "code-quality/reviewer", "r")
            .unwrap();

        let deployer = Deployer::new(&paths, &store);
        let report = deployer
            .deploy(
                TemplateKind::Agents,
                &["code-quality/reviewer".to_string()],
                &Scope::User,
            )
            .unwrap();
        assert_eq!(report.counts(), (1, 0, 0));
        assert!(tmp.path().join(".claude/agents/reviewer.md").exists());
    }

    #[test]
    fn project_scope_deploys_into_project_tree() {
        let (tmp, paths, store) = setup();
        store.save(TemplateKind::Skills, "review", "skill").unwrap();
        let project = tmp.path().join("proj");

        let deployer = Deployer::new(&paths, &store);
        deployer
            .deploy(
                TemplateKind::Skills,
                &["review".to_string()],
                &Scope::Project(project.clone()),
            )
            .unwrap();
        assert!(project.join(".claude/skills/review.md").exists());
    }

    #[test]
    fn missing_template_is_a_failure_not_an_abort() {
        let (_tmp, paths, store) = setup();
        store.save(TemplateKind::Agents, "real", "x").unwrap();

        let deployer = Deployer::new(&paths, &store);
        let report = deployer
            .deploy(
                TemplateKind::Agents,
                &["ghost".to_string(), "real".to_string()],
                &Scope::User,
            )
            .unwrap();
        assert_eq!(report.counts(), (1, 0, 1));
        assert_eq!(report.failed[0].0, "ghost");
    }

    #[test]
    fn mcp_template_lands_in_server_map_and_collision_skips() {
        let (_tmp, paths, store) = setup();
        store
            .save(
                TemplateKind::Mcp,
                "filesystem",
                r#"{"mcpServers": {"filesystem": {"command": "npx", "args": ["-y", "fs"]}}}"#,
            )
            .unwrap();

        let deployer = Deployer::new(&paths, &store);
        let report = deployer
            .deploy(TemplateKind::Mcp, &["filesystem".to_string()], &Scope::User)
            .unwrap();
        assert_eq!(report.counts(), (1, 0, 0));

        let mcp = McpStore::new(&paths);
        let rows = mcp.list(McpScope::Local, None).unwrap();
        assert_eq!(rows[0].name, "filesystem");
        assert_eq!(rows[0].config.command.as_deref(), Some("npx"));

        // deploying again skips
        let again = deployer
            .deploy(TemplateKind::Mcp, &["filesystem".to_string()], &Scope::User)
            .unwrap();
        assert_eq!(again.counts(), (0, 1, 0));
    }

    #[test]
    fn bare_mcp_template_is_accepted() {
        let config = parse_mcp_template(r#"{"command": "uvx", "args": ["srv"]}"#).unwrap();
        assert_eq!(config.command.as_deref(), Some("uvx"));

        let err = parse_mcp_template(r#"{"mcpServers": {}}"#).unwrap_err();
        assert!(err.to_string().contains("exactly one"));
    }
}
