//! Plugin and marketplace state management.
//!
//! Plugin configuration is split across four stores, and the workbench
//! edits each in place:
//!
//! - `settings.json` `enabledPlugins`: `name@marketplace` -> bool
//! - `settings.json` `extraKnownMarketplaces`: marketplaces registered
//!   directly in settings
//! - `~/.claude/plugins/config.json` `repositories`: what the Claude CLI
//!   has installed
//! - `~/.claude/plugins/known_marketplaces.json`: the CLI's marketplace
//!   registry
//!
//! Installation itself is delegated to `claude plugin install`; its output
//! is surfaced verbatim.

pub mod marketplace;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;

use crate::core::WorkbenchError;
use crate::utils::platform::find_claude_cli;
use crate::utils::{read_json_file, write_json_file};

/// `~/.claude/plugins/config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Repositories the Claude CLI has installed plugins from
    #[serde(default)]
    pub repositories: BTreeMap<String, Value>,

    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl PluginConfig {
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            read_json_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// A marketplace source descriptor, as stored in the registry files.
///
/// The discriminator is the inner `source` field: "github" carries `repo`,
/// "git" carries `url`, "directory" carries `path`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarketplaceSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl MarketplaceSource {
    pub fn github(repo: &str) -> Self {
        Self {
            source: Some("github".to_string()),
            repo: Some(repo.to_string()),
            ..Default::default()
        }
    }

    /// The location field, whichever one is set.
    pub fn location(&self) -> &str {
        self.repo
            .as_deref()
            .or(self.url.as_deref())
            .or(self.path.as_deref())
            .unwrap_or("N/A")
    }
}

/// One registered marketplace.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarketplaceEntry {
    #[serde(default)]
    pub source: MarketplaceSource,

    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// `~/.claude/plugins/known_marketplaces.json`: name -> entry.
pub type KnownMarketplaces = BTreeMap<String, MarketplaceEntry>;

/// Load the marketplace registry, or an empty map when the file is absent.
pub fn load_known_marketplaces(path: &Path) -> Result<KnownMarketplaces> {
    if path.exists() {
        read_json_file(path)
    } else {
        Ok(KnownMarketplaces::new())
    }
}

/// Save the marketplace registry.
pub fn save_known_marketplaces(path: &Path, marketplaces: &KnownMarketplaces) -> Result<()> {
    write_json_file(path, marketplaces)
}

/// Validate a `plugin-name@marketplace-name` reference.
pub fn parse_plugin_ref(input: &str) -> Result<(&str, &str)> {
    match input.split_once('@') {
        Some((plugin, marketplace)) if !plugin.is_empty() && !marketplace.is_empty() => {
            Ok((plugin, marketplace))
        }
        _ => Err(WorkbenchError::ConfigError {
            message: format!("'{input}' must use the plugin-name@marketplace-name format"),
        }
        .into()),
    }
}

/// Output of a `claude plugin install` run.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Install a plugin through the Claude CLI, surfacing its output verbatim.
pub async fn install_plugin(full_name: &str) -> Result<InstallOutcome> {
    parse_plugin_ref(full_name)?;
    let claude = find_claude_cli()?;

    let output = tokio::time::timeout(
        crate::constants::PLUGIN_INSTALL_TIMEOUT,
        tokio::process::Command::new(&claude)
            .args(["plugin", "install", full_name])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output(),
    )
    .await
    .map_err(|_| WorkbenchError::ClaudeCliError {
        operation: format!("plugin install {full_name}"),
        output: "timed out".to_string(),
    })??;

    Ok(InstallOutcome {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}
