//! Marketplace metadata fetching.
//!
//! A marketplace repository can publish its metadata in several layouts.
//! Fetching runs an ordered list of strategies and stops at the first
//! success; later strategies are never attempted. Each strategy tries the
//! `main` branch, then `master`. When everything fails, the error carries
//! one line per attempted strategy.
//!
//! The strategies, in order:
//! 1. `marketplace.json` at the repository root
//! 2. `.claude-plugin/marketplace.json`
//! 3. single-plugin repositories: `.claude-plugin/plugin.json` at the root
//! 4. multi-plugin repositories: list the `plugins/` directory through the
//!    contents API and fetch each subdirectory's plugin.json

use anyhow::Result;
use futures::future::join_all;
use serde_json::Value;

use crate::core::WorkbenchError;
use crate::github::{Fetch, RepoRef};

const BRANCHES: [&str; 2] = ["main", "master"];

/// Which strategy produced the metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    RootManifest,
    ClaudePluginManifest,
    SinglePlugin,
    PluginsDirectory,
}

impl FetchStrategy {
    pub fn describe(self) -> &'static str {
        match self {
            Self::RootManifest => "marketplace.json at the repository root",
            Self::ClaudePluginManifest => ".claude-plugin/marketplace.json",
            Self::SinglePlugin => "single-plugin format (.claude-plugin/plugin.json)",
            Self::PluginsDirectory => "plugins/ directory listing",
        }
    }
}

/// One plugin as advertised by a marketplace.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginListing {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    /// The full metadata object as published
    pub raw: Value,
}

/// Fetched marketplace metadata.
#[derive(Debug, Clone)]
pub struct MarketplaceData {
    pub name: Option<String>,
    pub plugins: Vec<PluginListing>,
    /// The strategy that succeeded
    pub strategy: FetchStrategy,
}

/// Fetch marketplace metadata for a repository.
///
/// Strategies run strictly in order; the first success wins.
pub async fn fetch_marketplace<F: Fetch>(fetch: &F, repo: &RepoRef) -> Result<MarketplaceData> {
    let mut attempts = Vec::new();

    match try_manifest(fetch, repo, "marketplace.json").await {
        Ok(data) => return Ok(parse_manifest(&data, FetchStrategy::RootManifest)?),
        Err(e) => attempts.push(format!("{}: {e}", FetchStrategy::RootManifest.describe())),
    }

    match try_manifest(fetch, repo, ".claude-plugin/marketplace.json").await {
        Ok(data) => return Ok(parse_manifest(&data, FetchStrategy::ClaudePluginManifest)?),
        Err(e) => attempts.push(format!(
            "{}: {e}",
            FetchStrategy::ClaudePluginManifest.describe()
        )),
    }

    match try_single_plugin(fetch, repo).await {
        Ok(data) => return Ok(data),
        Err(e) => attempts.push(format!("{}: {e}", FetchStrategy::SinglePlugin.describe())),
    }

    match try_plugins_directory(fetch, repo).await {
        Ok(data) => return Ok(data),
        Err(e) => attempts.push(format!("{}: {e}", FetchStrategy::PluginsDirectory.describe())),
    }

    Err(WorkbenchError::MarketplaceFetchFailed {
        repo: repo.to_string(),
        attempts,
    }
    .into())
}

/// Fetch a manifest file from main, then master.
async fn try_manifest<F: Fetch>(fetch: &F, repo: &RepoRef, path: &str) -> Result<Value> {
    let mut last_err = None;
    for branch in BRANCHES {
        match fetch.get_text(&repo.raw_url(branch, path)).await {
            Ok(text) => {
                return serde_json::from_str(&text)
                    .map_err(|e| anyhow::anyhow!("invalid JSON: {e}"));
            }
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("no branches attempted")))
}

fn parse_manifest(data: &Value, strategy: FetchStrategy) -> Result<MarketplaceData> {
    let name = data.get("name").and_then(Value::as_str).map(String::from);
    let plugins = match data.get("plugins") {
        // list form: [{"name": ...}, ...]
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let name = item.get("name")?.as_str()?.to_string();
                Some(listing(name, item.clone()))
            })
            .collect(),
        // map form: {"plugin-name": {...}, ...}
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, item)| listing(name.clone(), item.clone()))
            .collect(),
        _ => Vec::new(),
    };

    if plugins.is_empty() {
        return Err(anyhow::anyhow!("manifest contains no plugins"));
    }
    Ok(MarketplaceData {
        name,
        plugins,
        strategy,
    })
}

async fn try_single_plugin<F: Fetch>(fetch: &F, repo: &RepoRef) -> Result<MarketplaceData> {
    let data = try_manifest(fetch, repo, ".claude-plugin/plugin.json").await?;
    let name = data
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(repo.repo.as_str())
        .to_string();
    Ok(MarketplaceData {
        name: None,
        plugins: vec![listing(name, data)],
        strategy: FetchStrategy::SinglePlugin,
    })
}

async fn try_plugins_directory<F: Fetch>(fetch: &F, repo: &RepoRef) -> Result<MarketplaceData> {
    let contents = fetch.get_json(&repo.contents_url("plugins")).await?;
    let Value::Array(entries) = contents else {
        return Err(anyhow::anyhow!("plugins/ is not a directory"));
    };

    let dirs: Vec<String> = entries
        .iter()
        .filter(|e| e.get("type").and_then(Value::as_str) == Some("dir"))
        .filter_map(|e| e.get("name").and_then(Value::as_str).map(String::from))
        .collect();
    if dirs.is_empty() {
        return Err(anyhow::anyhow!("plugins/ contains no plugin directories"));
    }

    // each subdirectory's plugin.json fetch is independent; run them
    // together and fall back to stub metadata where one is missing
    let fetches = dirs.iter().map(|dir| {
        let path = format!("plugins/{dir}/.claude-plugin/plugin.json");
        async move {
            match try_manifest(fetch, repo, &path).await {
                Ok(data) => {
                    let name = data
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or(dir.as_str())
                        .to_string();
                    listing(name, data)
                }
                Err(_) => listing(
                    dir.clone(),
                    serde_json::json!({
                        "name": dir,
                        "version": "unknown",
                        "description": format!("Plugin from {repo}"),
                    }),
                ),
            }
        }
    });
    let plugins = join_all(fetches).await;

    Ok(MarketplaceData {
        name: None,
        plugins,
        strategy: FetchStrategy::PluginsDirectory,
    })
}

fn listing(name: String, raw: Value) -> PluginListing {
    PluginListing {
        version: raw.get("version").and_then(Value::as_str).map(String::from),
        description: raw
            .get("description")
            .and_then(Value::as_str)
            .map(String::from),
        name,
        raw,
    }
}
