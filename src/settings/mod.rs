//! Typed model of Claude Code settings files.
//!
//! `settings.json` and `settings.local.json` share one shape: the keys the
//! workbench edits get struct members, and every other key rides along in a
//! flattened map so a load/save cycle never loses data. Loading a missing
//! file yields defaults; saving is atomic and takes a backup of the
//! previous contents first.
//!
//! There is no merge-on-save: the file is read fully, edited in memory, and
//! written back. Concurrent external edits are overwritten, last writer
//! wins.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::backup::BackupManager;
use crate::utils::{read_json_file, write_json_file};

/// The three permission arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permissions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deny: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ask: Vec<String>,
}

impl Permissions {
    /// Access one array by level.
    pub fn level(&self, level: crate::permissions::PermissionLevel) -> &Vec<String> {
        use crate::permissions::PermissionLevel::*;
        match level {
            Allow => &self.allow,
            Deny => &self.deny,
            Ask => &self.ask,
        }
    }

    /// Mutable access to one array by level.
    pub fn level_mut(&mut self, level: crate::permissions::PermissionLevel) -> &mut Vec<String> {
        use crate::permissions::PermissionLevel::*;
        match level {
            Allow => &mut self.allow,
            Deny => &mut self.deny,
            Ask => &mut self.ask,
        }
    }
}

/// One settings file, fully in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,

    /// The `hooks` block; its structure is owned by [`crate::hooks`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<Value>,

    /// Environment variables exported to Claude Code sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// `name@marketplace` -> enabled flag
    #[serde(
        rename = "enabledPlugins",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub enabled_plugins: Option<BTreeMap<String, bool>>,

    /// Marketplaces registered directly in settings
    #[serde(
        rename = "extraKnownMarketplaces",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub extra_known_marketplaces: Option<BTreeMap<String, Value>>,

    /// Everything else, preserved verbatim
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl Settings {
    /// Load a settings file, or defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            read_json_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save atomically, backing up the previous contents first.
    pub fn save(&self, path: &Path, backups: &BackupManager) -> Result<()> {
        if path.exists() {
            backups.backup_file(path)?;
        }
        write_json_file(path, self)
    }

    /// Save without a backup. Used when the caller already took one.
    pub fn save_unchecked(&self, path: &Path) -> Result<()> {
        write_json_file(path, self)
    }

    /// Permissions, created on first access.
    pub fn permissions_mut(&mut self) -> &mut Permissions {
        self.permissions.get_or_insert_with(Permissions::default)
    }

    /// Enabled-plugins map, created on first access.
    pub fn enabled_plugins_mut(&mut self) -> &mut BTreeMap<String, bool> {
        self.enabled_plugins.get_or_insert_with(BTreeMap::new)
    }

    /// Env map, created on first access.
    pub fn env_mut(&mut self) -> &mut BTreeMap<String, Value> {
        self.env.get_or_insert_with(BTreeMap::new)
    }
}

/// Merge a project's shared and local settings for display.
///
/// Local overrides shared key by key at the top level, the same way the
/// Claude CLI resolves them. Used for read-only views; edits always target
/// one concrete file.
pub fn merged_view(shared: &Settings, local: &Settings) -> Result<Value> {
    let mut base = serde_json::to_value(shared)?;
    let overlay = serde_json::to_value(local)?;

    if let (Value::Object(base_map), Value::Object(overlay_map)) = (&mut base, overlay) {
        for (key, value) in overlay_map {
            base_map.insert(key, value);
        }
    }
    Ok(base)
}
