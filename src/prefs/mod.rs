//! Workbench preferences (`config.json`).
//!
//! Theme, font, the tab layout of the original UI (kept as an ordered list
//! so external frontends can consume it), and GitHub client settings.
//! Unknown keys are preserved across rewrites via the flattened map.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::utils::{read_json_file, write_json_file};

/// One entry of the tab layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabEntry {
    /// Stable identifier (e.g. "mcp", "permissions")
    pub id: String,
    /// Display title, user-renamable
    pub title: String,
    /// Hidden tabs stay in the list so their position survives
    #[serde(default = "default_true")]
    pub visible: bool,
}

const fn default_true() -> bool {
    true
}

/// GitHub client settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubPrefs {
    /// Bearer token for api.github.com; empty means anonymous
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
    /// Per-request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
}

/// The workbench preferences file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prefs {
    /// UI theme name
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Font family for frontends that render one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Font size in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    /// Ordered tab layout
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tabs: Vec<TabEntry>,
    /// GitHub client settings
    #[serde(default)]
    pub github: GithubPrefs,
    /// Anything else the file carries, preserved verbatim
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

fn default_theme() -> String {
    "dark".to_string()
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            font_family: None,
            font_size: None,
            tabs: Vec::new(),
            github: GithubPrefs::default(),
            other: BTreeMap::new(),
        }
    }
}

impl Prefs {
    /// Load preferences, falling back to defaults when the file is missing
    /// or unparsable. A broken preferences file must never make the tool
    /// unusable; the parse problem is logged and defaults win.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match read_json_file(path) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!("ignoring unparsable preferences at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save preferences atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_file(path, self)
    }

    /// Look up a tab by id.
    pub fn tab(&self, id: &str) -> Option<&TabEntry> {
        self.tabs.iter().find(|t| t.id == id)
    }

    /// Rename a tab; returns false if no tab has that id.
    pub fn rename_tab(&mut self, id: &str, title: &str) -> bool {
        match self.tabs.iter_mut().find(|t| t.id == id) {
            Some(tab) => {
                tab.title = title.to_string();
                true
            }
            None => false,
        }
    }

    /// Move a tab to a new position, clamping to the list length.
    /// Returns false if no tab has that id.
    pub fn move_tab(&mut self, id: &str, position: usize) -> bool {
        let Some(from) = self.tabs.iter().position(|t| t.id == id) else {
            return false;
        };
        let tab = self.tabs.remove(from);
        let to = position.min(self.tabs.len());
        self.tabs.insert(to, tab);
        true
    }

    /// Effective GitHub request timeout.
    pub fn github_timeout(&self) -> std::time::Duration {
        self.github
            .request_timeout
            .map(std::time::Duration::from_secs)
            .unwrap_or(crate::constants::HTTP_REQUEST_TIMEOUT)
    }
}
