//! Global constants used throughout the workbench codebase.
//!
//! Timeout durations, well-known file and directory names, and the hook
//! event list live here so the values are defined once and discoverable.

use std::time::Duration;

/// Default timeout for a single HTTP request against GitHub (30 seconds).
///
/// Marketplace and prompt imports run a fixed sequence of fetch strategies;
/// each individual request is bounded by this value unless the user has
/// configured `github.request_timeout` in their preferences.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for git subprocess invocations during config sync (120 seconds).
///
/// Push/pull against a slow remote can legitimately take a while; anything
/// beyond this is treated as a hung connection.
pub const GIT_COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for `claude plugin install` invocations (300 seconds).
///
/// Plugin installation clones the marketplace repository, which may be
/// large.
pub const PLUGIN_INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

/// Name of the user-level configuration directory under `$HOME`.
pub const CLAUDE_DIR: &str = ".claude";

/// Settings file shared within a scope (committed for project scope).
pub const SETTINGS_FILE: &str = "settings.json";

/// Settings overlay local to the current user (gitignored for project scope).
pub const SETTINGS_LOCAL_FILE: &str = "settings.local.json";

/// MCP server map file at a project root or under `~/.claude/`.
pub const MCP_FILE: &str = ".mcp.json";

/// Global Claude configuration file at `$HOME/.claude.json`, holding the
/// per-project `mcpServers` blocks under its `projects` key.
pub const CLAUDE_JSON_FILE: &str = ".claude.json";

/// Prompt store file, relative to the user Claude directory.
pub const PROMPT_INFO_FILE: &str = "prompt/promptInfo.json";

/// Plugin runtime configuration, relative to the user Claude directory.
pub const PLUGIN_CONFIG_FILE: &str = "plugins/config.json";

/// Marketplace registry, relative to the user Claude directory.
pub const KNOWN_MARKETPLACES_FILE: &str = "plugins/known_marketplaces.json";

/// Template kinds with their own subdirectory under the template root.
pub const TEMPLATE_KINDS: [&str; 4] = ["commands", "agents", "skills", "mcp"];

/// The nine hook events Claude Code dispatches, in display order.
pub const HOOK_EVENTS: [&str; 9] = [
    "PreToolUse",
    "PostToolUse",
    "Notification",
    "UserPromptSubmit",
    "Stop",
    "SubagentStop",
    "PreCompact",
    "SessionStart",
    "SessionEnd",
];

/// Environment variable that suppresses progress bars.
pub const ENV_NO_PROGRESS: &str = "CWB_NO_PROGRESS";

/// Environment variable overriding the preferences file location.
pub const ENV_CONFIG: &str = "CWB_CONFIG";

/// Environment variable overriding the user Claude directory (tests).
pub const ENV_CLAUDE_DIR: &str = "CWB_CLAUDE_DIR";

/// Environment variable overriding the workbench state directory (tests).
pub const ENV_STATE_DIR: &str = "CWB_STATE_DIR";
