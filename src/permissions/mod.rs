//! Permission entry parsing and construction.
//!
//! A permission entry is a plain string in one of the three settings
//! arrays. Display splits it into a kind and a pattern with a single
//! regex; editing rebuilds the string from those two parts. No
//! normalization of overlapping patterns and no precedence computation -
//! this is display-and-edit bookkeeping only, exactly as wide as what the
//! settings file stores.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Which settings array an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    Allow,
    Deny,
    Ask,
}

impl PermissionLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
            Self::Ask => "ask",
        }
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Display classification of a permission entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionKind {
    /// `Read`/`Write`/`Edit`/`Glob` with a path pattern
    FileTool,
    /// `Bash(...)`; the pattern is the inner command pattern
    Bash,
    /// `WebFetch(...)`
    WebFetch,
    /// `mcp__server__tool` entries
    McpTool,
    /// Any other tool, with or without a pattern
    Tool,
}

impl PermissionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FileTool => "File Tool",
            Self::Bash => "Bash",
            Self::WebFetch => "WebFetch",
            Self::McpTool => "MCP Tool",
            Self::Tool => "Tool",
        }
    }
}

/// A parsed permission row: kind plus the pattern shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPermission {
    pub kind: PermissionKind,
    /// What the pattern column shows. For Bash and WebFetch this is the
    /// inner pattern; for everything else the entry as written.
    pub pattern: String,
}

fn tool_call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w+)\((.*)\)$").expect("static regex"))
}

/// Parse one permission string into its display row.
///
/// `Bash(git:*)` -> Bash / `git:*`; `mcp__fs__read` -> MCP Tool,
/// unchanged; `Read(//c/x/**)` -> File Tool; a bare name -> Tool.
pub fn parse_permission(entry: &str) -> ParsedPermission {
    if let Some(caps) = tool_call_re().captures(entry) {
        let tool = &caps[1];
        let inner = &caps[2];
        return match tool {
            "Read" | "Write" | "Edit" | "Glob" => ParsedPermission {
                kind: PermissionKind::FileTool,
                pattern: entry.to_string(),
            },
            "Bash" => ParsedPermission {
                kind: PermissionKind::Bash,
                pattern: inner.to_string(),
            },
            "WebFetch" => ParsedPermission {
                kind: PermissionKind::WebFetch,
                pattern: inner.to_string(),
            },
            _ => ParsedPermission {
                kind: PermissionKind::Tool,
                pattern: entry.to_string(),
            },
        };
    }

    if entry.starts_with("mcp__") {
        return ParsedPermission {
            kind: PermissionKind::McpTool,
            pattern: entry.to_string(),
        };
    }

    ParsedPermission {
        kind: PermissionKind::Tool,
        pattern: entry.to_string(),
    }
}

/// Rebuild a permission string from a tool name and an optional pattern.
///
/// `("Bash", Some("git:*"))` -> `Bash(git:*)`; `("mcp__fs__read", None)`
/// -> `mcp__fs__read`.
pub fn build_permission(tool: &str, pattern: Option<&str>) -> String {
    match pattern {
        Some(p) if !p.is_empty() => format!("{tool}({p})"),
        _ => tool.to_string(),
    }
}
