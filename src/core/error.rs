//! Error handling for the workbench.
//!
//! Two layers cooperate here:
//! 1. [`WorkbenchError`] - strongly typed failure cases for precise handling
//!    in code.
//! 2. [`ErrorContext`] - a display wrapper that adds suggestions and detail
//!    lines for CLI users.
//!
//! Domain code attaches `anyhow` context freely; [`user_friendly_error`]
//! downcasts at the top level and picks a suggestion for the known cases.
//! Every file, JSON, subprocess, and network failure surfaces as exactly one
//! message - nothing is retried automatically.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for workbench operations.
///
/// Each variant carries the details a user needs to fix the problem: file
/// paths, server names, the stderr of a failed subprocess, the list of fetch
/// strategies that were attempted.
#[derive(Error, Debug)]
pub enum WorkbenchError {
    /// Git executable not found in PATH.
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// A git invocation returned a non-zero exit code.
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git operation that failed (e.g. "push", "pull", "status")
        operation: String,
        /// Combined error output from the git command
        stderr: String,
    },

    /// The Claude config directory is not a git repository yet.
    #[error("{path} is not a git repository")]
    SyncNotInitialized {
        /// The directory that was expected to contain a repository
        path: String,
    },

    /// The `claude` CLI executable could not be located.
    #[error("Claude CLI not found (looked for `claude` and `claude.cmd`)")]
    ClaudeCliNotFound,

    /// A `claude` subcommand failed.
    #[error("Claude CLI command failed: {operation}")]
    ClaudeCliError {
        /// The subcommand that failed (e.g. "plugin install")
        operation: String,
        /// Combined stdout/stderr from the CLI, surfaced verbatim
        output: String,
    },

    /// A settings or config JSON file could not be parsed.
    #[error("Invalid JSON in {file}")]
    JsonParseError {
        /// Path of the file that failed to parse
        file: String,
        /// The serde error message
        reason: String,
    },

    /// A template with the given name does not exist.
    #[error("Template '{name}' not found")]
    TemplateNotFound {
        /// The requested template name
        name: String,
        /// Closest existing name, when one is similar enough to suggest
        suggestion: Option<String>,
    },

    /// An MCP server entry does not exist in the selected scope.
    #[error("MCP server '{name}' not found in {scope} scope")]
    McpServerNotFound {
        /// The requested server name
        name: String,
        /// The scope that was searched
        scope: String,
    },

    /// An MCP server entry failed structural validation.
    #[error("Invalid MCP server configuration for '{name}': {reason}")]
    McpServerInvalid {
        /// Server name
        name: String,
        /// What is missing or contradictory
        reason: String,
    },

    /// The replacement `hooks` block has the wrong shape.
    #[error("Hook configuration rejected: {reason}")]
    HookShapeError {
        /// Why the block was rejected
        reason: String,
    },

    /// Every fetch strategy for a marketplace failed.
    #[error("Could not fetch marketplace metadata from {repo}")]
    MarketplaceFetchFailed {
        /// The `owner/repo` that was queried
        repo: String,
        /// One line per strategy, in the order they were attempted
        attempts: Vec<String>,
    },

    /// A GitHub request failed with an HTTP error status.
    #[error("GitHub API returned {status} for {url}")]
    GitHubApiError {
        /// HTTP status code
        status: u16,
        /// The request URL
        url: String,
        /// Truncated response body
        body: String,
    },

    /// A network-level failure (DNS, connect, timeout).
    #[error("Network error during {operation}")]
    NetworkError {
        /// What was being fetched
        operation: String,
        /// Underlying reason
        reason: String,
    },

    /// A named backup does not exist.
    #[error("Backup '{name}' not found")]
    BackupNotFound {
        /// The requested backup directory name
        name: String,
    },

    /// A prompt record with the given command key does not exist.
    #[error("Prompt '{cmd}' not found")]
    PromptNotFound {
        /// The CMD key that was looked up
        cmd: String,
    },

    /// Generic configuration problem.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// Pass-through for I/O errors.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A user-facing error wrapper with optional suggestion and detail lines.
///
/// Built by [`user_friendly_error`] at the CLI boundary. `display()` prints
/// a colored three-part message: the error, an optional suggestion, and
/// optional details.
pub struct ErrorContext {
    /// The underlying error
    pub error: anyhow::Error,
    /// One-line actionable suggestion, if we have one
    pub suggestion: Option<String>,
    /// Extra context lines (e.g. attempted fetch strategies)
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error with no suggestion or details.
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: error.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Attach a one-line suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach extra detail lines.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with color.
    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self.error);
        if let Some(ref details) = self.details {
            for line in details.lines() {
                eprintln!("  {}", line.dimmed());
            }
        }
        if let Some(ref suggestion) = self.suggestion {
            eprintln!("{} {}", "hint:".yellow().bold(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(ref details) = self.details {
            write!(f, "\n{details}")?;
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\nhint: {suggestion}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Convert any error into an [`ErrorContext`] with a suggestion for the
/// known failure cases.
///
/// Unknown errors pass through with their `anyhow` context chain intact.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    // derive the presentation first so the borrow ends before the error is
    // moved into the context
    let (suggestion, details): (Option<String>, Option<String>) =
        match error.downcast_ref::<WorkbenchError>() {
            Some(WorkbenchError::GitNotFound) => (
                Some("Install git from https://git-scm.com/ and ensure it is in PATH".into()),
                None,
            ),
            Some(WorkbenchError::SyncNotInitialized { .. }) => (
                Some("Run `cwb sync init` to set up configuration sync first".into()),
                None,
            ),
            Some(WorkbenchError::ClaudeCliNotFound) => (
                Some("Install the Claude Code CLI and ensure `claude` is in PATH".into()),
                None,
            ),
            Some(WorkbenchError::TemplateNotFound { suggestion, .. }) => (
                Some(match suggestion {
                    Some(s) => {
                        format!("Did you mean '{s}'? Run `cwb template list` to see all templates")
                    }
                    None => "Run `cwb template list` to see available templates".into(),
                }),
                None,
            ),
            Some(WorkbenchError::JsonParseError { file, .. }) => (
                Some(format!(
                    "Fix the JSON syntax in {file} or restore it from a backup (`cwb backup list`)"
                )),
                None,
            ),
            Some(WorkbenchError::MarketplaceFetchFailed { attempts, .. }) => (
                Some("Check the repository URL and that it publishes a marketplace.json".into()),
                Some(
                    attempts
                        .iter()
                        .enumerate()
                        .map(|(i, a)| format!("{}. {a}", i + 1))
                        .collect::<Vec<_>>()
                        .join("\n"),
                ),
            ),
            Some(WorkbenchError::GitHubApiError { status: 403, .. }) => (
                Some(
                    "You may be rate limited; configure a token with \
                     `cwb prefs set github.token <token>`"
                        .into(),
                ),
                None,
            ),
            Some(WorkbenchError::McpServerNotFound { scope, .. }) => (
                Some(format!(
                    "Run `cwb mcp list --scope {scope}` to see configured servers"
                )),
                None,
            ),
            _ => (None, None),
        };

    ErrorContext {
        error,
        suggestion,
        details,
    }
}
