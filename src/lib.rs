//! Claude Workbench - a configuration workbench for Claude Code.
//!
//! The workbench browses, creates, edits, and deploys the configuration
//! artifacts Claude Code reads: reusable templates for commands, agents,
//! skills, and MCP servers; permission rules; hook configurations; plugin
//! and marketplace registrations; and prompt records. Everything is
//! persisted as the same JSON and Markdown files the Claude CLI itself
//! uses, under `~/.claude` and per-project `.claude` trees.
//!
//! # Architecture
//!
//! Each editor surface is a thin CLI command over a library module that
//! owns the persistence logic:
//!
//! - [`templates`] - the template library (`templates/{commands,agents,skills,mcp}`)
//! - [`markdown`] - YAML frontmatter parsing with an open key map
//! - [`deploy`] - copying templates into a scope, skip-if-exists
//! - [`settings`] - typed `settings.json` model with unknown-key preservation
//! - [`permissions`] - allow/deny/ask rule parsing and construction
//! - [`hooks`] - hook event blocks in the settings files
//! - [`mcp`] - MCP server maps across user/local/project scopes
//! - [`plugins`] - plugin stores, marketplace registry, metadata fetching
//! - [`prompts`] - the promptInfo.json store and GitHub import
//! - [`github`] - one-shot GitHub GETs behind a testable trait
//! - [`sync`] - the config tree as a git repository
//! - [`backup`] - timestamped backups and restore
//! - [`prefs`] - the workbench's own preferences
//! - [`config`] - path resolution for every file above
//! - [`cli`] - the clap command tree wiring it together
//!
//! State flows top-down: the CLI builds one [`config::Paths`] and hands it
//! to each store. There are no singletons, no background state, and no
//! cross-file transactions - every operation is read file, edit in memory,
//! write back atomically.

pub mod backup;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod deploy;
pub mod github;
pub mod hooks;
pub mod markdown;
pub mod mcp;
pub mod permissions;
pub mod plugins;
pub mod prefs;
pub mod prompts;
pub mod settings;
pub mod sync;
pub mod templates;
pub mod utils;
