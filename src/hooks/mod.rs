//! Hook configuration management.
//!
//! Hooks live in the `hooks` block of a settings file, keyed by event name:
//! `{EventName: [{matcher, hooks: [{type, command, timeout}]}]}`. The
//! workbench lists which of the nine known events are configured, inserts a
//! template entry, and replaces the whole block after a shape check. It
//! never validates that a hook's command is runnable and never executes
//! hooks.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::constants::HOOK_EVENTS;
use crate::core::WorkbenchError;
use crate::settings::Settings;

/// Hook event types dispatched by Claude Code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookEvent {
    #[serde(rename = "PreToolUse")]
    PreToolUse,
    #[serde(rename = "PostToolUse")]
    PostToolUse,
    #[serde(rename = "Notification")]
    Notification,
    #[serde(rename = "UserPromptSubmit")]
    UserPromptSubmit,
    #[serde(rename = "Stop")]
    Stop,
    #[serde(rename = "SubagentStop")]
    SubagentStop,
    #[serde(rename = "PreCompact")]
    PreCompact,
    #[serde(rename = "SessionStart")]
    SessionStart,
    #[serde(rename = "SessionEnd")]
    SessionEnd,
    /// Unknown or future event, round-tripped untouched
    #[serde(untagged)]
    Other(String),
}

impl HookEvent {
    /// Parse an event name; unknown names become [`HookEvent::Other`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "PreToolUse" => Self::PreToolUse,
            "PostToolUse" => Self::PostToolUse,
            "Notification" => Self::Notification,
            "UserPromptSubmit" => Self::UserPromptSubmit,
            "Stop" => Self::Stop,
            "SubagentStop" => Self::SubagentStop,
            "PreCompact" => Self::PreCompact,
            "SessionStart" => Self::SessionStart,
            "SessionEnd" => Self::SessionEnd,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::PreToolUse => "PreToolUse",
            Self::PostToolUse => "PostToolUse",
            Self::Notification => "Notification",
            Self::UserPromptSubmit => "UserPromptSubmit",
            Self::Stop => "Stop",
            Self::SubagentStop => "SubagentStop",
            Self::PreCompact => "PreCompact",
            Self::SessionStart => "SessionStart",
            Self::SessionEnd => "SessionEnd",
            Self::Other(name) => name,
        }
    }
}

/// A single hook command within a matcher group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HookCommand {
    /// Type of hook, in practice always "command"
    #[serde(rename = "type")]
    pub hook_type: String,
    /// Command line to execute
    pub command: String,
    /// Timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Fields this tool does not model, preserved verbatim
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// A matcher group: one regex pattern shared by several hook commands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatcherGroup {
    /// Tool-name pattern; absent for events that are not tool-triggered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    /// Commands to run when the matcher applies
    pub hooks: Vec<HookCommand>,
}

/// The whole `hooks` block, event name to matcher groups.
pub type HooksBlock = BTreeMap<String, Vec<MatcherGroup>>;

/// Parse and shape-check a raw `hooks` value.
///
/// The accepted shape is an object mapping event names to arrays of
/// matcher groups. Anything else is rejected with a reason naming the
/// offending part; per-command unknown fields are allowed through.
pub fn parse_block(value: &Value) -> Result<HooksBlock> {
    let Value::Object(map) = value else {
        return Err(WorkbenchError::HookShapeError {
            reason: "top level must be an object of event name to entry list".to_string(),
        }
        .into());
    };

    let mut block = HooksBlock::new();
    for (event, entries) in map {
        let Value::Array(_) = entries else {
            return Err(WorkbenchError::HookShapeError {
                reason: format!("value for event '{event}' must be an array"),
            }
            .into());
        };
        let groups: Vec<MatcherGroup> =
            serde_json::from_value(entries.clone()).map_err(|e| WorkbenchError::HookShapeError {
                reason: format!("entries for event '{event}' are malformed: {e}"),
            })?;
        block.insert(event.clone(), groups);
    }
    Ok(block)
}

/// Status row for the listing: event name and configured entry count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStatus {
    pub event: String,
    pub entries: usize,
    pub known: bool,
}

/// Status of all nine known events plus any extra configured ones.
pub fn event_statuses(settings: &Settings) -> Result<Vec<EventStatus>> {
    let block = match &settings.hooks {
        Some(value) => parse_block(value)?,
        None => HooksBlock::new(),
    };

    let mut statuses: Vec<EventStatus> = HOOK_EVENTS
        .iter()
        .map(|event| EventStatus {
            event: (*event).to_string(),
            entries: block.get(*event).map_or(0, Vec::len),
            known: true,
        })
        .collect();

    for (event, groups) in &block {
        if !HOOK_EVENTS.contains(&event.as_str()) {
            statuses.push(EventStatus {
                event: event.clone(),
                entries: groups.len(),
                known: false,
            });
        }
    }

    Ok(statuses)
}

/// The template entry inserted by `hooks add`.
///
/// Matches what the original editor inserted: a universal matcher with one
/// echo command and a 30 second timeout.
pub fn template_group(event: &HookEvent) -> MatcherGroup {
    let matcher = match event {
        HookEvent::PreToolUse | HookEvent::PostToolUse => Some("*".to_string()),
        _ => None,
    };
    MatcherGroup {
        matcher,
        hooks: vec![HookCommand {
            hook_type: "command".to_string(),
            command: format!("echo '{} hook fired'", event.as_str()),
            timeout: Some(30),
            other: BTreeMap::new(),
        }],
    }
}

/// Append a template entry for an event in a settings value.
pub fn add_template(settings: &mut Settings, event: &HookEvent) -> Result<()> {
    let mut block = match &settings.hooks {
        Some(value) => parse_block(value)?,
        None => HooksBlock::new(),
    };
    block
        .entry(event.as_str().to_string())
        .or_default()
        .push(template_group(event));
    settings.hooks = Some(serde_json::to_value(&block)?);
    Ok(())
}

/// Replace the whole `hooks` block after a shape check.
pub fn replace_block(settings: &mut Settings, raw: &str) -> Result<()> {
    let value: Value = serde_json::from_str(raw).map_err(|e| WorkbenchError::HookShapeError {
        reason: format!("not valid JSON: {e}"),
    })?;
    let block = parse_block(&value)?;
    settings.hooks = Some(serde_json::to_value(&block)?);
    Ok(())
}
