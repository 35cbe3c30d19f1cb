//! Markdown frontmatter parsing and reassembly.
//!
//! Templates for agents, commands, and skills are Markdown files with an
//! optional leading `---`-delimited YAML block. Parsing goes through
//! gray_matter with a raw engine (so malformed YAML still yields the body)
//! and serde_yaml for the typed view. Known fields get struct members;
//! everything else lands in an open map so a parse/edit/rebuild cycle never
//! silently drops a key.

use anyhow::{Context, Result};
use gray_matter::{Matter, Pod, engine::Engine};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// gray_matter engine that returns the raw frontmatter text without parsing.
///
/// Extracting the raw block first keeps the body intact even when the YAML
/// inside the delimiters is malformed.
struct RawFrontmatter;

impl Engine for RawFrontmatter {
    fn parse(content: &str) -> Result<Pod, gray_matter::Error> {
        Ok(Pod::String(content.to_string()))
    }
}

/// Typed view of a template's frontmatter.
///
/// The named fields are the ones the editors surface; `extra` holds every
/// other key verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TemplateMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Comma-separated tool list, kept as written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Unknown keys, preserved across round-trips
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl TemplateMetadata {
    /// True when no field and no extra key is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.tools.is_none()
            && self.model.is_none()
            && self.color.is_none()
            && self.extra.is_empty()
    }
}

/// Result of splitting a Markdown document.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Parsed frontmatter, when present and valid YAML
    pub metadata: Option<TemplateMetadata>,
    /// Raw frontmatter text between the delimiters, when present
    pub raw_frontmatter: Option<String>,
    /// Document body with the frontmatter removed
    pub body: String,
}

impl ParsedDocument {
    pub fn has_frontmatter(&self) -> bool {
        self.raw_frontmatter.is_some()
    }
}

/// Split a Markdown document into frontmatter and body.
///
/// Malformed YAML inside the delimiters is an error (the raw block is still
/// carried in the error context); a document without frontmatter parses
/// successfully with `metadata: None`.
pub fn parse_document(content: &str) -> Result<ParsedDocument> {
    let matter: Matter<RawFrontmatter> = Matter::new();
    let parsed = matter
        .parse::<String>(content)
        .map_err(|e| anyhow::anyhow!("Failed to split frontmatter: {e}"))?;

    let raw = parsed.data.filter(|raw| !raw.is_empty());
    let metadata = match raw.as_deref() {
        Some(raw_text) => Some(
            serde_yaml::from_str::<TemplateMetadata>(raw_text)
                .context("Frontmatter is not valid YAML")?,
        ),
        None => None,
    };

    Ok(ParsedDocument {
        metadata,
        raw_frontmatter: raw,
        body: parsed.content,
    })
}

/// Reassemble a document from metadata and body.
///
/// Emits an equivalent (not byte-identical) frontmatter block: the same
/// key/value pairs in serde_yaml's ordering. Empty metadata produces a bare
/// body.
pub fn build_document(metadata: &TemplateMetadata, body: &str) -> Result<String> {
    if metadata.is_empty() {
        return Ok(body.to_string());
    }
    let yaml = serde_yaml::to_string(metadata).context("Failed to serialize frontmatter")?;
    Ok(format!("---\n{yaml}---\n\n{}", body.trim_start_matches('\n')))
}

/// Derive display info for a Markdown file without frontmatter.
///
/// Commands are often plain Markdown: the `# ` heading becomes the name and
/// the first paragraph after it (or the line under a `## Description`
/// section) becomes the description.
pub fn derive_info(body: &str) -> TemplateMetadata {
    let mut info = TemplateMetadata::default();
    let lines: Vec<&str> = body.lines().collect();

    for line in &lines {
        if let Some(title) = line.strip_prefix("# ") {
            info.name = Some(title.trim().to_string());
            break;
        }
    }

    let mut past_title = false;
    for (i, line) in lines.iter().enumerate() {
        if line.starts_with("# ") {
            past_title = true;
            continue;
        }
        if past_title && !line.trim().is_empty() && !line.starts_with('#') {
            info.description = Some(line.trim().to_string());
            break;
        }
        if line.trim().eq_ignore_ascii_case("## description") {
            for candidate in lines.iter().skip(i + 1).take(4) {
                if !candidate.trim().is_empty() && !candidate.starts_with('#') {
                    info.description = Some(candidate.trim().to_string());
                    break;
                }
            }
            break;
        }
    }

    info
}
