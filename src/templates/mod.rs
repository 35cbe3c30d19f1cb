//! The template library.
//!
//! Templates are reusable command/agent/skill/MCP-server definitions stored
//! under the workbench's own `templates/{commands,agents,skills,mcp}` tree,
//! distinct from deployed copies. Markdown kinds carry frontmatter; the MCP
//! kind holds JSON server entries. Names may include exactly one folder
//! level (`code-quality/code-reviewer`) which the listing surfaces as a
//! tagged [`Entry`] rather than a UI role field.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::WorkbenchError;
use crate::markdown::{self, TemplateMetadata};
use crate::utils::{ensure_dir, read_text_file, safe_write};

/// The four template kinds, each with its own subdirectory and extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TemplateKind {
    Commands,
    Agents,
    Skills,
    Mcp,
}

impl TemplateKind {
    /// Subdirectory name under the template root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Commands => "commands",
            Self::Agents => "agents",
            Self::Skills => "skills",
            Self::Mcp => "mcp",
        }
    }

    /// File extension for this kind.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mcp => "json",
            _ => "md",
        }
    }

    /// Target directory name under a scope's `.claude/` when deploying.
    /// MCP templates deploy into the server map instead of a directory.
    pub fn artifact_dir(self) -> Option<&'static str> {
        match self {
            Self::Commands => Some("commands"),
            Self::Agents => Some("agents"),
            Self::Skills => Some("skills"),
            Self::Mcp => None,
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A listing entry: either a top-level template or a folder of templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A template directly under the kind root
    Template {
        /// Name without extension
        name: String,
    },
    /// One folder level of grouping
    Folder {
        /// Folder name
        name: String,
        /// Template names inside, without the folder prefix
        templates: Vec<String>,
    },
}

/// Report from a bulk import.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BulkReport {
    pub added: usize,
    pub skipped: usize,
}

/// Filesystem-backed template store.
///
/// Constructed with the template root and passed by reference to the CLI
/// commands that need it.
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Directory for one kind (not created until first write).
    pub fn kind_dir(&self, kind: TemplateKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Full path for a template name.
    pub fn template_path(&self, kind: TemplateKind, name: &str) -> PathBuf {
        let ext = kind.extension();
        let file = if name.ends_with(&format!(".{ext}")) {
            name.to_string()
        } else {
            format!("{name}.{ext}")
        };
        self.kind_dir(kind).join(file)
    }

    /// List template names for a kind, sorted, with forward-slash folder
    /// prefixes and no extension.
    pub fn list(&self, kind: TemplateKind) -> Result<Vec<String>> {
        let dir = self.kind_dir(kind);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let ext = kind.extension();
        let mut names = Vec::new();
        for entry in WalkDir::new(&dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some(ext) {
                continue;
            }
            let rel = path.strip_prefix(&dir)?.with_extension("");
            names.push(rel.to_string_lossy().replace('\\', "/"));
        }
        names.sort();
        Ok(names)
    }

    /// List as tagged entries with one folder level of grouping.
    ///
    /// Deeper nesting collapses into the first folder segment, matching how
    /// the original library dialogs displayed the tree.
    pub fn entries(&self, kind: TemplateKind) -> Result<Vec<Entry>> {
        let mut top = Vec::new();
        let mut folders: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for name in self.list(kind)? {
            match name.split_once('/') {
                Some((folder, rest)) => {
                    folders.entry(folder.to_string()).or_default().push(rest.to_string());
                }
                None => top.push(Entry::Template { name }),
            }
        }

        let mut entries: Vec<Entry> = folders
            .into_iter()
            .map(|(name, templates)| Entry::Folder { name, templates })
            .collect();
        entries.extend(top);
        Ok(entries)
    }

    /// Read a template's content.
    ///
    /// Unknown names fail with a nearest-match suggestion when one is close
    /// enough.
    pub fn read(&self, kind: TemplateKind, name: &str) -> Result<String> {
        let path = self.template_path(kind, name);
        if !path.exists() {
            return Err(WorkbenchError::TemplateNotFound {
                name: name.to_string(),
                suggestion: self.closest_name(kind, name),
            }
            .into());
        }
        read_text_file(&path)
    }

    /// Save a template, creating folders as needed.
    pub fn save(&self, kind: TemplateKind, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.template_path(kind, name);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        safe_write(&path, content)?;
        Ok(path)
    }

    /// Delete a template. Returns false when it did not exist.
    pub fn delete(&self, kind: TemplateKind, name: &str) -> Result<bool> {
        let path = self.template_path(kind, name);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to delete template: {}", path.display()))?;
        Ok(true)
    }

    /// Frontmatter summary for a template.
    ///
    /// Markdown kinds parse their frontmatter; commands without one fall
    /// back to heading-derived info. MCP templates report no metadata.
    pub fn info(&self, kind: TemplateKind, name: &str) -> Result<TemplateMetadata> {
        let content = self.read(kind, name)?;
        if kind == TemplateKind::Mcp {
            return Ok(TemplateMetadata::default());
        }
        let parsed = markdown::parse_document(&content)?;
        match parsed.metadata {
            Some(meta) => Ok(meta),
            None if kind == TemplateKind::Commands => Ok(markdown::derive_info(&parsed.body)),
            None => Ok(TemplateMetadata::default()),
        }
    }

    /// Instantiate a template under a new name.
    ///
    /// Replaces `{name}` with the target name and `{NAME}` with its
    /// title-cased form, then rewrites the frontmatter `name:` field for
    /// Markdown kinds.
    pub fn instantiate(
        &self,
        kind: TemplateKind,
        template: &str,
        target_name: &str,
    ) -> Result<String> {
        let content = self.read(kind, template)?;
        let titled = title_case(target_name);
        let replaced = content
            .replace("{name}", target_name)
            .replace("{NAME}", &titled);

        if kind == TemplateKind::Mcp {
            return Ok(replaced);
        }

        let parsed = markdown::parse_document(&replaced)?;
        match parsed.metadata {
            Some(mut meta) => {
                meta.name = Some(target_name.to_string());
                markdown::build_document(&meta, &parsed.body)
            }
            None => Ok(replaced),
        }
    }

    /// Import every matching file from a directory as templates.
    ///
    /// One folder level below `dir` is preserved as a template folder.
    /// Existing names are skipped, never overwritten.
    pub fn bulk_add(&self, kind: TemplateKind, dir: &Path) -> Result<BulkReport> {
        if !dir.is_dir() {
            anyhow::bail!("'{}' is not a directory", dir.display());
        }
        let ext = kind.extension();
        let mut report = BulkReport::default();

        for entry in WalkDir::new(dir).max_depth(2).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some(ext) {
                continue;
            }
            let rel = path.strip_prefix(dir)?.with_extension("");
            let name = rel.to_string_lossy().replace('\\', "/");

            if self.template_path(kind, &name).exists() {
                report.skipped += 1;
                continue;
            }
            let content = read_text_file(path)?;
            self.save(kind, &name, &content)?;
            report.added += 1;
        }

        Ok(report)
    }

    fn closest_name(&self, kind: TemplateKind, name: &str) -> Option<String> {
        let candidates = self.list(kind).ok()?;
        candidates
            .into_iter()
            .map(|c| (strsim::levenshtein(name, &c), c))
            .filter(|(d, _)| *d <= 3)
            .min_by_key(|(d, _)| *d)
            .map(|(_, c)| c)
    }
}

/// `code-reviewer` -> `Code Reviewer`.
fn title_case(name: &str) -> String {
    name.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, TemplateStore) {
        let tmp = TempDir::new().unwrap();
        let store = TemplateStore::new(tmp.path().join("templates"));
        (tmp, store)
    }

    #[test]
    fn save_then_read_is_byte_identical() {
        let (_tmp, store) = store();
        let content = "---\nname: a\n---\n\n# a\n";
        store.save(TemplateKind::Agents, "a", content).unwrap();
        assert_eq!(store.read(TemplateKind::Agents, "a").unwrap(), content);
    }

    #[test]
    fn list_includes_folder_prefixes_sorted() {
        let (_tmp, store) = store();
        store.save(TemplateKind::Agents, "zeta", "z").unwrap();
        store.save(TemplateKind::Agents, "code-quality/reviewer", "r").unwrap();
        store.save(TemplateKind::Agents, "alpha", "a").unwrap();

        let names = store.list(TemplateKind::Agents).unwrap();
        assert_eq!(names, ["alpha", "code-quality/reviewer", "zeta"]);
    }

    #[test]
    fn entries_group_one_folder_level() {
        let (_tmp, store) = store();
        store.save(TemplateKind::Commands, "deploy", "d").unwrap();
        store.save(TemplateKind::Commands, "git/commit", "c").unwrap();
        store.save(TemplateKind::Commands, "git/push", "p").unwrap();

        let entries = store.entries(TemplateKind::Commands).unwrap();
        assert_eq!(
            entries,
            vec![
                Entry::Folder {
                    name: "git".to_string(),
                    templates: vec!["commit".to_string(), "push".to_string()],
                },
                Entry::Template {
                    name: "deploy".to_string()
                },
            ]
        );
    }

    #[test]
    fn mcp_templates_are_json() {
        let (_tmp, store) = store();
        let path = store.save(TemplateKind::Mcp, "filesystem", "{}").unwrap();
        assert_eq!(path.extension().unwrap(), "json");
        assert_eq!(store.list(TemplateKind::Mcp).unwrap(), ["filesystem"]);
    }

    #[test]
    fn missing_template_suggests_closest() {
        let (_tmp, store) = store();
        store.save(TemplateKind::Agents, "code-reviewer", "x").unwrap();
        let err = store.read(TemplateKind::Agents, "code-reviwer").unwrap_err();
        let err = err.downcast::<WorkbenchError>().unwrap();
        match err {
            WorkbenchError::TemplateNotFound { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("code-reviewer"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn delete_reports_existence() {
        let (_tmp, store) = store();
        store.save(TemplateKind::Skills, "s", "x").unwrap();
        assert!(store.delete(TemplateKind::Skills, "s").unwrap());
        assert!(!store.delete(TemplateKind::Skills, "s").unwrap());
    }

    #[test]
    fn instantiate_replaces_placeholders_and_frontmatter_name() {
        let (_tmp, store) = store();
        let template = "---\nname: template\ndescription: builds {name}\n---\n\n# {NAME}\n\nUse {name}.\n";
        store.save(TemplateKind::Agents, "base", template).unwrap();

        let out = store
            .instantiate(TemplateKind::Agents, "base", "log-parser")
            .unwrap();
        let parsed = crate::markdown::parse_document(&out).unwrap();
        let meta = parsed.metadata.unwrap();
        assert_eq!(meta.name.as_deref(), Some("log-parser"));
        assert_eq!(meta.description.as_deref(), Some("builds log-parser"));
        assert!(parsed.body.contains("# Log Parser"));
        assert!(parsed.body.contains("Use log-parser."));
    }

    #[test]
    fn bulk_add_skips_existing() {
        let (tmp, store) = store();
        let import = tmp.path().join("import");
        crate::utils::safe_write(&import.join("one.md"), "1").unwrap();
        crate::utils::safe_write(&import.join("grouped/two.md"), "2").unwrap();
        store.save(TemplateKind::Commands, "one", "existing").unwrap();

        let report = store.bulk_add(TemplateKind::Commands, &import).unwrap();
        assert_eq!(report, BulkReport { added: 1, skipped: 1 });
        // the existing template is untouched
        assert_eq!(store.read(TemplateKind::Commands, "one").unwrap(), "existing");
        assert_eq!(store.read(TemplateKind::Commands, "grouped/two").unwrap(), "2");
    }

    #[test]
    fn info_falls_back_to_heading_for_commands() {
        let (_tmp, store) = store();
        store
            .save(TemplateKind::Commands, "bare", "# Bare Command\n\nDoes a thing.\n")
            .unwrap();
        let info = store.info(TemplateKind::Commands, "bare").unwrap();
        assert_eq!(info.name.as_deref(), Some("Bare Command"));
        assert_eq!(info.description.as_deref(), Some("Does a thing."));
    }
}
