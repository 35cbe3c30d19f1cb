//! Prompt records and GitHub import.
//!
//! Prompts live as a JSON array in `~/.claude/prompt/promptInfo.json`.
//! Each record is `{CMD, ACT, PROMPT, ENABLE}`: the command key, a display
//! name, the prompt text, and an active flag.
//!
//! Import fetches `promptInfo.json` from a repository (`main` branch, then
//! `master`); when neither exists it falls back to listing the repo's
//! top-level `.md` files and synthesizing one record per file. Conflicts on
//! an existing `CMD` are resolved per item - skip, overwrite, or rename
//! with an `_imported` suffix - and nothing is written until the merge has
//! run to completion in memory.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::WorkbenchError;
use crate::github::{Fetch, RepoRef};
use crate::utils::{read_json_file, write_json_file};

/// One prompt record. Field names match the file format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptRecord {
    #[serde(rename = "CMD")]
    pub cmd: String,
    #[serde(rename = "ACT", default)]
    pub act: String,
    #[serde(rename = "PROMPT", default)]
    pub prompt: String,
    #[serde(rename = "ENABLE", default)]
    pub enable: bool,
    /// Fields other tools attach, preserved verbatim
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// Load the prompt store, or an empty list when the file is absent.
pub fn load_prompts(path: &Path) -> Result<Vec<PromptRecord>> {
    if path.exists() {
        read_json_file(path)
    } else {
        Ok(Vec::new())
    }
}

/// Save the prompt store as a full rewrite.
pub fn save_prompts(path: &Path, prompts: &[PromptRecord]) -> Result<()> {
    write_json_file(path, &prompts)
}

/// Find a record index by its command key.
pub fn find_prompt(prompts: &[PromptRecord], cmd: &str) -> Option<usize> {
    prompts.iter().position(|p| p.cmd == cmd)
}

/// Set a prompt's enable flag. Errors when the command key is unknown.
pub fn set_enabled(prompts: &mut [PromptRecord], cmd: &str, enable: bool) -> Result<()> {
    match prompts.iter_mut().find(|p| p.cmd == cmd) {
        Some(record) => {
            record.enable = enable;
            Ok(())
        }
        None => Err(WorkbenchError::PromptNotFound {
            cmd: cmd.to_string(),
        }
        .into()),
    }
}

/// Per-item conflict resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConflictResolution {
    /// Leave the existing record untouched, count as skipped
    Skip,
    /// Replace the existing record in place
    Overwrite,
    /// Import under `<cmd>_imported` (then `_imported_1`, `_imported_2`, ...)
    Rename,
}

/// Counters from one merge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Merge imported prompts into the existing list.
///
/// `resolutions` picks a strategy per conflicting `CMD`; items without an
/// entry default to skip.
pub fn merge_prompts(
    existing: &mut Vec<PromptRecord>,
    imported: Vec<PromptRecord>,
    resolutions: &BTreeMap<String, ConflictResolution>,
) -> MergeReport {
    let mut report = MergeReport::default();

    for mut record in imported {
        match find_prompt(existing, &record.cmd) {
            Some(index) => {
                let resolution = resolutions
                    .get(&record.cmd)
                    .copied()
                    .unwrap_or(ConflictResolution::Skip);
                match resolution {
                    ConflictResolution::Overwrite => {
                        existing[index] = record;
                        report.updated += 1;
                    }
                    ConflictResolution::Rename => {
                        record.cmd = free_rename(existing, &record.cmd);
                        existing.push(record);
                        report.added += 1;
                    }
                    ConflictResolution::Skip => report.skipped += 1,
                }
            }
            None => {
                existing.push(record);
                report.added += 1;
            }
        }
    }

    report
}

/// First free `<cmd>_imported[_N]` name.
fn free_rename(existing: &[PromptRecord], cmd: &str) -> String {
    let mut candidate = format!("{cmd}_imported");
    let mut counter = 1;
    while find_prompt(existing, &candidate).is_some() {
        candidate = format!("{cmd}_imported_{counter}");
        counter += 1;
    }
    candidate
}

/// What an import fetched, before any merge decision.
#[derive(Debug, Clone)]
pub struct FetchedPrompts {
    pub prompts: Vec<PromptRecord>,
    /// True when the records were synthesized from .md files
    pub from_markdown: bool,
}

/// Fetch importable prompts from a repository.
///
/// `promptInfo.json` from `main` then `master`; on failure, list top-level
/// `.md` files through the contents API and synthesize one record per
/// file. Files that fail to download are skipped.
pub async fn fetch_prompts<F: Fetch>(fetch: &F, repo: &RepoRef) -> Result<FetchedPrompts> {
    for branch in ["main", "master"] {
        if let Ok(text) = fetch.get_text(&repo.raw_url(branch, "promptInfo.json")).await {
            let prompts: Vec<PromptRecord> = serde_json::from_str(&text)
                .map_err(|e| anyhow::anyhow!("promptInfo.json is not a prompt list: {e}"))?;
            return Ok(FetchedPrompts {
                prompts,
                from_markdown: false,
            });
        }
    }

    // no promptInfo.json on either branch; synthesize from .md files
    let contents = fetch.get_json(&repo.contents_url("")).await?;
    let Value::Array(entries) = contents else {
        return Err(anyhow::anyhow!("unexpected contents response for {repo}"));
    };

    let mut prompts = Vec::new();
    for entry in &entries {
        let name = entry.get("name").and_then(Value::as_str).unwrap_or("");
        if entry.get("type").and_then(Value::as_str) != Some("file") || !name.ends_with(".md") {
            continue;
        }
        let Some(download_url) = entry.get("download_url").and_then(Value::as_str) else {
            continue;
        };
        let Ok(content) = fetch.get_text(download_url).await else {
            tracing::debug!("skipping {name}: download failed");
            continue;
        };

        let stem = name.trim_end_matches(".md");
        prompts.push(PromptRecord {
            cmd: stem.to_lowercase().replace([' ', '-'], "_"),
            act: title_from_stem(stem),
            prompt: content.trim().to_string(),
            enable: true,
            other: BTreeMap::new(),
        });
    }

    if prompts.is_empty() {
        return Err(anyhow::anyhow!(
            "{repo} has no promptInfo.json and no importable .md files"
        ));
    }
    Ok(FetchedPrompts {
        prompts,
        from_markdown: true,
    })
}

fn title_from_stem(stem: &str) -> String {
    stem.replace(['_', '-'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
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
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn record(cmd: &str) -> PromptRecord {
        PromptRecord {
            cmd: cmd.to_string(),
            act: cmd.to_uppercase(),
            prompt: format!("prompt for {cmd}"),
            enable: true,
            other: BTreeMap::new(),
        }
    }

    #[test]
    fn merge_skip_leaves_existing_untouched() {
        let mut existing = vec![record("foo")];
        let original = existing[0].clone();

        let report = merge_prompts(
            &mut existing,
            vec![record("foo")],
            &BTreeMap::from([("foo".to_string(), ConflictResolution::Skip)]),
        );
        assert_eq!(report, MergeReport { added: 0, updated: 0, skipped: 1 });
        assert_eq!(existing, vec![original]);
    }

    #[test]
    fn merge_overwrite_replaces_in_place() {
        let mut existing = vec![record("foo"), record("bar")];
        let mut incoming = record("foo");
        incoming.prompt = "replaced".to_string();

        let report = merge_prompts(
            &mut existing,
            vec![incoming],
            &BTreeMap::from([("foo".to_string(), ConflictResolution::Overwrite)]),
        );
        assert_eq!(report, MergeReport { added: 0, updated: 1, skipped: 0 });
        assert_eq!(existing[0].prompt, "replaced");
        assert_eq!(existing.len(), 2);
    }

    #[test]
    fn merge_rename_finds_free_suffix() {
        let mut existing = vec![record("foo"), record("foo_imported")];

        let report = merge_prompts(
            &mut existing,
            vec![record("foo")],
            &BTreeMap::from([("foo".to_string(), ConflictResolution::Rename)]),
        );
        assert_eq!(report.added, 1);
        assert_eq!(existing.last().unwrap().cmd, "foo_imported_1");
    }

    #[test]
    fn merge_without_conflict_just_adds() {
        let mut existing = vec![record("foo")];
        let report = merge_prompts(&mut existing, vec![record("bar")], &BTreeMap::new());
        assert_eq!(report, MergeReport { added: 1, updated: 0, skipped: 0 });
        assert_eq!(existing.len(), 2);
    }

    #[test]
    fn unresolved_conflicts_default_to_skip() {
        let mut existing = vec![record("foo")];
        let report = merge_prompts(&mut existing, vec![record("foo")], &BTreeMap::new());
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn store_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("promptInfo.json");
        let prompts = vec![record("alpha"), record("beta")];
        save_prompts(&path, &prompts).unwrap();
        assert_eq!(load_prompts(&path).unwrap(), prompts);

        let mut loaded = load_prompts(&path).unwrap();
        set_enabled(&mut loaded, "alpha", false).unwrap();
        assert!(!loaded[0].enable);
        assert!(set_enabled(&mut loaded, "ghost", true).is_err());
    }

    struct StubFetch {
        responses: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl StubFetch {
        fn new(responses: &[(&str, &str)]) -> Self {
            Self {
                responses: responses
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl Fetch for StubFetch {
        async fn get_text(&self, url: &str) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("404"))
        }

        async fn get_json(&self, url: &str) -> Result<Value> {
            let text = self.get_text(url).await?;
            Ok(serde_json::from_str(&text)?)
        }
    }

    fn repo() -> RepoRef {
        RepoRef::parse("acme/prompts").unwrap()
    }

    #[tokio::test]
    async fn prompt_info_from_main_wins() {
        let stub = StubFetch::new(&[(
            "https://raw.githubusercontent.com/acme/prompts/main/promptInfo.json",
            r#"[{"CMD": "tr", "ACT": "Translate", "PROMPT": "translate", "ENABLE": true}]"#,
        )]);

        let fetched = fetch_prompts(&stub, &repo()).await.unwrap();
        assert!(!fetched.from_markdown);
        assert_eq!(fetched.prompts[0].cmd, "tr");
    }

    #[tokio::test]
    async fn master_is_tried_after_main() {
        let stub = StubFetch::new(&[(
            "https://raw.githubusercontent.com/acme/prompts/master/promptInfo.json",
            r#"[{"CMD": "tr", "ACT": "T", "PROMPT": "p", "ENABLE": true}]"#,
        )]);

        let fetched = fetch_prompts(&stub, &repo()).await.unwrap();
        assert_eq!(fetched.prompts.len(), 1);
        let requests = stub.requests.lock().unwrap();
        assert!(requests[0].contains("/main/"));
        assert!(requests[1].contains("/master/"));
    }

    #[tokio::test]
    async fn md_fallback_synthesizes_records() {
        let stub = StubFetch::new(&[
            (
                "https://api.github.com/repos/acme/prompts/contents/",
                r#"[
                    {"name": "Code-Review.md", "type": "file", "download_url": "https://raw.example/cr"},
                    {"name": "notes.txt", "type": "file", "download_url": "https://raw.example/n"},
                    {"name": "broken.md", "type": "file", "download_url": "https://raw.example/broken"}
                ]"#,
            ),
            ("https://raw.example/cr", "Review this code.\n"),
        ]);

        let fetched = fetch_prompts(&stub, &repo()).await.unwrap();
        assert!(fetched.from_markdown);
        assert_eq!(fetched.prompts.len(), 1);
        let p = &fetched.prompts[0];
        assert_eq!(p.cmd, "code_review");
        assert_eq!(p.act, "Code Review");
        assert_eq!(p.prompt, "Review this code.");
        assert!(p.enable);
    }

    #[tokio::test]
    async fn nothing_importable_is_an_error() {
        let stub = StubFetch::new(&[(
            "https://api.github.com/repos/acme/prompts/contents/",
            r#"[{"name": "README.rst", "type": "file", "download_url": "https://x"}]"#,
        )]);
        assert!(fetch_prompts(&stub, &repo()).await.is_err());
    }
}
