//! Backup and restore of the Claude configuration tree.
//!
//! Two flavors: full backups of `~/.claude` (a fixed list of files and
//! directories, copied into a timestamped folder with a metadata record),
//! and single-file backups taken automatically before risky overwrites.
//! Backups protect against the user's own mistakes, not against concurrent
//! writers.

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::WorkbenchError;
use crate::utils::{copy_dir_all, ensure_dir, write_json_file};

/// Files at the top of `~/.claude` captured by a full backup.
const BACKUP_FILES: [&str; 4] = ["settings.json", "settings.local.json", ".mcp.json", "CLAUDE.md"];

/// Directories under `~/.claude` captured by a full backup.
const BACKUP_DIRS: [&str; 6] = ["agents", "commands", "skills", "hooks", "plugins", "prompt"];

/// Metadata record written into every full backup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupMetadata {
    pub timestamp: String,
    pub date: String,
    pub source: String,
    pub files_backed_up: Vec<String>,
    pub dirs_backed_up: Vec<String>,
}

/// One entry of `backup list`.
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub name: String,
    pub path: PathBuf,
    pub metadata: BackupMetadata,
    pub size_bytes: u64,
}

/// Manages the backup directory for one Claude config tree.
pub struct BackupManager {
    backup_dir: PathBuf,
    claude_dir: PathBuf,
}

impl BackupManager {
    pub fn new(backup_dir: PathBuf, claude_dir: PathBuf) -> Self {
        Self {
            backup_dir,
            claude_dir,
        }
    }

    fn timestamp() -> String {
        Local::now().format("%Y%m%d_%H%M%S").to_string()
    }

    /// Create a full backup. Returns the backup directory path.
    ///
    /// A failure partway through removes the incomplete directory before
    /// returning the error.
    pub fn create_full_backup(&self) -> Result<PathBuf> {
        let timestamp = Self::timestamp();
        let backup_path = self.backup_dir.join(format!("claude_backup_{timestamp}"));

        let result = self.copy_tree(&backup_path, &timestamp);
        if result.is_err() && backup_path.exists() {
            let _ = std::fs::remove_dir_all(&backup_path);
        }
        result?;
        Ok(backup_path)
    }

    fn copy_tree(&self, backup_path: &Path, timestamp: &str) -> Result<()> {
        ensure_dir(backup_path)?;

        let mut files_backed_up = Vec::new();
        for name in BACKUP_FILES {
            let source = self.claude_dir.join(name);
            if source.exists() {
                std::fs::copy(&source, backup_path.join(name))
                    .with_context(|| format!("Failed to back up {}", source.display()))?;
                files_backed_up.push(name.to_string());
            }
        }

        let mut dirs_backed_up = Vec::new();
        for name in BACKUP_DIRS {
            let source = self.claude_dir.join(name);
            if source.exists() {
                copy_dir_all(&source, &backup_path.join(name))?;
                dirs_backed_up.push(name.to_string());
            }
        }

        let metadata = BackupMetadata {
            timestamp: timestamp.to_string(),
            date: Local::now().to_rfc3339(),
            source: self.claude_dir.display().to_string(),
            files_backed_up,
            dirs_backed_up,
        };
        write_json_file(&backup_path.join("backup_metadata.json"), &metadata)
    }

    /// Back up a single file before modification.
    ///
    /// The copy keeps the file's path relative to the Claude directory when
    /// it lives inside one, so restores are unambiguous.
    pub fn backup_file(&self, file_path: &Path) -> Result<PathBuf> {
        if !file_path.exists() {
            return Err(anyhow::anyhow!("File not found: {}", file_path.display()));
        }

        let relative = file_path
            .strip_prefix(&self.claude_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(file_path.file_name().unwrap_or_default()));

        let target = self
            .backup_dir
            .join(format!("file_backup_{}", Self::timestamp()))
            .join(&relative);
        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }
        std::fs::copy(file_path, &target)
            .with_context(|| format!("Failed to back up {}", file_path.display()))?;
        Ok(target)
    }

    /// List all backups, newest first.
    pub fn list(&self) -> Result<Vec<BackupInfo>> {
        let mut backups = Vec::new();
        if !self.backup_dir.exists() {
            return Ok(backups);
        }

        for entry in std::fs::read_dir(&self.backup_dir)? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if !path.is_dir() {
                continue;
            }
            let metadata_file = path.join("backup_metadata.json");
            if name.starts_with("claude_backup_") && metadata_file.exists() {
                let metadata: BackupMetadata = crate::utils::read_json_file(&metadata_file)?;
                let size_bytes = dir_size(&path);
                backups.push(BackupInfo {
                    name,
                    path,
                    metadata,
                    size_bytes,
                });
            } else if name.starts_with("file_backup_") {
                backups.push(BackupInfo {
                    size_bytes: dir_size(&path),
                    metadata: BackupMetadata {
                        timestamp: name.trim_start_matches("file_backup_").to_string(),
                        date: String::new(),
                        source: self.claude_dir.display().to_string(),
                        files_backed_up: Vec::new(),
                        dirs_backed_up: Vec::new(),
                    },
                    name,
                    path,
                });
            }
        }

        backups.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(backups)
    }

    /// Restore a full backup over the Claude directory.
    ///
    /// Directories present in the backup replace their counterparts
    /// wholesale; files are copied over in place.
    pub fn restore(&self, name: &str) -> Result<()> {
        let backup_path = self.backup_dir.join(name);
        if !backup_path.exists() {
            return Err(WorkbenchError::BackupNotFound {
                name: name.to_string(),
            }
            .into());
        }

        for entry in std::fs::read_dir(&backup_path)? {
            let entry = entry?;
            if entry.file_name() == "backup_metadata.json" {
                continue;
            }
            let dest = self.claude_dir.join(entry.file_name());
            if entry.file_type()?.is_dir() {
                if dest.exists() {
                    std::fs::remove_dir_all(&dest)
                        .with_context(|| format!("Failed to clear {}", dest.display()))?;
                }
                copy_dir_all(&entry.path(), &dest)?;
            } else {
                if let Some(parent) = dest.parent() {
                    ensure_dir(parent)?;
                }
                std::fs::copy(entry.path(), &dest)
                    .with_context(|| format!("Failed to restore {}", dest.display()))?;
            }
        }
        Ok(())
    }
}

fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Format a byte count as a human-readable size.
pub fn format_size(size_bytes: u64) -> String {
    let mut size = size_bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} TB")
}
