//! Shared helpers for the integration suite.
//!
//! Every test gets an isolated environment: a temp directory standing in
//! for the user's home, with `CWB_CLAUDE_DIR`, `CWB_STATE_DIR`, and
//! `CWB_CONFIG` pointed inside it so no test touches real configuration.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn claude_dir(&self) -> PathBuf {
        self.root.path().join(".claude")
    }

    pub fn claude_json(&self) -> PathBuf {
        self.root.path().join(".claude.json")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.path().join("state")
    }

    /// A `cwb` invocation wired to this environment.
    pub fn cwb(&self) -> Command {
        let mut cmd = Command::cargo_bin("cwb").expect("cwb binary");
        cmd.env("CWB_CLAUDE_DIR", self.claude_dir())
            .env("CWB_STATE_DIR", self.state_dir())
            .env("CWB_CONFIG", self.state_dir().join("config.json"))
            .env("CWB_NO_PROGRESS", "1")
            .env("NO_COLOR", "1");
        cmd
    }

    /// Write a file under the environment root, creating parents.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Read a file under the environment root.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.root.path().join(relative)).unwrap()
    }

    /// Parse a JSON file under the environment root.
    pub fn read_json(&self, relative: &str) -> serde_json::Value {
        serde_json::from_str(&self.read(relative)).unwrap()
    }
}
