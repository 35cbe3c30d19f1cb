//! Settings file views and env/model editing.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn env_set_list_unset() {
    let env = TestEnv::new();

    env.cwb()
        .args(["settings", "env", "set", "ANTHROPIC_LOG", "debug"])
        .assert()
        .success();

    env.cwb()
        .args(["settings", "env", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ANTHROPIC_LOG=debug"));

    env.cwb()
        .args(["settings", "env", "unset", "ANTHROPIC_LOG"])
        .assert()
        .success();

    env.cwb()
        .args(["settings", "env", "unset", "ANTHROPIC_LOG"])
        .assert()
        .failure();
}

#[test]
fn model_get_set() {
    let env = TestEnv::new();

    env.cwb()
        .args(["settings", "model", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(default)"));

    env.cwb()
        .args(["settings", "model", "set", "opus"])
        .assert()
        .success();

    assert_eq!(env.read_json(".claude/settings.json")["model"], "opus");
}

#[test]
fn merged_view_overlays_local_over_shared() {
    let env = TestEnv::new();
    let project = env.root().join("proj");
    env.write("proj/.claude/settings.json", r#"{"model": "opus", "theme": "dark"}"#);
    env.write("proj/.claude/settings.local.json", r#"{"model": "sonnet"}"#);

    let assert = env
        .cwb()
        .args(["settings", "show", "--merged", "--project"])
        .arg(&project)
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let merged: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(merged["model"], "sonnet");
    assert_eq!(merged["theme"], "dark");
}

#[test]
fn saves_create_backups() {
    let env = TestEnv::new();
    env.write(".claude/settings.json", r#"{"model": "old"}"#);

    env.cwb()
        .args(["settings", "model", "set", "new"])
        .assert()
        .success();

    // a file backup of the previous settings exists
    let backups = env.state_dir().join("backups");
    let entries: Vec<_> = std::fs::read_dir(&backups)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("file_backup_"))
        .collect();
    assert!(!entries.is_empty());
}
