//! Full backup and restore flows.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn create_list_restore() {
    let env = TestEnv::new();
    env.write(".claude/settings.json", r#"{"model": "opus"}"#);
    env.write(".claude/agents/helper.md", "# helper");

    env.cwb().args(["backup", "create"]).assert().success();

    let assert = env
        .cwb()
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("claude_backup_"));
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let name = output
        .lines()
        .find(|l| l.contains("claude_backup_"))
        .unwrap()
        .split_whitespace()
        .next()
        .unwrap()
        .to_string();

    // damage the config, then restore
    env.write(".claude/settings.json", "{}");
    std::fs::remove_dir_all(env.claude_dir().join("agents")).unwrap();

    env.cwb()
        .args(["backup", "restore", &name])
        .assert()
        .success();

    assert!(env.read(".claude/settings.json").contains("opus"));
    assert_eq!(env.read(".claude/agents/helper.md"), "# helper");
}

#[test]
fn restore_unknown_backup_fails() {
    let env = TestEnv::new();
    env.cwb()
        .args(["backup", "restore", "claude_backup_19700101_000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn list_with_no_backups() {
    let env = TestEnv::new();
    env.cwb()
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No backups yet"));
}
