//! Permission rule editing.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn add_list_parses_kinds() {
    let env = TestEnv::new();

    env.cwb()
        .args(["perm", "add", "allow", "Bash", "git:*"])
        .assert()
        .success();
    env.cwb()
        .args(["perm", "add", "deny", "mcp__fs__delete"])
        .assert()
        .success();
    env.cwb()
        .args(["perm", "add", "ask", "Read", "//c/x/**"])
        .assert()
        .success();

    let settings = env.read_json(".claude/settings.json");
    assert_eq!(settings["permissions"]["allow"][0], "Bash(git:*)");
    assert_eq!(settings["permissions"]["deny"][0], "mcp__fs__delete");
    assert_eq!(settings["permissions"]["ask"][0], "Read(//c/x/**)");

    env.cwb()
        .args(["perm", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bash"))
        .stdout(predicate::str::contains("git:*"))
        .stdout(predicate::str::contains("MCP Tool"))
        .stdout(predicate::str::contains("File Tool"));
}

#[test]
fn move_between_levels() {
    let env = TestEnv::new();
    env.cwb()
        .args(["perm", "add", "ask", "WebFetch", "domain:docs.rs"])
        .assert()
        .success();

    env.cwb()
        .args(["perm", "move", "ask", "allow", "WebFetch(domain:docs.rs)"])
        .assert()
        .success();

    let settings = env.read_json(".claude/settings.json");
    assert_eq!(settings["permissions"]["allow"][0], "WebFetch(domain:docs.rs)");
    assert!(settings["permissions"].get("ask").is_none()
        || settings["permissions"]["ask"].as_array().unwrap().is_empty());
}

#[test]
fn remove_unknown_entry_fails() {
    let env = TestEnv::new();
    env.cwb()
        .args(["perm", "remove", "allow", "Bash(nope)"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not in allow"));
}

#[test]
fn local_flag_targets_local_settings() {
    let env = TestEnv::new();
    env.cwb()
        .args(["perm", "add", "allow", "WebSearch", "--local"])
        .assert()
        .success();

    let local = env.read_json(".claude/settings.local.json");
    assert_eq!(local["permissions"]["allow"][0], "WebSearch");
    assert!(!env.claude_dir().join("settings.json").exists());
}

#[test]
fn editing_preserves_unrelated_settings_keys() {
    let env = TestEnv::new();
    env.write(
        ".claude/settings.json",
        r#"{"model": "opus", "statusLine": {"type": "command"}}"#,
    );

    env.cwb()
        .args(["perm", "add", "allow", "Bash", "ls:*"])
        .assert()
        .success();

    let settings = env.read_json(".claude/settings.json");
    assert_eq!(settings["model"], "opus");
    assert_eq!(settings["statusLine"]["type"], "command");
    assert_eq!(settings["permissions"]["allow"][0], "Bash(ls:*)");
}
