//! Hook block management.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn list_shows_all_nine_events() {
    let env = TestEnv::new();
    let assert = env.cwb().args(["hooks", "list"]).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for event in [
        "PreToolUse",
        "PostToolUse",
        "Notification",
        "UserPromptSubmit",
        "Stop",
        "SubagentStop",
        "PreCompact",
        "SessionStart",
        "SessionEnd",
    ] {
        assert!(output.contains(event), "missing {event} in:\n{output}");
    }
}

#[test]
fn add_template_marks_event_configured() {
    let env = TestEnv::new();
    env.cwb()
        .args(["hooks", "add", "PreToolUse"])
        .assert()
        .success();

    let settings = env.read_json(".claude/settings.json");
    let entry = &settings["hooks"]["PreToolUse"][0];
    assert_eq!(entry["matcher"], "*");
    assert_eq!(entry["hooks"][0]["type"], "command");
    assert_eq!(entry["hooks"][0]["timeout"], 30);

    env.cwb()
        .args(["hooks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("configured"));
}

#[test]
fn edit_replaces_block_and_validates_shape() {
    let env = TestEnv::new();
    let good = env.write(
        "hooks.json",
        r#"{"Stop": [{"hooks": [{"type": "command", "command": "notify-send done"}]}]}"#,
    );

    env.cwb()
        .args(["hooks", "edit", "--file"])
        .arg(&good)
        .assert()
        .success();

    let settings = env.read_json(".claude/settings.json");
    assert_eq!(
        settings["hooks"]["Stop"][0]["hooks"][0]["command"],
        "notify-send done"
    );

    let bad = env.write("bad.json", r#"{"Stop": "not-a-list"}"#);
    env.cwb()
        .args(["hooks", "edit", "--file"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("rejected"));
}

#[test]
fn remove_clears_one_event() {
    let env = TestEnv::new();
    env.cwb().args(["hooks", "add", "Stop"]).assert().success();
    env.cwb().args(["hooks", "add", "SessionStart"]).assert().success();

    env.cwb().args(["hooks", "remove", "Stop"]).assert().success();

    let settings = env.read_json(".claude/settings.json");
    assert!(settings["hooks"].get("Stop").is_none());
    assert!(settings["hooks"]["SessionStart"].is_array());
}
