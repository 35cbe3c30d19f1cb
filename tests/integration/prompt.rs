//! Prompt store management (imports are covered by unit tests with a stub
//! fetcher; no network in this suite).

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn add_list_show_round_trip() {
    let env = TestEnv::new();
    let text = env.write("p.txt", "Translate the following text.\n");

    env.cwb()
        .args(["prompt", "add", "translate", "--act", "Translator", "--file"])
        .arg(&text)
        .assert()
        .success();

    let store = env.read_json(".claude/prompt/promptInfo.json");
    assert_eq!(store[0]["CMD"], "translate");
    assert_eq!(store[0]["ACT"], "Translator");
    assert_eq!(store[0]["ENABLE"], true);

    env.cwb()
        .args(["prompt", "show", "translate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Translate the following text."));
}

#[test]
fn enable_disable_toggle() {
    let env = TestEnv::new();
    env.write(
        ".claude/prompt/promptInfo.json",
        r#"[{"CMD": "x", "ACT": "X", "PROMPT": "p", "ENABLE": true}]"#,
    );

    env.cwb().args(["prompt", "disable", "x"]).assert().success();
    assert_eq!(env.read_json(".claude/prompt/promptInfo.json")[0]["ENABLE"], false);

    env.cwb().args(["prompt", "enable", "x"]).assert().success();
    assert_eq!(env.read_json(".claude/prompt/promptInfo.json")[0]["ENABLE"], true);
}

#[test]
fn duplicate_cmd_rejected() {
    let env = TestEnv::new();
    env.write(
        ".claude/prompt/promptInfo.json",
        r#"[{"CMD": "x", "ACT": "X", "PROMPT": "p", "ENABLE": true}]"#,
    );
    let text = env.write("p.txt", "other");

    env.cwb()
        .args(["prompt", "add", "x", "--file"])
        .arg(&text)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn remove_unknown_prompt_fails() {
    let env = TestEnv::new();
    env.cwb()
        .args(["prompt", "remove", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn extra_record_fields_survive_edits() {
    let env = TestEnv::new();
    env.write(
        ".claude/prompt/promptInfo.json",
        r#"[{"CMD": "x", "ACT": "X", "PROMPT": "p", "ENABLE": true, "TAGS": ["a"]}]"#,
    );

    env.cwb().args(["prompt", "disable", "x"]).assert().success();

    let store = env.read_json(".claude/prompt/promptInfo.json");
    assert_eq!(store[0]["TAGS"][0], "a");
}
