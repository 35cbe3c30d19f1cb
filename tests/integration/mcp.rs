//! MCP server management across scopes and explicit save targets.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn add_and_list_local_scope() {
    let env = TestEnv::new();

    env.cwb()
        .args([
            "mcp", "add", "filesystem", "--template", "npx", "--package",
            "@modelcontextprotocol/server-filesystem",
        ])
        .assert()
        .success();

    let config = env.read_json(".claude/.mcp.json");
    assert_eq!(config["mcpServers"]["filesystem"]["command"], "npx");
    assert_eq!(config["mcpServers"]["filesystem"]["args"][0], "-y");

    env.cwb()
        .args(["mcp", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("filesystem"))
        .stdout(predicate::str::contains("stdio"));
}

#[test]
fn project_scope_writes_to_explicit_target() {
    let env = TestEnv::new();
    let project = env.root().join("proj");
    std::fs::create_dir_all(&project).unwrap();

    env.cwb()
        .args(["mcp", "add", "shared", "--command", "python", "--arg", "server.py"])
        .arg("--project")
        .arg(&project)
        .assert()
        .success();

    env.cwb()
        .args(["mcp", "add", "private", "--command", "deno", "--target", "claude-json"])
        .arg("--project")
        .arg(&project)
        .assert()
        .success();

    // shared went to .mcp.json at the project root
    let shared = env.read_json("proj/.mcp.json");
    assert!(shared["mcpServers"]["shared"].is_object());
    assert!(shared["mcpServers"].get("private").is_none());

    // private went to the project-keyed block in ~/.claude.json
    let global = env.read_json(".claude.json");
    let key = project.display().to_string();
    assert!(global["projects"][&key]["mcpServers"]["private"].is_object());

    // merged listing tags origins
    env.cwb()
        .args(["mcp", "list"])
        .arg("--project")
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("shared"))
        .stdout(predicate::str::contains("private"))
        .stdout(predicate::str::contains(".mcp.json"))
        .stdout(predicate::str::contains("projects"));
}

#[test]
fn http_server_requires_url() {
    let env = TestEnv::new();

    env.cwb()
        .args(["mcp", "add", "api", "--url", "https://example.com/mcp", "--transport", "sse"])
        .assert()
        .success();

    let config = env.read_json(".claude/.mcp.json");
    assert_eq!(config["mcpServers"]["api"]["type"], "sse");
    assert_eq!(config["mcpServers"]["api"]["url"], "https://example.com/mcp");
}

#[test]
fn wrap_and_unwrap_cmd() {
    let env = TestEnv::new();
    env.cwb()
        .args(["mcp", "add", "fs", "--template", "npx", "--package", "pkg"])
        .assert()
        .success();

    env.cwb().args(["mcp", "wrap", "fs"]).assert().success();
    let wrapped = env.read_json(".claude/.mcp.json");
    assert_eq!(wrapped["mcpServers"]["fs"]["command"], "cmd");
    assert_eq!(wrapped["mcpServers"]["fs"]["args"][0], "/c");
    assert_eq!(wrapped["mcpServers"]["fs"]["args"][1], "npx");

    env.cwb().args(["mcp", "unwrap", "fs"]).assert().success();
    let unwrapped = env.read_json(".claude/.mcp.json");
    assert_eq!(unwrapped["mcpServers"]["fs"]["command"], "npx");
    assert_eq!(unwrapped["mcpServers"]["fs"]["args"][0], "-y");
}

#[test]
fn remove_and_missing_server_error() {
    let env = TestEnv::new();
    env.cwb()
        .args(["mcp", "add", "gone", "--command", "x"])
        .assert()
        .success();

    env.cwb().args(["mcp", "remove", "gone"]).assert().success();

    env.cwb()
        .args(["mcp", "show", "gone"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn unknown_keys_in_claude_json_survive() {
    let env = TestEnv::new();
    env.write(
        ".claude.json",
        r#"{"numStartups": 42, "projects": {}, "tipsHistory": {"x": 1}}"#,
    );

    env.cwb()
        .args(["mcp", "add", "srv", "--command", "x", "--scope", "user"])
        .assert()
        .success();

    let global = env.read_json(".claude.json");
    assert_eq!(global["numStartups"], 42);
    assert_eq!(global["tipsHistory"]["x"], 1);
    assert_eq!(global["mcpServers"]["srv"]["command"], "x");
}
