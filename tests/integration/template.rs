//! Template library and deploy flows.

use predicates::prelude::*;

use super::common::TestEnv;

const AGENT: &str = "---\nname: reviewer\ndescription: reviews code\n---\n\n# Reviewer\n";

#[test]
fn add_list_show_delete_round_trip() {
    let env = TestEnv::new();
    let src = env.write("reviewer.md", AGENT);

    env.cwb()
        .args(["template", "add", "agents", "reviewer"])
        .arg("--file")
        .arg(&src)
        .assert()
        .success();

    env.cwb()
        .args(["template", "list", "agents"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reviewer"));

    // byte-identical round trip
    env.cwb()
        .args(["template", "show", "agents", "reviewer"])
        .assert()
        .success()
        .stdout(predicate::eq(AGENT));

    env.cwb()
        .args(["template", "delete", "agents", "reviewer"])
        .assert()
        .success();

    env.cwb()
        .args(["template", "list", "agents"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reviewer").not());
}

#[test]
fn duplicate_add_requires_force() {
    let env = TestEnv::new();
    let src = env.write("a.md", "one");

    env.cwb()
        .args(["template", "add", "commands", "dup", "--file"])
        .arg(&src)
        .assert()
        .success();

    env.cwb()
        .args(["template", "add", "commands", "dup", "--file"])
        .arg(&src)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    env.cwb()
        .args(["template", "add", "commands", "dup", "--force", "--file"])
        .arg(&src)
        .assert()
        .success();
}

#[test]
fn info_reads_frontmatter() {
    let env = TestEnv::new();
    let src = env.write("reviewer.md", AGENT);
    env.cwb()
        .args(["template", "add", "agents", "reviewer", "--file"])
        .arg(&src)
        .assert()
        .success();

    env.cwb()
        .args(["template", "info", "agents", "reviewer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reviews code"));
}

#[test]
fn unknown_template_suggests_closest_name() {
    let env = TestEnv::new();
    let src = env.write("a.md", AGENT);
    env.cwb()
        .args(["template", "add", "agents", "code-reviewer", "--file"])
        .arg(&src)
        .assert()
        .success();

    env.cwb()
        .args(["template", "show", "agents", "code-reviwer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("code-reviewer"));
}

#[test]
fn deploy_skips_existing_and_reports_counts() {
    let env = TestEnv::new();
    let src = env.write("a.md", "# a\n");
    env.cwb()
        .args(["template", "add", "agents", "helper", "--file"])
        .arg(&src)
        .assert()
        .success();

    // pre-existing deployed file with different bytes
    env.write(".claude/agents/helper.md", "user edited");

    env.cwb()
        .args(["deploy", "agents", "helper"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 deployed, 1 skipped"));

    // existing bytes untouched
    assert_eq!(env.read(".claude/agents/helper.md"), "user edited");
}

#[test]
fn deploy_to_project_scope() {
    let env = TestEnv::new();
    let src = env.write("c.md", "# deploy\n");
    env.cwb()
        .args(["template", "add", "commands", "release", "--file"])
        .arg(&src)
        .assert()
        .success();

    let project = env.root().join("proj");
    std::fs::create_dir_all(&project).unwrap();

    env.cwb()
        .args(["deploy", "commands", "release", "--project"])
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 deployed"));

    assert_eq!(env.read("proj/.claude/commands/release.md"), "# deploy\n");
}

#[test]
fn new_instantiates_placeholders() {
    let env = TestEnv::new();
    let src = env.write(
        "base.md",
        "---\nname: base\n---\n\n# {NAME}\n\nAgent {name} reporting.\n",
    );
    env.cwb()
        .args(["template", "add", "agents", "base", "--file"])
        .arg(&src)
        .assert()
        .success();

    env.cwb()
        .args(["template", "new", "agents", "base", "log-parser"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Log Parser"))
        .stdout(predicate::str::contains("Agent log-parser reporting."))
        .stdout(predicate::str::contains("name: log-parser"));
}

#[test]
fn bulk_add_imports_directory() {
    let env = TestEnv::new();
    env.write("import/one.md", "1");
    env.write("import/grouped/two.md", "2");

    env.cwb()
        .args(["template", "bulk-add", "commands"])
        .arg(env.root().join("import"))
        .assert()
        .success()
        .stdout(predicate::str::contains("2 added, 0 skipped"));

    env.cwb()
        .args(["template", "list", "commands"])
        .assert()
        .success()
        .stdout(predicate::str::contains("grouped/"))
        .stdout(predicate::str::contains("one"));
}
