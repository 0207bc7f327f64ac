//! CLI end-to-end tests that invoke the compiled `skills` binary.
//!
//! Every invocation passes `--library` and `--project` explicitly so the
//! tests never touch the real home directory.

use assert_cmd::Command;
use predicates::prelude::*;
use skill_test_utils::TestRoots;
use std::fs;
use std::path::Path;

fn skills_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("skills"))
}

/// `skills` bound to the library and the given project directory.
fn skills_in(roots: &TestRoots, project: &Path) -> Command {
    let mut cmd = skills_cmd();
    cmd.env_remove("SKILLS_LIBRARY")
        .arg("--library")
        .arg(roots.library_dir())
        .arg("--project")
        .arg(project);
    cmd
}

fn skills(roots: &TestRoots) -> Command {
    skills_in(roots, &roots.project_dir())
}

/// Publish `alpha` v1 from the main project.
fn publish_alpha(roots: &TestRoots) {
    roots.write_project_skill("alpha", &[("SKILL.md", "# alpha\n")]);
    skills(roots).args(["push", "alpha"]).assert().success();
}

/// Advance `alpha` to v2 from a second project.
fn advance_alpha(roots: &TestRoots) {
    let other = roots.path().join("other");
    fs::create_dir_all(&other).unwrap();
    skills_in(roots, &other)
        .args(["install", "alpha"])
        .assert()
        .success();
    fs::write(other.join(".skills/skills/alpha/SKILL.md"), "# alpha v2\n").unwrap();
    skills_in(roots, &other)
        .args(["push", "alpha"])
        .assert()
        .success();
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_output() {
    skills_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pull"))
        .stdout(predicate::str::contains("harness"));
}

#[test]
fn test_version_output() {
    skills_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skills"));
}

#[test]
fn test_no_command_shows_help_hint() {
    skills_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("skills --help"));
}

#[test]
fn test_usage_error_exits_one() {
    skills_cmd()
        .args(["resolve", "alpha", "--strategy", "theirs"])
        .assert()
        .code(1);
}

// ============================================================================
// Sync commands
// ============================================================================

#[test]
fn test_push_new_skill_then_status_json() {
    let roots = TestRoots::new();
    roots.write_project_skill("alpha", &[("SKILL.md", "# alpha\n")]);

    skills(&roots)
        .args(["push", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pushed"))
        .stdout(predicate::str::contains("v1"));

    let output = skills(&roots)
        .args(["status", "alpha", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["status"], "synced");
    assert_eq!(status["projectEntry"]["version"], 1);
    assert_eq!(status["libraryEntry"], status["projectEntry"]);
}

#[test]
fn test_install_unknown_skill_fails_with_one() {
    let roots = TestRoots::new();
    skills(&roots)
        .args(["install", "ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_invalid_id_fails_with_one() {
    let roots = TestRoots::new();
    skills(&roots)
        .args(["push", "Not_Valid"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid skill id"));
}

#[test]
fn test_pull_behind_updates_project() {
    let roots = TestRoots::new();
    publish_alpha(&roots);
    advance_alpha(&roots);

    skills(&roots)
        .args(["pull", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated"));
    assert_eq!(roots.read_project_file("alpha", "SKILL.md"), "# alpha v2\n");
}

#[test]
fn test_push_behind_exits_one() {
    let roots = TestRoots::new();
    publish_alpha(&roots);
    advance_alpha(&roots);

    skills(&roots)
        .args(["push", "alpha"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pull first"));
}

#[test]
fn test_diverged_push_and_pull_exit_two() {
    let roots = TestRoots::new();
    publish_alpha(&roots);
    advance_alpha(&roots);
    fs::write(
        roots.project_skill_dir("alpha").join("SKILL.md"),
        "# alpha local\n",
    )
    .unwrap();

    skills(&roots)
        .args(["push", "alpha"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("diverged"));
    skills(&roots).args(["pull", "alpha"]).assert().code(2);
    assert_eq!(roots.read_library_file("alpha", "SKILL.md"), "# alpha v2\n");
}

#[test]
fn test_resolve_project_then_synced() {
    let roots = TestRoots::new();
    publish_alpha(&roots);
    advance_alpha(&roots);
    fs::write(
        roots.project_skill_dir("alpha").join("SKILL.md"),
        "# alpha local\n",
    )
    .unwrap();

    skills(&roots)
        .args(["resolve", "alpha", "--strategy", "project"])
        .assert()
        .success()
        .stdout(predicate::str::contains("v3"));
    skills(&roots)
        .args(["status", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("synced"));
    assert_eq!(roots.read_library_file("alpha", "SKILL.md"), "# alpha local\n");
}

#[test]
fn test_resolve_merge_is_unsupported() {
    let roots = TestRoots::new();
    publish_alpha(&roots);

    skills(&roots)
        .args(["resolve", "alpha", "--strategy", "merge"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("merge"));
}

#[test]
fn test_uninstall_keeps_library() {
    let roots = TestRoots::new();
    publish_alpha(&roots);

    skills(&roots)
        .args(["uninstall", "alpha"])
        .assert()
        .success();

    roots.assert_not_exists("project/.skills/skills/alpha");
    roots.assert_exists("library/skills/alpha/SKILL.md");
    skills(&roots)
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("library-only"));
}

#[test]
fn test_library_from_environment() {
    let roots = TestRoots::new();
    roots.write_project_skill("alpha", &[("SKILL.md", "# alpha\n")]);

    skills_cmd()
        .env("SKILLS_LIBRARY", roots.library_dir())
        .arg("--project")
        .arg(roots.project_dir())
        .args(["push", "alpha"])
        .assert()
        .success();

    roots.assert_exists("library/skills/alpha/SKILL.md");
}

// ============================================================================
// Harness commands
// ============================================================================

#[test]
fn test_harness_sync_copy_registers() {
    let roots = TestRoots::new();
    roots.write_project_skill("alpha", &[("SKILL.md", "# alpha\n")]);

    skills(&roots)
        .args(["harness", "sync", "opencode", "--mode", "copy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 written"));

    roots.assert_exists("project/.opencode/skill/alpha/SKILL.md");
    let lock = fs::read_to_string(roots.project_root().join("skills.lock.json")).unwrap();
    assert!(lock.contains("\"opencode\": \"copy\""));

    skills(&roots)
        .args(["harness", "sync", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"synced\": 1"));
}

#[test]
fn test_harness_status_json() {
    let roots = TestRoots::new();
    roots.write_project_skill("alpha", &[("SKILL.md", "# alpha\n")]);

    let output = skills(&roots)
        .args(["harness", "status", "cursor", "--mode", "copy", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["missing"], 1);
    assert_eq!(reports[0]["entries"][0]["state"], "missing");
    roots.assert_not_exists("project/.cursor");
}

#[test]
fn test_harness_unknown_name_exits_one() {
    let roots = TestRoots::new();
    skills(&roots)
        .args(["harness", "sync", "vim"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("claude-code"));
}

#[test]
fn test_harness_list() {
    let roots = TestRoots::new();
    skills(&roots)
        .args(["harness", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("claude-code"))
        .stdout(predicate::str::contains(".cursor/rules"));
}
