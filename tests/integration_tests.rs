//! Integration tests for the issue-flow CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd. Every
//! test points `--db` at a file in its own temp directory and `--config` at a
//! file that does not exist, so nothing from the user's home leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get an issue-flow command bound to a temp directory
fn flow(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("issue-flow").unwrap();
    cmd.arg("--db")
        .arg(tmp.path().join("database.db"))
        .arg("--config")
        .arg(tmp.path().join("absent.yaml"))
        .env_remove("ISSUE_FLOW_DATABASE")
        .env_remove("ISSUE_FLOW_EDITOR")
        .env_remove("ISSUE_FLOW_VERBOSE")
        .env_remove("RUST_LOG")
        .env("ISSUE_FLOW_WORKTREE_BASE", tmp.path().join("wt"));
    cmd
}

/// Helper to add the demo project
fn add_demo_project(tmp: &TempDir) {
    flow(tmp)
        .args([
            "project", "add", "demo", "--name", "Demo", "--owner", "octo", "--repo", "hello",
        ])
        .assert()
        .success();
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    Command::cargo_bin("issue-flow")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("worktree"));
}

#[test]
fn test_version_flag_displays() {
    Command::cargo_bin("issue-flow")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("issue-flow"));
}

#[test]
fn test_version_command() {
    let tmp = TempDir::new().unwrap();
    flow(&tmp)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "issue-flow v{}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = TempDir::new().unwrap();
    flow(&tmp)
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_memory_database_starts_empty() {
    let tmp = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("issue-flow").unwrap();
    cmd.current_dir(tmp.path())
        .args(["--db", ":memory:", "--config"])
        .arg(tmp.path().join("absent.yaml"))
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found"));
    assert!(!tmp.path().join(":memory:").exists());
}

#[test]
fn test_malformed_config_fails() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.yaml");
    fs::write(&config, "settings: [broken").unwrap();

    Command::cargo_bin("issue-flow")
        .unwrap()
        .arg("--db")
        .arg(tmp.path().join("database.db"))
        .arg("--config")
        .arg(&config)
        .args(["project", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

// ============================================================================
// Project Command Tests
// ============================================================================

#[test]
fn test_project_list_empty() {
    let tmp = TempDir::new().unwrap();
    flow(&tmp)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found"));
}

#[test]
fn test_project_add_creates_database() {
    let tmp = TempDir::new().unwrap();
    flow(&tmp)
        .args([
            "project", "add", "demo", "--name", "Demo", "--owner", "octo", "--repo", "hello",
            "--path", "/src/hello",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added project demo (octo/hello)"));

    assert!(tmp.path().join("database.db").exists());

    flow(&tmp)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("octo/hello"))
        .stdout(predicate::str::contains("/src/hello"));
}

#[test]
fn test_project_add_defaults_worktree_dir() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);

    let project = stdout_json(flow(&tmp).args(["-f", "json", "project", "show", "demo"]));
    let expected = tmp.path().join("wt").join("demo");
    assert_eq!(project["worktree_dir"], expected.display().to_string());
    assert_eq!(project["config"]["branch_config"]["max_slug_length"], 50);
    assert_eq!(project["config"]["opencode"]["enabled"], true);
}

#[test]
fn test_project_list_json_is_ordered_by_name() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);
    flow(&tmp)
        .args([
            "project", "add", "alpha", "--name", "Alpha", "--owner", "o", "--repo", "r",
        ])
        .assert()
        .success();

    let projects = stdout_json(flow(&tmp).args(["-f", "json", "project", "list"]));
    let ids: Vec<_> = projects
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["alpha", "demo"]);
}

#[test]
fn test_project_add_duplicate_fails() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);

    flow(&tmp)
        .args([
            "project", "add", "demo", "--name", "Again", "--owner", "o", "--repo", "r",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to add project 'demo'"));
}

#[test]
fn test_project_add_requires_owner() {
    let tmp = TempDir::new().unwrap();
    flow(&tmp)
        .args(["project", "add", "demo", "--repo", "hello"])
        .assert()
        .failure();

    flow(&tmp)
        .args(["project", "add", "demo", "--owner", "", "--repo", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GitHub owner is required"));
}

#[test]
fn test_project_show() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);

    flow(&tmp)
        .args(["project", "show", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo"))
        .stdout(predicate::str::contains("{prefix}/{issue-number}-{slug}"));

    flow(&tmp)
        .args(["-f", "yaml", "project", "show", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("github_owner: octo"));
}

#[test]
fn test_project_show_missing_fails() {
    let tmp = TempDir::new().unwrap();
    flow(&tmp)
        .args(["project", "show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("project not found: nope"));
}

#[test]
fn test_project_update() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);

    flow(&tmp)
        .args([
            "project",
            "update",
            "demo",
            "--name",
            "Renamed",
            "--max-slug-length",
            "20",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated project demo"));

    let project = stdout_json(flow(&tmp).args(["-f", "json", "project", "show", "demo"]));
    assert_eq!(project["name"], "Renamed");
    assert_eq!(project["github_owner"], "octo");
    assert_eq!(project["config"]["branch_config"]["max_slug_length"], 20);
}

#[test]
fn test_project_update_missing_fails() {
    let tmp = TempDir::new().unwrap();
    flow(&tmp)
        .args(["project", "update", "nope", "--name", "X"])
        .assert()
        .failure();
}

#[test]
fn test_project_remove() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);

    flow(&tmp)
        .args(["project", "remove", "demo", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed project demo"));

    flow(&tmp)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found"));
}

#[test]
fn test_project_remove_without_yes_refuses_when_piped() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);

    flow(&tmp)
        .args(["project", "remove", "demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    flow(&tmp)
        .args(["-f", "id", "project", "list"])
        .assert()
        .success()
        .stdout("demo\n");
}

#[test]
fn test_project_remove_leaves_worktrees() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);
    flow(&tmp)
        .args(["worktree", "add", "-p", "demo", "-i", "7", "-b", "fix/7"])
        .assert()
        .success();

    flow(&tmp)
        .args(["project", "remove", "demo", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 worktree(s) still reference this project"));

    flow(&tmp)
        .args(["-f", "id", "worktree", "list"])
        .assert()
        .success()
        .stdout("wt-demo-7\n");
}

// ============================================================================
// Worktree Command Tests
// ============================================================================

#[test]
fn test_worktree_add_with_explicit_branch() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);

    flow(&tmp)
        .args([
            "worktree", "add", "-p", "demo", "-i", "42", "-b", "fix/42-crash", "--path", "/tmp/wt42",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added worktree wt-demo-42 for demo#42"));

    let worktree = stdout_json(flow(&tmp).args(["-f", "json", "worktree", "show", "wt-demo-42"]));
    assert_eq!(worktree["branch"], "fix/42-crash");
    assert_eq!(worktree["path"], "/tmp/wt42");
    assert_eq!(worktree["status"], "active");
    assert_eq!(worktree["issue_number"], 42);
}

#[test]
fn test_worktree_add_derives_branch_from_cached_issue() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);

    flow(&tmp)
        .args([
            "cache", "put", "demo", "42", "--title", "Crash on start!", "--type", "bug",
        ])
        .assert()
        .success();

    flow(&tmp)
        .args(["worktree", "add", "-p", "demo", "-i", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("issue/42-crash-on-start"));

    let worktree = stdout_json(flow(&tmp).args(["-f", "json", "worktree", "show", "wt-demo-42"]));
    let expected = tmp.path().join("wt").join("demo").join("42");
    assert_eq!(worktree["path"], expected.display().to_string());
}

#[test]
fn test_worktree_add_without_branch_or_cache_fails() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);

    flow(&tmp)
        .args(["worktree", "add", "-p", "demo", "-i", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pass --branch"));
}

#[test]
fn test_worktree_add_unknown_project_fails() {
    let tmp = TempDir::new().unwrap();
    flow(&tmp)
        .args(["worktree", "add", "-p", "ghost", "-i", "1", "-b", "b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("project not found: ghost"));
}

#[test]
fn test_worktree_add_second_for_issue_fails() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);
    flow(&tmp)
        .args(["worktree", "add", "-p", "demo", "-i", "42", "-b", "fix/42"])
        .assert()
        .success();

    flow(&tmp)
        .args([
            "worktree", "add", "-p", "demo", "-i", "42", "-b", "fix/42-b", "--id", "other",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already has worktree wt-demo-42"));
}

#[test]
fn test_worktree_add_duplicate_id_reports_store_error() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);
    flow(&tmp)
        .args(["worktree", "add", "-p", "demo", "-i", "1", "-b", "b1", "--id", "wt"])
        .assert()
        .success();

    flow(&tmp)
        .args(["worktree", "add", "-p", "demo", "-i", "2", "-b", "b2", "--id", "wt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("UNIQUE constraint failed"));
}

#[test]
fn test_worktree_list_filters_by_project() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);
    flow(&tmp)
        .args(["project", "add", "other", "--owner", "o", "--repo", "r"])
        .assert()
        .success();

    for (project, issue) in [("demo", "1"), ("other", "2"), ("demo", "3")] {
        flow(&tmp)
            .args(["worktree", "add", "-p", project, "-i", issue, "-b", "b"])
            .assert()
            .success();
    }

    flow(&tmp)
        .args(["-f", "id", "worktree", "list", "--project", "demo"])
        .assert()
        .success()
        .stdout("wt-demo-1\nwt-demo-3\n");

    flow(&tmp)
        .args(["-f", "id", "worktree", "list"])
        .assert()
        .success()
        .stdout("wt-demo-1\nwt-other-2\nwt-demo-3\n");
}

#[test]
fn test_worktree_status_and_remove() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);
    flow(&tmp)
        .args(["worktree", "add", "-p", "demo", "-i", "9", "-b", "fix/9"])
        .assert()
        .success();

    flow(&tmp)
        .args(["worktree", "status", "wt-demo-9", "merged"])
        .assert()
        .success();

    flow(&tmp)
        .args(["worktree", "show", "wt-demo-9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("merged"));

    flow(&tmp)
        .args(["worktree", "remove", "wt-demo-9", "--yes"])
        .assert()
        .success();

    flow(&tmp)
        .args(["worktree", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No worktrees found"));
}

#[test]
fn test_worktree_status_missing_fails() {
    let tmp = TempDir::new().unwrap();
    flow(&tmp)
        .args(["worktree", "status", "nope", "merged"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("worktree not found: nope"));
}

// ============================================================================
// Issue Cache Command Tests
// ============================================================================

#[test]
fn test_cache_put_is_upsert() {
    let tmp = TempDir::new().unwrap();
    add_demo_project(&tmp);

    flow(&tmp)
        .args(["cache", "put", "demo", "42", "--title", "First title"])
        .assert()
        .success();
    flow(&tmp)
        .args([
            "cache", "put", "demo", "42", "--title", "Second title", "--status", "open",
        ])
        .assert()
        .success();

    let issues = stdout_json(flow(&tmp).args(["-f", "json", "cache", "list", "demo"]));
    let issues = issues.as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["title"], "Second title");
    assert_eq!(issues[0]["status"], "open");
    assert!(issues[0]["type"].is_null());
}

#[test]
fn test_cache_put_for_unknown_project() {
    let tmp = TempDir::new().unwrap();
    flow(&tmp)
        .args(["cache", "put", "ghost", "9", "--title", "Orphan"])
        .assert()
        .success();

    let json = stdout_json(flow(&tmp).args(["cache", "list", "ghost", "-f", "json"]));
    assert_eq!(json[0]["title"], "Orphan");
    assert_eq!(json[0]["issue_number"], 9);
}

#[test]
fn test_cache_list_csv() {
    let tmp = TempDir::new().unwrap();
    flow(&tmp)
        .args(["cache", "put", "demo", "3", "--title", "Hello, world"])
        .assert()
        .success();

    flow(&tmp)
        .args(["-f", "csv", "cache", "list", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "issue,title,type,priority,status,cached_at\n",
        ))
        .stdout(predicate::str::contains("3,\"Hello, world\",,,,"));
}

#[test]
fn test_cache_show_and_clear() {
    let tmp = TempDir::new().unwrap();
    for issue in ["1", "2"] {
        flow(&tmp)
            .args([
                "cache", "put", "demo", issue, "--title", "Issue", "--priority", "high",
            ])
            .assert()
            .success();
    }

    flow(&tmp)
        .args(["cache", "show", "demo", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("high"));

    flow(&tmp)
        .args(["cache", "clear", "demo", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 2 cached issue(s)"));

    flow(&tmp)
        .args(["cache", "show", "demo", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cached issue not found: demo#2"));
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_path_shows_database() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("database.db");

    flow(&tmp)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(db.display().to_string()))
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn test_config_show_json_reflects_env() {
    let tmp = TempDir::new().unwrap();
    let config = stdout_json(
        flow(&tmp)
            .env("ISSUE_FLOW_EDITOR", "vim")
            .args(["-f", "json", "config", "show"]),
    );
    assert_eq!(config["settings"]["editor"], "vim");
    assert_eq!(config["settings"]["opencode_enabled"], true);
}

#[test]
fn test_config_file_is_read() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.yaml");
    fs::write(&config, "settings:\n  opencode_enabled: false\n").unwrap();

    Command::cargo_bin("issue-flow")
        .unwrap()
        .arg("--db")
        .arg(tmp.path().join("database.db"))
        .arg("--config")
        .arg(&config)
        .args(["project", "add", "demo", "--owner", "o", "--repo", "r"])
        .assert()
        .success();

    let mut show = Command::cargo_bin("issue-flow").unwrap();
    show.arg("--db")
        .arg(tmp.path().join("database.db"))
        .arg("--config")
        .arg(tmp.path().join("absent.yaml"))
        .args(["-f", "json", "project", "show", "demo"]);
    let project = stdout_json(&mut show);
    assert_eq!(project["config"]["opencode"]["enabled"], false);
}

#[test]
fn test_completions_generate() {
    let tmp = TempDir::new().unwrap();
    flow(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("issue-flow"));
}
