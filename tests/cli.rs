//! End-to-end tests driving the `fleet` binary against scratch git
//! repositories and a temporary `$HOME`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::process::Command as StdCommand;
use tempfile::TempDir;

struct Fixture {
    home: TempDir,
    repo_a: TempDir,
    repo_b: TempDir,
}

fn init_repo(dir: &TempDir) {
    StdCommand::new("git").arg("init").current_dir(dir.path()).output().expect("git init");
    StdCommand::new("git")
        .args(["config", "user.email", "fleet@example.com"])
        .current_dir(dir.path())
        .output()
        .expect("config email");
    StdCommand::new("git")
        .args(["config", "user.name", "fleet"])
        .current_dir(dir.path())
        .output()
        .expect("config name");
    std::fs::write(dir.path().join("README.md"), "hello\n").expect("write file");
    StdCommand::new("git").args(["add", "."]).current_dir(dir.path()).output().expect("add");
    StdCommand::new("git")
        .args(["commit", "-m", "initial"])
        .current_dir(dir.path())
        .output()
        .expect("commit");
}

fn write_config(fixture: &Fixture) {
    let config_dir = fixture.home.path().join(".config").join("git-fleet");
    std::fs::create_dir_all(&config_dir).expect("create config dir");
    let config = format!(
        r#"{{
  "repositories": {{
    "repo-a": {{ "path": {:?} }},
    "repo-b": {{ "path": {:?} }}
  }},
  "groups": {{
    "all": ["repo-a", "repo-b"]
  }},
  "theme": "fleet"
}}"#,
        fixture.repo_a.path().to_string_lossy(),
        fixture.repo_b.path().to_string_lossy(),
    );
    std::fs::write(config_dir.join(".gfconfig.json"), config).expect("write config");
}

fn fixture() -> Fixture {
    let home = tempfile::tempdir().expect("home tempdir");
    let repo_a = tempfile::tempdir().expect("repo a tempdir");
    let repo_b = tempfile::tempdir().expect("repo b tempdir");
    init_repo(&repo_a);
    init_repo(&repo_b);
    let fixture = Fixture { home, repo_a, repo_b };
    write_config(&fixture);
    fixture
}

fn fleet_cmd(fixture: &Fixture) -> Command {
    let mut cmd = Command::cargo_bin("fleet").expect("fleet binary");
    cmd.env("HOME", fixture.home.path());
    cmd
}

#[test]
fn test_status_runs_clean_on_fresh_repos() {
    let fixture = fixture();
    fleet_cmd(&fixture).arg("status").assert().success();
}

#[test]
fn test_version_prints_package_version() {
    let fixture = fixture();
    fleet_cmd(&fixture)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("git-fleet"));
}

#[test]
fn test_config_lists_configured_repositories() {
    let fixture = fixture();
    fleet_cmd(&fixture)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("repo-a"))
        .stdout(predicate::str::contains("repo-b"));
}

#[test]
fn test_git_status_porcelain_succeeds_across_fleet() {
    let fixture = fixture();
    fleet_cmd(&fixture).args(["status", "--porcelain"]).assert().success();
}

#[test]
fn test_groups_flag_restricts_to_selected_group() {
    let fixture = fixture();
    fleet_cmd(&fixture).args(["--groups", "all", "status", "--porcelain"]).assert().success();
}

#[test]
fn test_unknown_group_fails_with_nonzero_exit() {
    let fixture = fixture();
    fleet_cmd(&fixture).args(["--groups", "nonexistent", "status", "--porcelain"]).assert().failure();
}

#[test]
fn test_shell_command_with_operator_runs_through_shell() {
    let fixture = fixture();
    fleet_cmd(&fixture).args(["echo", "hi", "&&", "echo", "bye"]).assert().success();
}

#[test]
fn test_failing_git_subcommand_yields_failure_exit_code() {
    let fixture = fixture();
    fleet_cmd(&fixture).args(["branch", "--no-such-flag"]).assert().failure();
}
