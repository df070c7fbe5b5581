//! CLI interface tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const REMOTE: &str = "git@example.git.host:user/repository.git";

/// The binary, isolated from the caller's environment and config files
fn confgit(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("confgit").unwrap();
    cmd.current_dir(home.path())
        .env_remove("CONFGIT_REMOTE_URL")
        .env_remove("CONFGIT_LOCAL_DIR")
        .env_remove("RUST_LOG")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    confgit(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("confgit"));
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    confgit(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sparse-checking-out"))
        .stdout(predicate::str::contains("push-file"));
}

#[test]
fn test_missing_config_error() {
    let home = TempDir::new().unwrap();
    confgit(&home)
        .args(["--config", "nonexistent.yaml", "checkout", "foo/bar"])
        .assert()
        .failure()
        .code(1) // Configuration error
        .stdout(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_missing_remote_url_error() {
    let home = TempDir::new().unwrap();
    confgit(&home)
        .args(["checkout", "foo/bar"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("No remote URL configured"));
}

#[test]
fn test_dry_run_prints_checkout_plan() {
    let home = TempDir::new().unwrap();
    confgit(&home)
        .args(["--remote-url", REMOTE, "--dry-run", "checkout", "foo/bar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run preview"))
        .stdout(predicate::str::contains(format!(
            "git clone {REMOTE} --no-checkout repositoryFolder"
        )))
        .stdout(predicate::str::contains("git sparse-checkout init"))
        .stdout(predicate::str::contains("git add foo/bar"))
        .stdout(predicate::str::contains("git checkout"));

    assert!(!home.path().join("repositoryFolder").exists());
}

#[test]
fn test_dry_run_prints_commit_message() {
    let home = TempDir::new().unwrap();
    confgit(&home)
        .env("CONFGIT_REMOTE_URL", REMOTE)
        .args(["push-file", "configs/app.yaml", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("git add configs/app.yaml"))
        .stdout(predicate::str::contains(
            r#"git commit -m "Added/updated configs/app.yaml file.""#,
        ));
}

#[test]
fn test_config_file_in_current_directory() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("confgit.yaml"),
        format!("remote_url: \"{REMOTE}\"\nlocal_directory: clones/configs\n"),
    )
    .unwrap();

    confgit(&home)
        .args(["--dry-run", "checkout", "services/api"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-checkout configs"))
        .stdout(predicate::str::contains("git add services/api"));
}

#[test]
fn test_invalid_config_file_error() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("confgit.yaml"), "repository: typo\n").unwrap();

    confgit(&home)
        .args(["--dry-run", "checkout", "foo"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Configuration validation failed"));
}

#[test]
fn test_checkout_help_mentions_anchored_patterns() {
    let home = TempDir::new().unwrap();
    confgit(&home)
        .args(["checkout", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Anchored"))
        .stdout(predicate::str::contains("rejected"));
}

#[test]
fn test_anchored_pattern_error() {
    let home = TempDir::new().unwrap();
    confgit(&home)
        .args(["--remote-url", REMOTE, "--dry-run", "checkout", "/config"])
        .assert()
        .failure()
        .code(5);
}

#[test]
fn test_unsafe_path_error() {
    let home = TempDir::new().unwrap();
    confgit(&home)
        .args(["--remote-url", REMOTE, "--dry-run", "checkout", "../outside"])
        .assert()
        .failure()
        .code(5);
}

#[test]
fn test_missing_git_binary_error() {
    let home = TempDir::new().unwrap();
    confgit(&home)
        .args([
            "--remote-url",
            REMOTE,
            "--git-binary",
            "confgit-test-no-such-git",
            "checkout",
            "foo/bar",
        ])
        .assert()
        .failure()
        .code(3) // Spawn error
        .stdout(predicate::str::contains("confgit-test-no-such-git"));
}
