//! Tests for the checkout and push-file workflows, run against `MockSystem`

#![expect(clippy::unwrap_used, reason = "This is a test module")]

use confgit::config::Config;
use confgit::error::ConfgitError;
use confgit::git::{ConfigRepository, check_git_availability};
use confgit::operations::{CommandRunner, MemorySink, Stream};
use confgit::system::MockSystem;
use std::path::{Path, PathBuf};

const REMOTE: &str = "git@example.git.host:user/repository.git";

fn config() -> Config {
    Config {
        remote_url: REMOTE.to_owned(),
        local_directory: PathBuf::from("/work/repositoryFolder"),
        git_binary: "git".to_owned(),
    }
}

fn prepared_system() -> MockSystem {
    MockSystem::new()
        .with_dir("/work/repositoryFolder")
        .unwrap()
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|arg| (*arg).to_owned()).collect()
}

#[test]
fn checkout_issues_four_commands_in_order() {
    let system = prepared_system();
    let config = config();
    let runner = CommandRunner::new(&system);

    ConfigRepository::new(&config, &runner)
        .checkout_repository_directory("foo/bar")
        .unwrap();

    assert_eq!(
        system.spawned_args().unwrap(),
        vec![
            args(&["clone", REMOTE, "--no-checkout", "repositoryFolder"]),
            args(&["sparse-checkout", "init"]),
            args(&["add", "foo/bar"]),
            args(&["checkout"]),
        ]
    );

    let spawned = system.spawned().unwrap();
    assert_eq!(spawned[0].working_dir, Path::new("/work"));
    for record in &spawned[1..] {
        assert_eq!(record.working_dir, Path::new("/work/repositoryFolder"));
        assert_eq!(record.invocation.program(), "git");
    }
}

#[test]
fn checkout_stops_at_first_failure() {
    for failing in 0..4 {
        let system = prepared_system().with_exit_code(failing, 128).unwrap();
        let config = config();
        let runner = CommandRunner::new(&system);

        let err = ConfigRepository::new(&config, &runner)
            .checkout_repository_directory("foo/bar")
            .unwrap_err();

        assert!(
            matches!(err, ConfgitError::CommandFailed { exit_code: 128, .. }),
            "step {failing}: {err:?}"
        );
        assert_eq!(system.spawned().unwrap().len(), failing + 1);
    }
}

#[test]
fn push_file_commits_with_generated_message() {
    let system = prepared_system();
    let config = config();
    let runner = CommandRunner::new(&system);

    ConfigRepository::new(&config, &runner)
        .push_file("configs/app.yaml")
        .unwrap();

    let spawned = system.spawned_args().unwrap();
    assert_eq!(
        spawned,
        vec![
            args(&["clone", REMOTE, "--no-checkout", "repositoryFolder"]),
            args(&["sparse-checkout", "init"]),
            args(&["add", "configs/app.yaml"]),
            args(&["commit", "-m", "Added/updated configs/app.yaml file."]),
        ]
    );
    assert!(
        spawned.iter().all(|argv| argv[0] != "push"),
        "no push step is issued"
    );
}

#[test]
fn push_file_stops_when_staging_fails() {
    let system = prepared_system().with_exit_code(2, 1).unwrap();
    let config = config();
    let runner = CommandRunner::new(&system);

    let err = ConfigRepository::new(&config, &runner)
        .push_file("configs/app.yaml")
        .unwrap_err();

    assert_eq!(err.command_exit_code(), Some(1));
    assert_eq!(system.spawned().unwrap().len(), 3);
}

#[test]
fn missing_parent_directory_fails_before_clone() {
    let system = MockSystem::new();
    let config = config();
    let runner = CommandRunner::new(&system);

    let err = ConfigRepository::new(&config, &runner)
        .checkout_repository_directory("foo/bar")
        .unwrap_err();

    assert!(matches!(
        err,
        ConfgitError::DirectoryNotFound { ref path } if path == Path::new("/work")
    ));
    assert!(system.spawned().unwrap().is_empty());
}

#[test]
fn missing_clone_directory_fails_after_clone() {
    // The mock clone does not create its target directory
    let system = MockSystem::new().with_dir("/work").unwrap();
    let config = config();
    let runner = CommandRunner::new(&system);

    let err = ConfigRepository::new(&config, &runner)
        .checkout_repository_directory("foo/bar")
        .unwrap_err();

    assert!(matches!(
        err,
        ConfgitError::DirectoryNotFound { ref path } if path == Path::new("/work/repositoryFolder")
    ));
    assert_eq!(system.spawned().unwrap().len(), 1);
}

#[test]
fn unsafe_paths_are_rejected_before_running_anything() {
    let system = prepared_system();
    let config = config();
    let runner = CommandRunner::new(&system);
    let repository = ConfigRepository::new(&config, &runner);

    for path in ["", "/etc", "../outside"] {
        let err = repository.checkout_repository_directory(path).unwrap_err();
        assert!(matches!(err, ConfgitError::InvalidPath { .. }), "{path}");
        assert!(repository.push_file(path).is_err());
    }

    assert!(system.spawned().unwrap().is_empty());
}

#[test]
fn windows_separators_are_normalized() {
    let system = prepared_system();
    let config = config();
    let runner = CommandRunner::new(&system);

    ConfigRepository::new(&config, &runner)
        .push_file("configs\\app.yaml")
        .unwrap();

    let spawned = system.spawned_args().unwrap();
    assert_eq!(spawned[2], args(&["add", "configs/app.yaml"]));
    assert_eq!(
        spawned[3],
        args(&["commit", "-m", "Added/updated configs/app.yaml file."])
    );
}

#[test]
fn paths_reach_git_as_typed() {
    let system = prepared_system();
    let config = config();
    let runner = CommandRunner::new(&system);
    let repository = ConfigRepository::new(&config, &runner);

    repository.push_file("notes.txt ").unwrap();
    repository.checkout_repository_directory("./services/../api").unwrap();

    let spawned = system.spawned_args().unwrap();
    assert_eq!(spawned[2], args(&["add", "notes.txt "]));
    assert_eq!(
        spawned[3],
        args(&["commit", "-m", "Added/updated notes.txt  file."])
    );
    assert_eq!(spawned[6], args(&["add", "./services/../api"]));
}

#[test]
fn plans_match_executed_steps() {
    let system = prepared_system();
    let config = config();
    let runner = CommandRunner::new(&system);
    let repository = ConfigRepository::new(&config, &runner);

    let plan = repository.plan_checkout("foo/bar").unwrap();
    assert!(system.spawned().unwrap().is_empty());

    repository.checkout_repository_directory("foo/bar").unwrap();
    let executed: Vec<_> = system
        .spawned()
        .unwrap()
        .into_iter()
        .map(|record| (record.working_dir, record.invocation))
        .collect();
    let planned: Vec<_> = plan
        .into_iter()
        .map(|step| (step.working_dir, step.invocation))
        .collect();
    assert_eq!(executed, planned);
}

#[test]
fn custom_git_binary_is_used() {
    let system = prepared_system();
    let mut config = config();
    config.git_binary = "/opt/git/bin/git".to_owned();
    let runner = CommandRunner::new(&system);

    ConfigRepository::new(&config, &runner)
        .checkout_repository_directory("foo")
        .unwrap();

    assert!(
        system
            .spawned()
            .unwrap()
            .iter()
            .all(|record| record.invocation.program() == "/opt/git/bin/git")
    );
}

#[test]
fn workflow_output_reaches_sink() {
    let system = prepared_system()
        .with_output(0, "", "Cloning into 'repositoryFolder'...\n")
        .unwrap();
    let config = config();
    let sink = MemorySink::new();
    let runner = CommandRunner::with_sink(&system, &sink);

    ConfigRepository::new(&config, &runner)
        .checkout_repository_directory("foo/bar")
        .unwrap();

    assert_eq!(
        sink.stream_lines(Stream::Stderr),
        ["Cloning into 'repositoryFolder'..."]
    );
}

#[test]
fn git_version_check_accepts_recent_versions() {
    let system = prepared_system()
        .with_output(0, "git version 2.43.0\n", "")
        .unwrap();
    let runner = CommandRunner::new(&system);

    check_git_availability(&runner, "git", Path::new("/work")).unwrap();

    assert_eq!(system.spawned_args().unwrap(), vec![args(&["--version"])]);
}

#[test]
fn git_version_check_rejects_old_versions() {
    let system = prepared_system()
        .with_output(0, "git version 2.20.1\n", "")
        .unwrap();
    let runner = CommandRunner::new(&system);

    let err = check_git_availability(&runner, "git", Path::new("/work")).unwrap_err();

    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("too old"));
}

#[test]
fn git_version_check_accepts_unknown_output() {
    let system = prepared_system()
        .with_output(0, "some-git-wrapper\n", "")
        .unwrap();
    let runner = CommandRunner::new(&system);

    check_git_availability(&runner, "git", Path::new("/work")).unwrap();
}
