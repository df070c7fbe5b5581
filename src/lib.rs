//! `confgit` - drive git to sparse-check-out and commit files in a
//! configuration repository
//!
//! The library never talks to a repository itself: every operation is a
//! sequence of git invocations run through [`operations::CommandRunner`],
//! which streams the child's output to the log and turns a non-zero exit
//! status into an error.

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod operations;
pub mod system;
pub mod utils;

use anyhow::{Context as _, Result};
use cli::{Action, Args};
use config::Config;
use git::{ConfigRepository, check_git_availability};
use operations::CommandRunner;
use system::System;
use tracing::info;

/// Main entry point for the confgit library
///
/// # Errors
///
/// Returns an error if the configuration cannot be resolved, git is missing
/// or too old, or any step of the selected workflow fails
pub fn run(args: &Args, system: &dyn System) -> Result<()> {
    let config = Config::resolve(system, args.config.as_deref(), args.overrides())?;
    let runner = CommandRunner::new(system);
    let repository = ConfigRepository::new(&config, &runner);

    if args.dry_run {
        let steps = match &args.action {
            Action::Checkout { path } => repository.plan_checkout(path)?,
            Action::PushFile { file } => repository.plan_push_file(file)?,
        };

        info!("Dry run preview - no commands will be run:");
        for (index, step) in steps.iter().enumerate() {
            info!("  {}. {step}", index + 1);
        }
        return Ok(());
    }

    let current_dir = system
        .current_dir()
        .context("Failed to determine the current directory")?;
    check_git_availability(&runner, &config.git_binary, &current_dir)?;

    match &args.action {
        Action::Checkout { path } => repository.checkout_repository_directory(path)?,
        Action::PushFile { file } => repository.push_file(file)?,
    }

    info!("\u{2713} Done");
    Ok(())
}
