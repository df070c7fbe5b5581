//! Sparse-checkout workflows against the configuration repository

use crate::config::Config;
use crate::error::ConfgitError;
use crate::git::GitCommands;
use crate::operations::commands::{CommandRunner, Step};
use crate::utils::path::repository_path;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Commit message used when committing `file_path`
#[must_use]
#[inline]
pub fn commit_message(file_path: &str) -> String {
    format!("Added/updated {file_path} file.")
}

/// The configured repository and the runner used to drive git against it
pub struct ConfigRepository<'src> {
    config: &'src Config,
    runner: &'src CommandRunner<'src>,
}

impl<'src> ConfigRepository<'src> {
    #[must_use]
    #[inline]
    pub const fn new(config: &'src Config, runner: &'src CommandRunner<'src>) -> Self {
        Self { config, runner }
    }

    /// Clone the repository without a working tree and materialize only `path`
    ///
    /// Stops at the first failing command. A clone that already happened is
    /// left on disk, so the local directory has to be removed before retrying.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `path` is empty, absolute or escapes the repository
    /// - The local directory or its parent does not exist when a step runs
    /// - Any git command cannot be started or fails
    #[inline]
    pub fn checkout_repository_directory(&self, path: &str) -> Result<(), ConfgitError> {
        info!("Checking out '{path}' from {}", self.config.remote_url);
        self.execute(&self.plan_checkout(path)?)
    }

    /// Clone the repository without a working tree, stage `file_path` and
    /// commit it locally
    ///
    /// Nothing is pushed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `file_path` is empty, absolute or escapes the repository
    /// - The local directory or its parent does not exist when a step runs
    /// - Any git command cannot be started or fails
    #[inline]
    pub fn push_file(&self, file_path: &str) -> Result<(), ConfgitError> {
        info!("Committing '{file_path}' to {}", self.config.remote_url);
        self.execute(&self.plan_push_file(file_path)?)
    }

    /// Steps run by [`ConfigRepository::checkout_repository_directory`]
    ///
    /// # Errors
    ///
    /// Returns an error if `path` or the local directory is unusable
    #[inline]
    pub fn plan_checkout(&self, path: &str) -> Result<Vec<Step>, ConfgitError> {
        let pattern = repository_path(path)?;
        let git = self.git();
        let local = self.config.local_directory.clone();

        let mut steps = self.plan_sparse_clone()?;
        steps.push(Step {
            working_dir: local.clone(),
            invocation: git.add(&pattern)?,
        });
        steps.push(Step {
            working_dir: local,
            invocation: git.checkout()?,
        });
        Ok(steps)
    }

    /// Steps run by [`ConfigRepository::push_file`]
    ///
    /// # Errors
    ///
    /// Returns an error if `file_path` or the local directory is unusable
    #[inline]
    pub fn plan_push_file(&self, file_path: &str) -> Result<Vec<Step>, ConfgitError> {
        let pathspec = repository_path(file_path)?;
        let git = self.git();
        let local = self.config.local_directory.clone();

        let mut steps = self.plan_sparse_clone()?;
        steps.push(Step {
            working_dir: local.clone(),
            invocation: git.add(&pathspec)?,
        });
        steps.push(Step {
            working_dir: local,
            invocation: git.commit(&commit_message(&pathspec))?,
        });
        Ok(steps)
    }

    /// Clone with checkout suppressed, then switch on sparse checkout
    fn plan_sparse_clone(&self) -> Result<Vec<Step>, ConfgitError> {
        let git = self.git();
        let (parent, name) = clone_target(&self.config.local_directory)?;

        Ok(vec![
            Step {
                working_dir: parent,
                invocation: git.clone_no_checkout(&self.config.remote_url, &name)?,
            },
            Step {
                working_dir: self.config.local_directory.clone(),
                invocation: git.sparse_checkout_init()?,
            },
        ])
    }

    fn execute(&self, steps: &[Step]) -> Result<(), ConfgitError> {
        for (index, step) in steps.iter().enumerate() {
            debug!("Step {}/{}: {step}", index + 1, steps.len());
            self.runner.run_step(step)?;
        }
        Ok(())
    }

    fn git(&self) -> GitCommands<'src> {
        GitCommands::new(&self.config.git_binary)
    }
}

/// Split the local directory into the directory git clone runs in and the
/// name of the clone
fn clone_target(local_directory: &Path) -> Result<(PathBuf, String), ConfgitError> {
    let name = local_directory
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ConfgitError::configuration(format!(
                "Local directory '{}' has no usable directory name",
                local_directory.display()
            ))
        })?;
    let parent = local_directory
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .ok_or_else(|| {
            ConfgitError::configuration(format!(
                "Local directory '{}' has no parent directory",
                local_directory.display()
            ))
        })?;

    Ok((parent.to_path_buf(), name.to_owned()))
}
