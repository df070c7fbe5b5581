//! Git command lines and the git availability check

use crate::error::ConfgitError;
use crate::operations::commands::{CommandRunner, Invocation};
use crate::operations::drain::{MemorySink, Stream};
use std::path::Path;
use tracing::debug;

/// Oldest git release that ships `git sparse-checkout`
pub const MIN_GIT_VERSION: (u32, u32, u32) = (2, 25, 0);

/// Builds the git invocations used by the workflows
#[derive(Debug, Clone, Copy)]
pub struct GitCommands<'cfg> {
    git: &'cfg str,
}

impl<'cfg> GitCommands<'cfg> {
    #[must_use]
    #[inline]
    pub const fn new(git_binary: &'cfg str) -> Self {
        Self { git: git_binary }
    }

    fn build(&self, args: &[&str]) -> Result<Invocation, ConfgitError> {
        Invocation::new(core::iter::once(self.git).chain(args.iter().copied()))
    }

    /// `git clone <url> --no-checkout <directory>`
    ///
    /// # Errors
    ///
    /// Returns an error if the git binary name is blank
    #[inline]
    pub fn clone_no_checkout(&self, url: &str, directory: &str) -> Result<Invocation, ConfgitError> {
        self.build(&["clone", url, "--no-checkout", directory])
    }

    /// `git sparse-checkout init`
    ///
    /// # Errors
    ///
    /// Returns an error if the git binary name is blank
    #[inline]
    pub fn sparse_checkout_init(&self) -> Result<Invocation, ConfgitError> {
        self.build(&["sparse-checkout", "init"])
    }

    /// `git add <pathspec>`
    ///
    /// # Errors
    ///
    /// Returns an error if the git binary name is blank
    #[inline]
    pub fn add(&self, pathspec: &str) -> Result<Invocation, ConfgitError> {
        self.build(&["add", pathspec])
    }

    /// `git checkout`
    ///
    /// # Errors
    ///
    /// Returns an error if the git binary name is blank
    #[inline]
    pub fn checkout(&self) -> Result<Invocation, ConfgitError> {
        self.build(&["checkout"])
    }

    /// `git commit -m <message>`
    ///
    /// # Errors
    ///
    /// Returns an error if the git binary name is blank
    #[inline]
    pub fn commit(&self, message: &str) -> Result<Invocation, ConfgitError> {
        self.build(&["commit", "-m", message])
    }

    /// `git --version`
    ///
    /// # Errors
    ///
    /// Returns an error if the git binary name is blank
    #[inline]
    pub fn version(&self) -> Result<Invocation, ConfgitError> {
        self.build(&["--version"])
    }
}

/// Check that git can be launched and is recent enough for sparse checkout
///
/// An unrecognised version string is accepted.
///
/// # Errors
///
/// Returns an error if:
/// - `working_dir` does not exist
/// - The git command cannot be started or fails
/// - The git version is older than [`MIN_GIT_VERSION`]
#[inline]
pub fn check_git_availability(
    runner: &CommandRunner<'_>,
    git_binary: &str,
    working_dir: &Path,
) -> Result<(), ConfgitError> {
    let sink = MemorySink::new();
    runner.run_with_sink(working_dir, &GitCommands::new(git_binary).version()?, &sink)?;

    let stdout = sink.stream_lines(Stream::Stdout).join("\n");
    debug!("git --version reported: {stdout}");

    // "git version 2.43.0" or "git version 2.39.3 (Apple Git-146)"
    if let Some(version_part) = stdout.split_whitespace().nth(2)
        && let Some(version) = parse_git_version(version_part)
        && version < MIN_GIT_VERSION
    {
        let (major, minor, patch) = MIN_GIT_VERSION;
        return Err(ConfgitError::configuration(format!(
            "Git version {version_part} is too old. Sparse checkout requires Git {major}.{minor}.{patch} or later"
        )));
    }

    Ok(())
}

/// Parse a git version string into (major, minor, patch)
///
/// Suffixes such as `.windows.1` or `-rc0` are ignored; a missing patch
/// number counts as zero.
#[must_use]
#[inline]
pub fn parse_git_version(version: &str) -> Option<(u32, u32, u32)> {
    let mut parts = version.split('.').map(|part| {
        let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
        digits.parse::<u32>().ok()
    });

    let major = parts.next()??;
    let minor = parts.next()??;
    let patch = parts.next().flatten().unwrap_or(0);
    Some((major, minor, patch))
}
