//! Custom error types with exit codes

use crate::operations::drain::Stream;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for confgit operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfgitError {
    /// Configuration Error - missing or invalid configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The working directory of an invocation does not exist
    #[error("can't run command in non-existing directory '{}'", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// The external program could not be started
    #[error("Failed to spawn '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The external program exited with a non-zero status
    #[error("Command `{command}` returned {exit_code}")]
    CommandFailed { command: String, exit_code: i32 },

    /// A sparse pattern or pathspec was rejected before running anything
    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    /// Reading one of the child's output streams failed. Never returned by
    /// the runner, only logged.
    #[error("Failed to drain {stream} stream: {source}")]
    DrainIo {
        stream: Stream,
        #[source]
        source: io::Error,
    },
}

impl ConfgitError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Configuration { .. } => 1,
            Self::DirectoryNotFound { .. } => 2,
            Self::SpawnFailed { .. } => 3,
            Self::CommandFailed { .. } => 4,
            Self::InvalidPath { .. } => 5,
            // Only ever logged by the drain threads, so no process exits with 6
            Self::DrainIo { .. } => 6,
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid path error
    #[inline]
    pub fn invalid_path<S: Into<String>>(message: S) -> Self {
        Self::InvalidPath {
            message: message.into(),
        }
    }

    /// Exit status reported by the external tool, if this is a command failure
    #[must_use]
    #[inline]
    pub const fn command_exit_code(&self) -> Option<i32> {
        match *self {
            Self::CommandFailed { exit_code, .. } => Some(exit_code),
            _ => None,
        }
    }
}
