//! System abstraction for environment, filesystem and process operations
//!
//! This module provides a unified trait for all external system interactions,
//! allowing for easy testing with mock implementations.

use crate::operations::commands::Invocation;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Handle on a running child process
pub trait ProcessHandle: Send {
    /// Block until the process exits and return its exit code
    ///
    /// A process terminated by a signal reports `-1`.
    fn wait(&mut self) -> io::Result<i32>;
}

/// A freshly spawned child with both output streams piped
pub struct SpawnedProcess {
    pub stdout: Box<dyn Read + Send>,
    pub stderr: Box<dyn Read + Send>,
    pub handle: Box<dyn ProcessHandle>,
}

/// Unified trait for system operations (environment + filesystem + processes)
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::env`, `std::fs` and `std::process`
/// - `MockSystem`: Test implementation using in-memory storage and scripted processes
pub trait System: Send + Sync {
    // ==================== Environment Operations ====================

    /// Get the current working directory
    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Get the user-level configuration directory, if the platform has one
    fn config_dir(&self) -> Option<PathBuf>;

    // ==================== Filesystem Operations ====================

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    // ==================== Process Operations ====================

    /// Launch `invocation` in `working_dir` with stdin closed and
    /// stdout/stderr piped
    fn spawn(&self, invocation: &Invocation, working_dir: &Path) -> io::Result<SpawnedProcess>;
}
