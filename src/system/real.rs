//! Real system implementation using `std::env`, `std::fs` and `std::process`

use super::{ProcessHandle, SpawnedProcess, System};
use crate::operations::commands::Invocation;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// Production implementation of System trait
///
/// This implementation directly delegates to the standard library. It's a
/// zero-cost abstraction that provides no overhead in production.
#[derive(Debug, Clone, Copy)]
pub struct RealSystem;

impl RealSystem {
    /// Create a new `RealSystem` instance
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for RealSystem {
    fn default() -> Self {
        Self::new()
    }
}

struct ChildHandle(Child);

impl ProcessHandle for ChildHandle {
    fn wait(&mut self) -> io::Result<i32> {
        let status = self.0.wait()?;
        Ok(status.code().unwrap_or(-1))
    }
}

impl System for RealSystem {
    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn config_dir(&self) -> Option<PathBuf> {
        dirs::config_dir()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn spawn(&self, invocation: &Invocation, working_dir: &Path) -> io::Result<SpawnedProcess> {
        let mut child = Command::new(invocation.program())
            .args(invocation.args())
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("stdout was not piped"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("stderr was not piped"))?;

        Ok(SpawnedProcess {
            stdout: Box::new(stdout),
            stderr: Box::new(stderr),
            handle: Box::new(ChildHandle(child)),
        })
    }
}
