//! Command execution with proper working directory context

use crate::error::ConfgitError;
use crate::operations::drain::{LineSink, Stream, TracingSink, drain_lines};
use crate::system::System;
use core::fmt;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, warn};

/// A program name followed by its arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Invocation {
    argv: Vec<String>,
}

impl Invocation {
    /// Build an invocation from a program name and its arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or the program name is blank
    #[inline]
    pub fn new<I, S>(argv: I) -> Result<Self, ConfgitError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        match argv.first() {
            None => Err(ConfgitError::configuration("Command line cannot be empty")),
            Some(program) if program.trim().is_empty() => Err(ConfgitError::configuration(
                "Command line must start with a program name",
            )),
            Some(_) => Ok(Self { argv }),
        }
    }

    /// The executable to launch
    #[must_use]
    #[inline]
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Arguments following the program name
    #[must_use]
    #[inline]
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    /// Program and arguments together
    #[must_use]
    #[inline]
    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, arg) in self.argv.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&shell_escape(arg))?;
        }
        Ok(())
    }
}

/// Quote an argument for display so the printed line can be pasted into a shell
fn shell_escape(s: &str) -> String {
    if !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.' | ':' | '@' | '=' | '+')
        })
    {
        return s.to_owned();
    }

    let mut result = String::from('"');
    for ch in s.chars() {
        match ch {
            '"' => result.push_str(r#"\""#),
            '\\' => result.push_str(r"\\"),
            '$' => result.push_str(r"\$"),
            '`' => result.push_str(r"\`"),
            _ => result.push(ch),
        }
    }
    result.push('"');
    result
}

/// One planned command: what to run and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub working_dir: PathBuf,
    pub invocation: Invocation,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}$ {}", self.working_dir.display(), self.invocation)
    }
}

/// Runs external commands as child processes and streams their output
pub struct CommandRunner<'src> {
    system: &'src dyn System,
    sink: &'src dyn LineSink,
}

impl<'src> CommandRunner<'src> {
    /// Create a runner that logs output lines through `tracing`
    #[must_use]
    #[inline]
    pub fn new(system: &'src dyn System) -> Self {
        Self {
            system,
            sink: &TracingSink,
        }
    }

    /// Create a runner that forwards output lines to `sink`
    #[must_use]
    #[inline]
    pub fn with_sink(system: &'src dyn System, sink: &'src dyn LineSink) -> Self {
        Self { system, sink }
    }

    /// Run `invocation` in `working_dir` and wait for it to finish
    ///
    /// Both output streams are drained concurrently to the runner's sink;
    /// this returns only once the process has exited and both streams have
    /// reached end-of-file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `working_dir` does not exist (nothing is spawned)
    /// - The process cannot be started or waited on
    /// - The process exits with a non-zero status
    #[inline]
    pub fn run(&self, working_dir: &Path, invocation: &Invocation) -> Result<i32, ConfgitError> {
        self.run_with_sink(working_dir, invocation, self.sink)
    }

    /// Run a planned step
    ///
    /// # Errors
    ///
    /// Same as [`CommandRunner::run`]
    #[inline]
    pub fn run_step(&self, step: &Step) -> Result<i32, ConfgitError> {
        self.run(&step.working_dir, &step.invocation)
    }

    /// Like [`CommandRunner::run`], but output goes to `sink` for this call only
    ///
    /// # Errors
    ///
    /// Same as [`CommandRunner::run`]
    #[inline]
    pub fn run_with_sink(
        &self,
        working_dir: &Path,
        invocation: &Invocation,
        sink: &dyn LineSink,
    ) -> Result<i32, ConfgitError> {
        if !self.system.exists(working_dir) {
            return Err(ConfgitError::DirectoryNotFound {
                path: working_dir.to_path_buf(),
            });
        }

        debug!("Running `{invocation}` in {}", working_dir.display());

        let spawned = self
            .system
            .spawn(invocation, working_dir)
            .map_err(|source| ConfgitError::SpawnFailed {
                program: invocation.program().to_owned(),
                source,
            })?;

        let stdout = spawned.stdout;
        let stderr = spawned.stderr;
        let mut handle = spawned.handle;

        // Both drains are joined before the scope ends, so no output written
        // before the streams close is lost
        let exit = thread::scope(|scope| {
            let stdout_drain = scope.spawn(move || drain_lines(stdout, Stream::Stdout, sink));
            let stderr_drain = scope.spawn(move || drain_lines(stderr, Stream::Stderr, sink));
            let exit = handle.wait();
            let lines = [(Stream::Stdout, stdout_drain), (Stream::Stderr, stderr_drain)]
                .into_iter()
                .map(|(stream, drain)| {
                    drain.join().unwrap_or_else(|_| {
                        warn!("{stream} drain thread panicked; remaining lines were dropped");
                        0
                    })
                })
                .sum::<usize>();
            debug!("Drained {lines} output lines");
            exit
        });

        let exit_code = exit.map_err(|source| ConfgitError::SpawnFailed {
            program: invocation.program().to_owned(),
            source,
        })?;

        debug!("`{invocation}` exited with {exit_code}");

        if exit_code != 0 {
            return Err(ConfgitError::CommandFailed {
                command: invocation.to_string(),
                exit_code,
            });
        }

        Ok(exit_code)
    }
}
