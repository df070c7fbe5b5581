//! Mock system implementation for testing

use super::{ProcessHandle, SpawnedProcess, System};
use crate::operations::commands::Invocation;
use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Scripted result of one spawn
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum MockOutcome {
    /// The process starts, writes the given text and exits with `exit_code`
    Exit {
        stdout: String,
        stderr: String,
        exit_code: i32,
    },
    /// Launching the process fails with this error kind
    SpawnError(io::ErrorKind),
}

impl MockOutcome {
    /// A silent process exiting with `exit_code`
    #[must_use]
    #[inline]
    pub const fn exit(exit_code: i32) -> Self {
        Self::Exit {
            stdout: String::new(),
            stderr: String::new(),
            exit_code,
        }
    }
}

impl Default for MockOutcome {
    #[inline]
    fn default() -> Self {
        Self::exit(0)
    }
}

/// One recorded call to [`System::spawn`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRecord {
    pub working_dir: PathBuf,
    pub invocation: Invocation,
}

/// In-memory implementation of System trait for testing
///
/// `MockSystem` provides an in-memory filesystem and a spawn spy whose
/// processes follow a script, for fast, isolated unit tests without side
/// effects. Spawns that have no scripted outcome exit silently with 0.
///
/// # Example
/// ```
/// use confgit::operations::commands::Invocation;
/// use confgit::system::{MockSystem, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_dir("/work").unwrap()
///     .with_exit_code(0, 1).unwrap();
///
/// assert!(system.exists(Path::new("/work")));
/// let invocation = Invocation::new(["git", "status"]).unwrap();
/// let mut process = system.spawn(&invocation, Path::new("/work")).unwrap();
/// assert_eq!(process.handle.wait().unwrap(), 1);
/// assert_eq!(system.spawned().unwrap().len(), 1);
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    current_dir: PathBuf,
    config_dir: Option<PathBuf>,
    files: HashMap<PathBuf, String>,
    dirs: HashSet<PathBuf>,
    outcomes: HashMap<usize, MockOutcome>,
    spawned: Vec<SpawnRecord>,
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                current_dir: PathBuf::from("/"),
                config_dir: None,
                files: HashMap::new(),
                dirs: HashSet::from([PathBuf::from("/")]),
                outcomes: HashMap::new(),
                spawned: Vec::new(),
            })),
        }
    }

    fn write_state(&self) -> io::Result<std::sync::RwLockWriteGuard<'_, MockSystemState>> {
        self.state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))
    }

    fn read_state(&self) -> io::Result<std::sync::RwLockReadGuard<'_, MockSystemState>> {
        self.state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))
    }

    /// Set the current working directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_current_dir<P: AsRef<Path>>(self, dir: P) -> io::Result<Self> {
        let mut state = self.write_state()?;
        state.current_dir = dir.as_ref().to_path_buf();
        drop(state);
        Ok(self)
    }

    /// Set the user-level configuration directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_config_dir<P: AsRef<Path>>(self, dir: P) -> io::Result<Self> {
        let mut state = self.write_state()?;
        state.config_dir = Some(dir.as_ref().to_path_buf());
        drop(state);
        Ok(self)
    }

    /// Add a file with contents (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &str) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self.write_state()?;
        if let Some(parent) = path_buf.parent() {
            Self::ensure_parent_dirs(&mut state.dirs, parent);
        }
        state.files.insert(path_buf, contents.to_owned());
        drop(state);
        Ok(self)
    }

    /// Add a directory and its ancestors (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_dir<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        let mut state = self.write_state()?;
        Self::ensure_parent_dirs(&mut state.dirs, path.as_ref());
        drop(state);
        Ok(self)
    }

    /// Script the outcome of the `index`-th spawn, counting from zero
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_outcome(self, index: usize, outcome: MockOutcome) -> io::Result<Self> {
        let mut state = self.write_state()?;
        state.outcomes.insert(index, outcome);
        drop(state);
        Ok(self)
    }

    /// Make the `index`-th spawn exit silently with `exit_code`
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_exit_code(self, index: usize, exit_code: i32) -> io::Result<Self> {
        self.with_outcome(index, MockOutcome::exit(exit_code))
    }

    /// Make the `index`-th spawn print `stdout`/`stderr` and exit with 0
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn with_output(self, index: usize, stdout: &str, stderr: &str) -> io::Result<Self> {
        self.with_outcome(
            index,
            MockOutcome::Exit {
                stdout: stdout.to_owned(),
                stderr: stderr.to_owned(),
                exit_code: 0,
            },
        )
    }

    /// Every spawn attempt so far, in call order
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn spawned(&self) -> io::Result<Vec<SpawnRecord>> {
        Ok(self.read_state()?.spawned.clone())
    }

    /// Argument lists (program excluded) of every spawn attempt so far
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    #[inline]
    pub fn spawned_args(&self) -> io::Result<Vec<Vec<String>>> {
        Ok(self
            .read_state()?
            .spawned
            .iter()
            .map(|record| record.invocation.args().to_vec())
            .collect())
    }

    fn ensure_parent_dirs(dirs: &mut HashSet<PathBuf>, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

struct MockProcess {
    exit_code: i32,
}

impl ProcessHandle for MockProcess {
    fn wait(&mut self) -> io::Result<i32> {
        Ok(self.exit_code)
    }
}

impl System for MockSystem {
    #[inline]
    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.read_state()?.current_dir.clone())
    }

    #[inline]
    fn config_dir(&self) -> Option<PathBuf> {
        self.read_state().ok()?.config_dir.clone()
    }

    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.read_state()?.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })
    }

    #[inline]
    fn exists(&self, path: &Path) -> bool {
        self.read_state()
            .is_ok_and(|state| state.files.contains_key(path) || state.dirs.contains(path))
    }

    #[inline]
    fn spawn(&self, invocation: &Invocation, working_dir: &Path) -> io::Result<SpawnedProcess> {
        let mut state = self.write_state()?;
        let index = state.spawned.len();
        state.spawned.push(SpawnRecord {
            working_dir: working_dir.to_path_buf(),
            invocation: invocation.clone(),
        });
        let outcome = state.outcomes.get(&index).cloned().unwrap_or_default();
        drop(state);

        match outcome {
            MockOutcome::Exit {
                stdout,
                stderr,
                exit_code,
            } => Ok(SpawnedProcess {
                stdout: Box::new(Cursor::new(stdout.into_bytes())),
                stderr: Box::new(Cursor::new(stderr.into_bytes())),
                handle: Box::new(MockProcess { exit_code }),
            }),
            MockOutcome::SpawnError(kind) => Err(io::Error::new(
                kind,
                format!("mock spawn failure for `{invocation}`"),
            )),
        }
    }
}
