use crate::config::PartialConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for confgit
#[derive(Parser, Debug, Clone)]
#[command(name = "confgit")]
#[command(
    about = "A CLI tool for sparse-checking-out and committing files in a configuration Git repository"
)]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Configuration file path [default: ./confgit.yaml, then the user config directory]
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// URL of the configuration repository
    #[arg(long, value_name = "URL", env = "CONFGIT_REMOTE_URL", global = true)]
    pub remote_url: Option<String>,

    /// Directory to clone into [default: ./repositoryFolder]
    #[arg(long, value_name = "PATH", env = "CONFGIT_LOCAL_DIR", global = true)]
    pub local_dir: Option<PathBuf>,

    /// Git executable to run [default: git]
    #[arg(long, value_name = "BIN", global = true)]
    pub git_binary: Option<String>,

    /// Print the git commands without running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub action: Action,
}

/// Workflow to run against the configuration repository
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Clone without checkout and materialize only PATH
    Checkout {
        /// Directory or file inside the repository, relative to its root.
        /// Anchored patterns with a leading `/` are rejected
        path: String,
    },

    /// Clone without checkout, stage FILE and commit it locally
    PushFile {
        /// File inside the repository
        file: String,
    },
}

impl Args {
    /// Configuration values given on the command line or through the environment
    #[must_use]
    pub fn overrides(&self) -> PartialConfig {
        PartialConfig {
            remote_url: self.remote_url.clone(),
            local_directory: self.local_dir.clone(),
            git_binary: self.git_binary.clone(),
        }
    }
}
