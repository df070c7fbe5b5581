//! Configuration management module
//!
//! Handles YAML configuration parsing, JSON schema validation, and merging
//! command-line overrides over file values

pub mod schema;
pub mod validation;
pub mod yaml;

use crate::error::ConfgitError;
use crate::system::System;
use crate::utils::path::normalize_path;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the current directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "confgit.yaml";

/// Directory under the user's config directory holding the fallback config
pub const USER_CONFIG_DIR: &str = "confgit";

/// File name of the fallback config inside [`USER_CONFIG_DIR`]
pub const USER_CONFIG_FILE: &str = "config.yaml";

/// Clone directory name used when no local directory is configured
pub const DEFAULT_LOCAL_DIRECTORY: &str = "repositoryFolder";

/// Git executable used when none is configured
pub const DEFAULT_GIT_BINARY: &str = "git";

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// URL handed to `git clone`
    pub remote_url: String,

    /// Absolute path of the clone
    pub local_directory: PathBuf,

    /// Git executable to run
    pub git_binary: String,
}

/// Configuration values from one source; unset fields fall through to the
/// next source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_directory: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_binary: Option<String>,
}

impl PartialConfig {
    /// Fill the unset fields of `self` from `fallback`
    #[must_use]
    #[inline]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            remote_url: self.remote_url.or(fallback.remote_url),
            local_directory: self.local_directory.or(fallback.local_directory),
            git_binary: self.git_binary.or(fallback.git_binary),
        }
    }
}

impl Config {
    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or fails the schema
    #[inline]
    pub fn load_from_file(system: &dyn System, path: &Path) -> Result<PartialConfig> {
        yaml::load_config(system, path)
    }

    /// Resolve the configuration from overrides, a config file and defaults
    ///
    /// `overrides` (command line and environment) win over the file. With
    /// `config_path` unset, `./confgit.yaml` is used if present, then
    /// `<user config dir>/confgit/config.yaml`, and no file otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An explicitly requested config file does not exist
    /// - A config file cannot be loaded
    /// - No remote URL is configured
    /// - The merged configuration is invalid
    #[inline]
    pub fn resolve(
        system: &dyn System,
        config_path: Option<&Path>,
        overrides: PartialConfig,
    ) -> Result<Self> {
        let current_dir = system
            .current_dir()
            .context("Failed to determine the current directory")?;

        let file = match config_path {
            Some(path) => {
                if !system.exists(path) {
                    return Err(ConfgitError::configuration(format!(
                        "Configuration file not found: {}",
                        path.display()
                    ))
                    .into());
                }
                Some(path.to_path_buf())
            }
            None => find_default_config(system, &current_dir),
        };

        let from_file = match file {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::load_from_file(system, &path)?
            }
            None => PartialConfig::default(),
        };

        let merged = overrides.or(from_file);
        let config = Self::from_partial(merged, &current_dir)?;
        config.validate()?;
        debug!("Resolved configuration: {config:?}");
        Ok(config)
    }

    /// Apply defaults to a merged partial configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no remote URL is set
    #[inline]
    pub fn from_partial(partial: PartialConfig, current_dir: &Path) -> Result<Self, ConfgitError> {
        let remote_url = partial.remote_url.ok_or_else(|| {
            ConfgitError::configuration(
                "No remote URL configured. Set remote_url in confgit.yaml, pass --remote-url or set CONFGIT_REMOTE_URL",
            )
        })?;

        let local_directory = partial
            .local_directory
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_DIRECTORY));
        let local_directory = normalize_path(&current_dir.join(local_directory));

        Ok(Self {
            remote_url,
            local_directory,
            git_binary: partial
                .git_binary
                .unwrap_or_else(|| DEFAULT_GIT_BINARY.to_owned()),
        })
    }

    /// Validate the resolved configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any field is unusable
    #[inline]
    pub fn validate(&self) -> Result<(), ConfgitError> {
        validation::validate_config(self)
    }
}

fn find_default_config(system: &dyn System, current_dir: &Path) -> Option<PathBuf> {
    let local = current_dir.join(DEFAULT_CONFIG_FILE);
    if system.exists(&local) {
        return Some(local);
    }

    let user = system
        .config_dir()?
        .join(USER_CONFIG_DIR)
        .join(USER_CONFIG_FILE);
    system.exists(&user).then_some(user)
}
