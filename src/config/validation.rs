//! Configuration validation logic

use crate::config::Config;
use crate::error::ConfgitError;
use regex::Regex;

/// Validate a resolved configuration
///
/// # Errors
///
/// Returns an error if:
/// - The remote URL is not a recognised git URL
/// - The local directory is not absolute or has no name or parent
/// - The git binary is blank
#[inline]
pub fn validate_config(config: &Config) -> Result<(), ConfgitError> {
    validate_remote_url(&config.remote_url)?;

    let local = &config.local_directory;
    if !local.is_absolute() {
        return Err(ConfgitError::configuration(format!(
            "Local directory must be an absolute path: '{}'",
            local.display()
        )));
    }
    if local.file_name().is_none() || local.parent().is_none() {
        return Err(ConfgitError::configuration(format!(
            "Local directory cannot be a filesystem root: '{}'",
            local.display()
        )));
    }

    if config.git_binary.trim().is_empty() {
        return Err(ConfgitError::configuration("Git binary cannot be empty"));
    }

    Ok(())
}

/// Validate a remote repository URL format
///
/// # Errors
///
/// Returns an error if the URL matches none of the supported formats
#[inline]
pub fn validate_remote_url(url: &str) -> Result<(), ConfgitError> {
    // Local repositories are resolved by git itself
    if url.starts_with("file:") || url.starts_with('/') {
        return Ok(());
    }

    let patterns = [
        r"^https?://[^\s/]+/\S+$",   // HTTPS: https://host/user/repo.git
        r"^ssh://[^\s/]+/\S+$",      // SSH URL: ssh://git@host/user/repo.git
        r"^[\w.-]+@[\w.-]+:\S+$",    // scp-like: git@host:user/repo.git
    ];

    for pattern in &patterns {
        let regex = Regex::new(pattern).map_err(|e| {
            ConfgitError::configuration(format!("Invalid URL pattern '{pattern}': {e}"))
        })?;
        if regex.is_match(url) {
            return Ok(());
        }
    }

    Err(ConfgitError::configuration(format!(
        "Invalid remote URL format: '{url}'\n\
        Supported formats:\n\
        - HTTPS: https://github.com/my_organization/repo.git\n\
        - SSH: git@github.com:my_organization/repo.git or ssh://git@host/repo.git\n\
        - Local: file:///path/to/repo or /path/to/repo"
    )))
}
