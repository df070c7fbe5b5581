//! YAML configuration loading and parsing

use crate::config::PartialConfig;
use crate::system::System;
use anyhow::{Context as _, Result};
use serde_json::Value;
use std::path::Path;

/// Load and parse a YAML configuration file
pub fn load_config(system: &dyn System, path: &Path) -> Result<PartialConfig> {
    let content = system
        .read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

    parse_config(&content)
        .with_context(|| format!("Invalid configuration file: {}", path.display()))
}

/// Parse YAML configuration text
///
/// An empty document is treated as an empty configuration.
pub fn parse_config(content: &str) -> Result<PartialConfig> {
    if content.trim().is_empty() {
        return Ok(PartialConfig::default());
    }

    let value: Value = serde_yaml::from_str(content).context(
        "Failed to parse YAML configuration. Please check the syntax and structure of the file",
    )?;

    if value.is_null() {
        return Ok(PartialConfig::default());
    }

    crate::config::schema::validate_against_schema(&value)?;

    serde_json::from_value(value).context("Failed to read configuration values")
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "These are unit tests")]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parses_all_fields() {
        let config = parse_config(
            "remote_url: git@example.git.host:user/repository.git\nlocal_directory: ./clone\ngit_binary: /usr/bin/git\n",
        )
        .unwrap();

        assert_eq!(
            config.remote_url.as_deref(),
            Some("git@example.git.host:user/repository.git")
        );
        assert_eq!(config.local_directory, Some(PathBuf::from("./clone")));
        assert_eq!(config.git_binary.as_deref(), Some("/usr/bin/git"));
    }

    #[test]
    fn empty_document_is_empty_config() {
        assert_eq!(parse_config("").unwrap(), PartialConfig::default());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = parse_config("repository: foo\n").unwrap_err();
        assert!(format!("{err:#}").contains("Configuration validation failed"));
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        assert!(parse_config("remote_url: [unclosed").is_err());
    }
}
