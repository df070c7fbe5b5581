//! Path manipulation and validation utilities

use crate::error::ConfgitError;
use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` components
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                // Keep leading '..' components
                None | Some(Component::ParentDir) => components.push(component),
                // '..' at the root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(_) => {
                    components.pop();
                }
            },
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

/// Convert backslashes to forward slashes
#[must_use]
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Check a user-supplied path inside the repository and hand it back for git
///
/// Backslashes become `/`; nothing else is rewritten, so surrounding
/// whitespace, `.` segments and `..` segments reach git as typed. `..` is only
/// resolved to check that the path stays inside the repository.
///
/// # Errors
///
/// Returns an error if:
/// - The path is empty or resolves to the repository root
/// - The path is absolute
/// - The path escapes the repository through `..`
pub fn repository_path(raw: &str) -> Result<String, ConfgitError> {
    let unified = normalize_separators(raw);

    if unified.trim().is_empty() {
        return Err(ConfgitError::invalid_path("Path cannot be empty"));
    }

    if unified.starts_with('/') || has_drive_prefix(&unified) {
        return Err(ConfgitError::invalid_path(format!(
            "Absolute paths are not allowed: '{raw}'. Use a path relative to the repository root instead."
        )));
    }

    let mut depth = 0_usize;
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if depth == 0 {
                    return Err(ConfgitError::invalid_path(format!(
                        "Path contains unsafe directory traversal: '{raw}'"
                    )));
                }
                depth -= 1;
            }
            _ => depth += 1,
        }
    }

    if depth == 0 {
        return Err(ConfgitError::invalid_path(format!(
            "Path '{raw}' points at the repository root"
        )));
    }

    Ok(unified)
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
