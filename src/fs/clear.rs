//! Removal of a previous generation's output.

use crate::error::{KitError, Result};
use globset::{Glob, GlobMatcher};
use std::fs;
use std::path::{Path, PathBuf};

/// Remove every regular file directly inside `dir` whose name matches `*.<extension>`.
///
/// Subdirectories, dotfiles left by interrupted atomic writes, and files with
/// other extensions are left alone. A missing directory is not an error.
///
/// Returns the removed paths in sorted order.
pub fn clear_generated(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let matcher = extension_matcher(extension)?;

    let entries = fs::read_dir(dir).map_err(|e| {
        KitError::UserError(format!(
            "failed to read directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut targets = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            KitError::UserError(format!(
                "failed to read entry in '{}': {}",
                dir.display(),
                e
            ))
        })?;

        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if is_file && !name.starts_with('.') && matcher.is_match(name.as_ref()) {
            targets.push(entry.path());
        }
    }
    targets.sort();

    for path in &targets {
        fs::remove_file(path).map_err(|e| {
            KitError::UserError(format!(
                "failed to remove stale file '{}': {}",
                path.display(),
                e
            ))
        })?;
    }

    Ok(targets)
}

fn extension_matcher(extension: &str) -> Result<GlobMatcher> {
    let pattern = format!("*.{}", extension.trim_start_matches('.'));
    Glob::new(&pattern)
        .map(|g| g.compile_matcher())
        .map_err(|e| KitError::UserError(format!("invalid extension '{}': {}", extension, e)))
}
