use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Resolves `path` against the current directory without touching the filesystem.
pub fn absolute(path: &Path) -> Result<PathBuf, AppError> {
    Ok(std::path::absolute(path)?)
}

/// Directories to search: explicit ones win, otherwise the configured defaults.
pub fn resolve_directories(
    explicit: &[PathBuf],
    configured: &[PathBuf],
) -> Result<Vec<PathBuf>, AppError> {
    let source = if explicit.is_empty() { configured } else { explicit };
    source.iter().map(|dir| absolute(dir)).collect()
}

pub fn is_excluded(path: &Path, exclude: Option<&globset::GlobSet>) -> bool {
    exclude.is_some_and(|set| set.is_match(path))
}
