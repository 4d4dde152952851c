use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Resolve `path` against the current directory without touching the
/// filesystem.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(cwd.join(path))
}
