use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::fs::FileSystem;
use crate::types::WorkspaceFolder;

/// File name of the YourBase build configuration.
pub const CONFIG_FILE_NAME: &str = ".yourbase.yml";

/// Finds the `.yourbase.yml` that governs a file or folder.
#[derive(Clone)]
pub struct ConfigLocator {
    fs: Arc<dyn FileSystem>,
}

impl ConfigLocator {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Find the closest configuration at or above `start`.
    ///
    /// `start` may be a file or a folder. Any failure to stat a candidate
    /// counts as "not here", as does anything that is not a regular file.
    /// Returns `None` once the walk reaches the root.
    pub async fn find(&self, start: &Path) -> Option<PathBuf> {
        let mut current = normalize(start);

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            match self.fs.stat(&candidate).await {
                Ok(stat) if stat.is_file() => {
                    tracing::debug!("Found build configuration at {:?}", candidate);
                    return Some(candidate);
                }
                Ok(stat) => {
                    tracing::trace!("Skipping {:?}: not a file ({:?})", candidate, stat.kind);
                }
                Err(e) => {
                    tracing::trace!("No build configuration at {:?}: {}", candidate, e);
                }
            }

            let parent = parent_of(&current);
            if parent.as_os_str() == current.as_os_str() {
                tracing::debug!("Reached filesystem root looking for config from {:?}", start);
                return None;
            }
            current = parent;
        }
    }

    /// Configuration directly at the folder root, without walking upward.
    pub async fn find_in(&self, folder: &WorkspaceFolder) -> Option<PathBuf> {
        let candidate = folder.config_path();
        match self.fs.stat(&candidate).await {
            Ok(stat) if stat.is_file() => Some(candidate),
            _ => None,
        }
    }
}

/// Parent of `path`, or `path` itself once there is nowhere left to go.
fn parent_of(path: &Path) -> PathBuf {
    path.parent().unwrap_or(path).to_path_buf()
}

/// Lexically resolve `.` and `..` so that walking up never revisits a folder.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Return the final component of a path, or the whole path if it has none.
pub fn slash_path_base(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    fn locator(fs: MemoryFileSystem) -> ConfigLocator {
        ConfigLocator::new(Arc::new(fs))
    }

    #[tokio::test]
    async fn test_find_walks_up_to_nearest_config() {
        let fs = MemoryFileSystem::new().with_file("/a/b/.yourbase.yml", "build_targets: []");
        let found = locator(fs).find(Path::new("/a/b/c/d")).await;
        assert_eq!(found, Some(PathBuf::from("/a/b/.yourbase.yml")));
    }

    #[tokio::test]
    async fn test_find_prefers_closest_config() {
        let fs = MemoryFileSystem::new()
            .with_file("/a/.yourbase.yml", "")
            .with_file("/a/b/c/.yourbase.yml", "");
        let found = locator(fs).find(Path::new("/a/b/c/d/file.rs")).await;
        assert_eq!(found, Some(PathBuf::from("/a/b/c/.yourbase.yml")));
    }

    #[tokio::test]
    async fn test_find_terminates_without_config() {
        let fs = MemoryFileSystem::new().with_file("/x/y/other.yml", "");
        assert_eq!(locator(fs).find(Path::new("/x/y/z")).await, None);
    }

    #[tokio::test]
    async fn test_find_terminates_for_relative_paths() {
        let fs = MemoryFileSystem::new();
        assert_eq!(locator(fs).find(Path::new("some/relative/dir")).await, None);
    }

    #[tokio::test]
    async fn test_find_treats_stat_failure_as_absent() {
        let fs = MemoryFileSystem::new()
            .with_file("/a/.yourbase.yml", "")
            .with_file("/a/b/.yourbase.yml", "");
        fs.deny("/a/b/.yourbase.yml");
        let found = locator(fs).find(Path::new("/a/b")).await;
        assert_eq!(found, Some(PathBuf::from("/a/.yourbase.yml")));
    }

    #[tokio::test]
    async fn test_find_skips_directory_named_like_config() {
        let fs = MemoryFileSystem::new()
            .with_file("/a/.yourbase.yml", "")
            .with_file("/a/b/.yourbase.yml/notes.txt", "");
        let locator = locator(fs);
        assert_eq!(
            locator.find(Path::new("/a/b/c")).await,
            Some(PathBuf::from("/a/.yourbase.yml"))
        );
        assert_eq!(locator.find_in(&WorkspaceFolder::new("/a/b")).await, None);
    }

    #[tokio::test]
    async fn test_find_resolves_parent_components() {
        let fs = MemoryFileSystem::new().with_file("/a/.yourbase.yml", "");
        let found = locator(fs).find(Path::new("/a/b/../c/./d")).await;
        assert_eq!(found, Some(PathBuf::from("/a/.yourbase.yml")));
    }

    #[tokio::test]
    async fn test_find_in_does_not_walk_up() {
        let fs = MemoryFileSystem::new().with_file("/a/.yourbase.yml", "");
        let locator = locator(fs);
        assert_eq!(locator.find_in(&WorkspaceFolder::new("/a/b")).await, None);
        assert_eq!(
            locator.find_in(&WorkspaceFolder::new("/a")).await,
            Some(PathBuf::from("/a/.yourbase.yml"))
        );
    }

    #[test]
    fn test_slash_path_base() {
        assert_eq!(slash_path_base(Path::new("/home/dev/proj")), "proj");
        assert_eq!(slash_path_base(Path::new("file.txt")), "file.txt");
        assert_eq!(slash_path_base(Path::new("/")), "/");
    }
}
