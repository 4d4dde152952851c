//! Filesystem access used by discovery.
//!
//! Discovery only ever needs to stat and read, both of which may suspend.
//! Hosts with a virtual filesystem can provide their own [`FileSystem`].

pub mod memory;

use async_trait::async_trait;
use std::io;
use std::path::Path;

pub use memory::MemoryFileSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub kind: FileKind,
}

impl FileStat {
    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }
}

#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn stat(&self, path: &Path) -> io::Result<FileStat>;

    async fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// The local disk, through `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

#[async_trait]
impl FileSystem for TokioFileSystem {
    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let metadata = tokio::fs::metadata(path).await?;
        let kind = if metadata.is_file() {
            FileKind::File
        } else if metadata.is_dir() {
            FileKind::Directory
        } else {
            FileKind::Other
        };
        Ok(FileStat { kind })
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_tokio_fs_stat_and_read() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        std::fs::write(&file, "hello").unwrap();

        let fs = TokioFileSystem;
        let stat = fs.stat(&file).await.unwrap();
        assert!(stat.is_file());
        assert_eq!(fs.stat(temp.path()).await.unwrap().kind, FileKind::Directory);
        assert_eq!(fs.read_to_string(&file).await.unwrap(), "hello");

        let missing = fs.stat(&temp.path().join("missing")).await.unwrap_err();
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);
    }
}
