//! In-memory filesystem with call accounting.
//!
//! Used by tests and by hosts that keep documents in memory. Reads can be
//! held behind a gate to observe work that is still in flight.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

use super::{FileKind, FileStat, FileSystem};

#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, String>>,
    denied: Mutex<BTreeSet<PathBuf>>,
    gate: Mutex<Option<std::sync::Arc<Semaphore>>>,
    stats: AtomicUsize,
    reads: AtomicUsize,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.write(path, contents);
        self
    }

    pub fn write(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        lock(&self.files).insert(path.into(), contents.into());
    }

    pub fn remove(&self, path: &Path) {
        lock(&self.files).remove(path);
    }

    /// Make every access to `path` fail with `PermissionDenied`.
    pub fn deny(&self, path: impl Into<PathBuf>) {
        lock(&self.denied).insert(path.into());
    }

    /// Block reads until [`MemoryFileSystem::release`] is called.
    pub fn hold(&self) {
        *lock(&self.gate) = Some(std::sync::Arc::new(Semaphore::new(0)));
    }

    /// Let held and future reads through.
    pub fn release(&self) {
        if let Some(gate) = lock(&self.gate).take() {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    pub fn stat_count(&self) -> usize {
        self.stats.load(Ordering::SeqCst)
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn check_access(&self, path: &Path) -> io::Result<()> {
        if lock(&self.denied).contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("access denied: {}", path.display()),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        self.stats.fetch_add(1, Ordering::SeqCst);
        self.check_access(path)?;

        let files = lock(&self.files);
        if files.contains_key(path) {
            return Ok(FileStat { kind: FileKind::File });
        }
        if files.keys().any(|file| file.starts_with(path)) {
            return Ok(FileStat { kind: FileKind::Directory });
        }
        Err(not_found(path))
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let gate = lock(&self.gate).clone();
        if let Some(gate) = gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| io::Error::other(e.to_string()))?;
        }
        self.check_access(path)?;
        lock(&self.files)
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file: {}", path.display()),
    )
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
