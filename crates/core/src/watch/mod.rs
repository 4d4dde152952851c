//! Change notifications for `.yourbase.yml`.

pub mod manual;
pub mod notify_watcher;

use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::types::WorkspaceFolder;

pub use manual::ManualWatcher;
pub use notify_watcher::NotifyWatcher;

/// What happened to a folder's configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    Created,
    Modified,
    Deleted,
}

pub type ChangeCallback = Arc<dyn Fn(ConfigChange) + Send + Sync>;

/// Delivers changes to `<folder>/.yourbase.yml`.
pub trait ConfigWatcher: Send + Sync {
    /// Start watching. `on_change` is called until the guard is dropped.
    fn watch(&self, folder: &WorkspaceFolder, on_change: ChangeCallback) -> Result<WatchGuard>;
}

/// Keeps a watch alive. Dropping it releases the watch.
pub struct WatchGuard {
    release: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl WatchGuard {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Mutex::new(Some(Box::new(release))),
        }
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        let release = self
            .release
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(release) = release {
            release();
        }
    }
}

impl std::fmt::Debug for WatchGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchGuard").finish_non_exhaustive()
    }
}
