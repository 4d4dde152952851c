use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::ffi::OsStr;

use super::{ChangeCallback, ConfigChange, ConfigWatcher, WatchGuard};
use crate::config::CONFIG_FILE_NAME;
use crate::error::Result;
use crate::types::WorkspaceFolder;

/// Watches the real filesystem with `notify`.
///
/// The folder itself is watched (non-recursively) so that creating a
/// configuration that did not exist yet is also seen.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifyWatcher;

impl NotifyWatcher {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigWatcher for NotifyWatcher {
    fn watch(&self, folder: &WorkspaceFolder, on_change: ChangeCallback) -> Result<WatchGuard> {
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Some(change) = config_change(&event) {
                    on_change(change);
                }
            }
            Err(e) => tracing::warn!("Watch error: {}", e),
        })?;
        watcher.watch(folder.path(), RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching {:?} for configuration changes", folder.path());

        let path = folder.path().to_path_buf();
        Ok(WatchGuard::new(move || {
            tracing::debug!("Releasing watch on {:?}", path);
            drop(watcher);
        }))
    }
}

fn config_change(event: &Event) -> Option<ConfigChange> {
    let touches_config = event
        .paths
        .iter()
        .any(|path| path.file_name() == Some(OsStr::new(CONFIG_FILE_NAME)));
    if !touches_config {
        return None;
    }
    match event.kind {
        EventKind::Create(_) => Some(ConfigChange::Created),
        EventKind::Modify(_) => Some(ConfigChange::Modified),
        EventKind::Remove(_) => Some(ConfigChange::Deleted),
        _ => None,
    }
}
