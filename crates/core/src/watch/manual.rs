use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::{ChangeCallback, ConfigChange, ConfigWatcher, WatchGuard};
use crate::error::Result;
use crate::types::WorkspaceFolder;

type Watches = HashMap<WorkspaceFolder, Vec<(u64, ChangeCallback)>>;

/// A watcher driven by the host: file events are pushed in with
/// [`ManualWatcher::trigger`] instead of coming from the OS.
#[derive(Clone, Default)]
pub struct ManualWatcher {
    watches: Arc<Mutex<Watches>>,
    next_id: Arc<AtomicU64>,
}

impl ManualWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a change to `folder`'s configuration. Returns how many
    /// watches received it.
    pub fn trigger(&self, folder: &WorkspaceFolder, change: ConfigChange) -> usize {
        let callbacks: Vec<ChangeCallback> = lock(&self.watches)
            .get(folder)
            .map(|watches| watches.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default();
        for callback in &callbacks {
            callback(change);
        }
        callbacks.len()
    }

    /// Number of live watches across all folders.
    pub fn watch_count(&self) -> usize {
        lock(&self.watches).values().map(Vec::len).sum()
    }
}

impl ConfigWatcher for ManualWatcher {
    fn watch(&self, folder: &WorkspaceFolder, on_change: ChangeCallback) -> Result<WatchGuard> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.watches)
            .entry(folder.clone())
            .or_default()
            .push((id, on_change));

        let watches = Arc::downgrade(&self.watches);
        let folder = folder.clone();
        Ok(WatchGuard::new(move || {
            if let Some(watches) = watches.upgrade() {
                let mut watches = lock(&watches);
                if let Some(entries) = watches.get_mut(&folder) {
                    entries.retain(|(entry_id, _)| *entry_id != id);
                    if entries.is_empty() {
                        watches.remove(&folder);
                    }
                }
            }
        }))
    }
}

fn lock(watches: &Mutex<Watches>) -> std::sync::MutexGuard<'_, Watches> {
    watches.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
