//! Host settings for the `yourbase` section.
//!
//! Settings are stored the way editors keep them on disk: a flat JSON object
//! with dotted keys (`"yourbase.remoteBuild": true`). A global settings file
//! can be refined per workspace folder by `<folder>/.vscode/settings.json`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};

use crate::error::{Error, Result};
use crate::types::WorkspaceFolder;

/// Settings section owned by this crate.
pub const SETTINGS_SECTION: &str = "yourbase";

/// Location of folder-scoped settings relative to the folder root.
pub const FOLDER_SETTINGS_PATH: &str = ".vscode/settings.json";

/// The `yourbase.*` keys of one settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSettings {
    #[serde(
        rename = "yourbase.remoteBuild",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub remote_build: Option<bool>,

    #[serde(
        rename = "yourbase.useWSL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub use_wsl: Option<bool>,
}

impl SectionSettings {
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents)
            .map_err(|e| Error::SettingsError(format!("Failed to parse settings: {e}")))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents).map_err(|e| match e {
            Error::SettingsError(reason) => {
                Error::SettingsError(format!("{}: {reason}", path.display()))
            }
            other => other,
        })
    }
}

/// Which platform the build tool runs on. Only Windows needs the shim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    pub fn requires_compat_shim(self) -> bool {
        matches!(self, Platform::Windows)
    }
}

/// Everything about the environment that changes how a target is invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EnvironmentFlags {
    pub remote: bool,
    pub use_compat_shim: bool,
}

/// Global settings plus per-folder refinements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub global: SectionSettings,
    pub folders: BTreeMap<WorkspaceFolder, SectionSettings>,
}

impl Settings {
    pub fn new(global: SectionSettings) -> Self {
        Self {
            global,
            folders: BTreeMap::new(),
        }
    }

    pub fn with_folder(mut self, folder: WorkspaceFolder, settings: SectionSettings) -> Self {
        self.folders.insert(folder, settings);
        self
    }

    /// Read `<folder>/.vscode/settings.json` if present.
    pub fn load_folder(&mut self, folder: &WorkspaceFolder) -> Result<()> {
        let path = folder_settings_path(folder);
        if !path.exists() {
            self.folders.remove(folder);
            return Ok(());
        }
        tracing::debug!("Loading folder settings from {:?}", path);
        let settings = SectionSettings::load_from_file(&path)?;
        self.folders.insert(folder.clone(), settings);
        Ok(())
    }

    /// `yourbase.remoteBuild` as seen from `folder`.
    pub fn remote_build(&self, folder: &WorkspaceFolder) -> bool {
        self.folders
            .get(folder)
            .and_then(|s| s.remote_build)
            .or(self.global.remote_build)
            .unwrap_or(false)
    }

    /// `yourbase.useWSL`. Global only.
    pub fn use_wsl(&self) -> bool {
        self.global.use_wsl.unwrap_or(false)
    }

    pub fn flags_for(&self, folder: &WorkspaceFolder, platform: Platform) -> EnvironmentFlags {
        EnvironmentFlags {
            remote: self.remote_build(folder),
            use_compat_shim: platform.requires_compat_shim() && self.use_wsl(),
        }
    }

    /// Whether moving from `self` to `next` touches the `yourbase` section
    /// as visible from `folder`.
    pub fn affects(&self, next: &Settings, folder: &WorkspaceFolder) -> bool {
        self.global != next.global || self.folders.get(folder) != next.folders.get(folder)
    }
}

/// Where the per-folder settings of `folder` live.
pub fn folder_settings_path(folder: &WorkspaceFolder) -> PathBuf {
    folder.path().join(FOLDER_SETTINGS_PATH)
}

type SettingsListener = Arc<dyn Fn(&Settings, &Settings) + Send + Sync>;

struct StoreInner {
    current: RwLock<Settings>,
    listeners: Mutex<Vec<(u64, SettingsListener)>>,
    next_id: AtomicU64,
}

/// Shared, observable settings.
///
/// Cloning the store gives another handle to the same settings.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<StoreInner>,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl SettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                current: RwLock::new(settings),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn current(&self) -> Settings {
        self.inner
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn flags_for(&self, folder: &WorkspaceFolder, platform: Platform) -> EnvironmentFlags {
        self.inner
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .flags_for(folder, platform)
    }

    /// Replace the settings and tell every listener what changed.
    pub fn update(&self, next: Settings) {
        let previous = {
            let mut current = self
                .inner
                .current
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            std::mem::replace(&mut *current, next.clone())
        };
        if previous == next {
            return;
        }

        let listeners: Vec<SettingsListener> = self
            .listeners()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        tracing::debug!("Settings changed, notifying {} listeners", listeners.len());
        for listener in listeners {
            listener(&previous, &next);
        }
    }

    /// Call `listener(previous, next)` after every change until the returned
    /// subscription is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Settings, &Settings) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners().push((id, Arc::new(listener)));
        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners().len()
    }

    fn listeners(&self) -> std::sync::MutexGuard<'_, Vec<(u64, SettingsListener)>> {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Keeps a settings listener registered. Unsubscribes on drop.
pub struct Subscription {
    id: u64,
    store: Weak<StoreInner>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store
                .listeners
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tempfile::TempDir;

    fn remote(value: bool) -> SectionSettings {
        SectionSettings {
            remote_build: Some(value),
            use_wsl: None,
        }
    }

    #[test]
    fn test_parse_flat_settings() {
        let settings = SectionSettings::from_json(
            r#"{"editor.tabSize": 4, "yourbase.remoteBuild": true, "yourbase.useWSL": false}"#,
        )
        .unwrap();
        assert_eq!(settings.remote_build, Some(true));
        assert_eq!(settings.use_wsl, Some(false));

        assert_eq!(SectionSettings::from_json("{}").unwrap(), SectionSettings::default());
        assert!(SectionSettings::from_json(r#"{"yourbase.remoteBuild": "yes"}"#).is_err());
    }

    #[test]
    fn test_folder_settings_override_global() {
        let a = WorkspaceFolder::new("/a");
        let b = WorkspaceFolder::new("/b");
        let settings = Settings::new(remote(true)).with_folder(a.clone(), remote(false));
        assert!(!settings.remote_build(&a));
        assert!(settings.remote_build(&b));
        assert!(!Settings::default().remote_build(&a));
    }

    #[test]
    fn test_compat_shim_only_on_windows() {
        let folder = WorkspaceFolder::new("/w");
        let settings = Settings::new(SectionSettings {
            remote_build: None,
            use_wsl: Some(true),
        });
        assert!(settings.flags_for(&folder, Platform::Windows).use_compat_shim);
        assert!(!settings.flags_for(&folder, Platform::Unix).use_compat_shim);
        assert!(!Settings::default().flags_for(&folder, Platform::Windows).use_compat_shim);
    }

    #[test]
    fn test_affects_is_scoped_to_folder() {
        let a = WorkspaceFolder::new("/a");
        let b = WorkspaceFolder::new("/b");
        let before = Settings::default();
        let after = Settings::default().with_folder(a.clone(), remote(true));
        assert!(before.affects(&after, &a));
        assert!(!before.affects(&after, &b));

        let global_change = Settings::new(remote(true));
        assert!(before.affects(&global_change, &b));
    }

    #[test]
    fn test_load_folder_settings() {
        let temp = TempDir::new().unwrap();
        let folder = WorkspaceFolder::new(temp.path());
        let mut settings = Settings::default();

        settings.load_folder(&folder).unwrap();
        assert!(settings.folders.is_empty());

        std::fs::create_dir_all(temp.path().join(".vscode")).unwrap();
        std::fs::write(
            folder_settings_path(&folder),
            r#"{"yourbase.remoteBuild": true}"#,
        )
        .unwrap();
        settings.load_folder(&folder).unwrap();
        assert!(settings.remote_build(&folder));
    }

    #[test]
    fn test_store_notifies_until_unsubscribed() {
        let store = SettingsStore::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let subscription = {
            let calls = calls.clone();
            store.subscribe(move |_, _| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };
        assert_eq!(store.subscriber_count(), 1);

        store.update(Settings::new(remote(true)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Unchanged settings are not a change.
        store.update(Settings::new(remote(true)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        drop(subscription);
        assert_eq!(store.subscriber_count(), 0);
        store.update(Settings::default());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
