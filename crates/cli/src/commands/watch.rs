use anyhow::Result;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use yb_tasks_core::NotifyWatcher;

use crate::display::{format_listing, print_failures};
use crate::host::Host;

/// Let editors finish writing before re-reading.
const SETTLE_DELAY: Duration = Duration::from_millis(200);

pub async fn watch_command(host: &Host) -> Result<()> {
    let registry = host.registry(Arc::new(NotifyWatcher::new()));
    let changed = registry.changed();

    let (tx, mut settings_events) = mpsc::unbounded_channel();
    let mut settings_watcher = SettingsWatcher::new(host.settings_paths(), tx)?;

    loop {
        let listing = registry.list_tasks().await;
        print!("{}", format_listing(&registry.folders(), &listing.tasks));
        print_failures(&listing.failures);
        println!();

        loop {
            tokio::select! {
                _ = changed.notified() => {
                    info!("Build configuration changed, refreshing tasks");
                    tokio::time::sleep(SETTLE_DELAY).await;
                    break;
                }
                Some(()) = settings_events.recv() => {
                    tokio::time::sleep(SETTLE_DELAY).await;
                    while settings_events.try_recv().is_ok() {}
                    settings_watcher.refresh();
                    // Folders whose settings changed are invalidated, which
                    // wakes `changed` on the next turn.
                    if let Err(e) = host.reload_settings() {
                        warn!("Keeping previous settings: {:#}", e);
                    }
                }
                _ = tokio::signal::ctrl_c() => return Ok(()),
            }
        }
    }
}

/// Reports edits to the settings files.
///
/// Each file's directory is watched. A missing `.vscode` directory is covered
/// by watching its parent until it appears.
struct SettingsWatcher {
    watcher: RecommendedWatcher,
    files: Vec<PathBuf>,
    watched: HashSet<PathBuf>,
}

impl SettingsWatcher {
    fn new(files: Vec<PathBuf>, tx: mpsc::UnboundedSender<()>) -> Result<Self> {
        let names = relevant_names(&files);
        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if touches_settings(&names, &event) {
                    let _ = tx.send(());
                }
            }
            Err(e) => warn!("Settings watch error: {}", e),
        })?;
        let mut settings_watcher = Self {
            watcher,
            files,
            watched: HashSet::new(),
        };
        settings_watcher.refresh();
        Ok(settings_watcher)
    }

    /// Watch the closest existing directory of every settings file.
    fn refresh(&mut self) {
        for file in &self.files {
            let Some(dir) = watch_dir(file) else {
                debug!("Nothing to watch for {:?}", file);
                continue;
            };
            if self.watched.contains(&dir) {
                continue;
            }
            match self.watcher.watch(&dir, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    debug!("Watching {:?} for settings changes", dir);
                    self.watched.insert(dir);
                }
                Err(e) => warn!("Cannot watch {:?} for settings changes: {}", dir, e),
            }
        }
    }
}

fn watch_dir(file: &Path) -> Option<PathBuf> {
    file.ancestors()
        .skip(1)
        .take(2)
        .find(|dir| dir.is_dir())
        .map(Path::to_path_buf)
}

/// File names whose events matter: the settings files and their directories.
fn relevant_names(files: &[PathBuf]) -> HashSet<OsString> {
    files
        .iter()
        .flat_map(|file| [file.file_name(), file.parent().and_then(Path::file_name)])
        .flatten()
        .map(OsString::from)
        .collect()
}

fn touches_settings(names: &HashSet<OsString>, event: &Event) -> bool {
    let kind_matters = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    kind_matters
        && event
            .paths
            .iter()
            .any(|path| path.file_name().is_some_and(|name| names.contains(name)))
}
