//! All task caches of an open workspace.

pub mod provider;

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Notify;

use crate::cache::{DiscoveryContext, FolderTaskCache};
use crate::config::{Platform, SettingsStore};
use crate::error::Error;
use crate::fs::FileSystem;
use crate::types::{PartialTask, Task, TaskDefinition, TaskScope, WorkspaceFolder};
use crate::watch::ConfigWatcher;

pub use provider::TaskProvider;

/// What [`TaskProvider::provide_tasks`] does when a folder fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AggregationPolicy {
    /// Report the failure and keep every other folder's tasks.
    #[default]
    Isolate,
    /// Fail the whole listing with the first failure in folder order.
    FailFast,
}

/// A folder whose tasks could not be discovered.
#[derive(Debug, Clone)]
pub struct FolderFailure {
    pub folder: WorkspaceFolder,
    pub error: Error,
}

/// Result of listing tasks across every folder.
#[derive(Debug, Clone, Default)]
pub struct TaskListing {
    pub tasks: Vec<Task>,
    pub failures: Vec<FolderFailure>,
}

/// Owns one [`FolderTaskCache`] per workspace folder, in the order folders
/// were added.
pub struct TaskRegistry {
    context: DiscoveryContext,
    watcher: Arc<dyn ConfigWatcher>,
    policy: AggregationPolicy,
    caches: Vec<FolderTaskCache>,
    changed: Arc<Notify>,
}

impl TaskRegistry {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        watcher: Arc<dyn ConfigWatcher>,
        settings: SettingsStore,
    ) -> Self {
        Self {
            context: DiscoveryContext::new(fs, settings),
            watcher,
            policy: AggregationPolicy::default(),
            caches: Vec::new(),
            changed: Arc::new(Notify::new()),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.context = self.context.with_platform(platform);
        self
    }

    pub fn with_policy(mut self, policy: AggregationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_folders(mut self, folders: impl IntoIterator<Item = WorkspaceFolder>) -> Self {
        for folder in folders {
            self.add_folder(folder);
        }
        self
    }

    /// Start tracking `folder`. Returns `false` if it was already tracked.
    pub fn add_folder(&mut self, folder: WorkspaceFolder) -> bool {
        if self.cache(&folder).is_some() {
            return false;
        }
        tracing::info!("Adding workspace folder {}", folder);
        let cache = FolderTaskCache::new(
            folder,
            self.context.clone(),
            self.watcher.as_ref(),
            self.changed.clone(),
        );
        self.caches.push(cache);
        true
    }

    /// Stop tracking `folder`, releasing its watch and settings
    /// subscription. Returns `false` if it was not tracked.
    pub fn remove_folder(&mut self, folder: &WorkspaceFolder) -> bool {
        let Some(index) = self.caches.iter().position(|c| c.folder() == folder) else {
            return false;
        };
        tracing::info!("Removing workspace folder {}", folder);
        self.caches.remove(index);
        true
    }

    /// Apply a workspace-folders change event.
    pub fn update_folders(&mut self, added: &[WorkspaceFolder], removed: &[WorkspaceFolder]) {
        for folder in added {
            self.add_folder(folder.clone());
        }
        for folder in removed {
            self.remove_folder(folder);
        }
    }

    pub fn folders(&self) -> Vec<WorkspaceFolder> {
        self.caches.iter().map(|c| c.folder().clone()).collect()
    }

    pub fn cache(&self, folder: &WorkspaceFolder) -> Option<&FolderTaskCache> {
        self.caches.iter().find(|c| c.folder() == folder)
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.context.settings
    }

    pub fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    /// Signalled whenever any folder's task list is invalidated.
    pub fn changed(&self) -> Arc<Notify> {
        self.changed.clone()
    }

    /// Query every folder concurrently.
    ///
    /// Tasks are concatenated in folder order, each folder's tasks in
    /// declaration order. A failing folder contributes no tasks and is
    /// reported in `failures`.
    pub async fn list_tasks(&self) -> TaskListing {
        let queries: Vec<_> = self
            .caches
            .iter()
            .map(|cache| {
                let folder = cache.folder().clone();
                let tasks = cache.get_tasks();
                async move { (folder, tasks.await) }
            })
            .collect();

        let mut listing = TaskListing::default();
        for (folder, result) in join_all(queries).await {
            match result {
                Ok(tasks) => listing.tasks.extend(tasks.iter().cloned()),
                Err(error) => {
                    tracing::warn!("Failed to discover tasks in {}: {}", folder, error);
                    listing.failures.push(FolderFailure { folder, error });
                }
            }
        }
        listing
    }

    /// Complete a task the host rebuilt from a bare definition.
    ///
    /// Returns `None` unless the definition is a `yb` definition with a
    /// non-empty target and the scope is a workspace folder. The execution
    /// is derived from current settings, exactly as discovery would.
    pub fn resolve_task(&self, partial: &PartialTask) -> Option<Task> {
        let TaskScope::Folder(folder) = &partial.scope else {
            tracing::debug!("Cannot resolve task with scope {:?}", partial.scope);
            return None;
        };
        let Some(definition) = TaskDefinition::from_value(&partial.definition) else {
            tracing::debug!("Cannot resolve task definition {}", partial.definition);
            return None;
        };
        let flags = self.context.flags_for(folder);
        Some(self.context.task(definition, folder.clone(), flags))
    }
}
