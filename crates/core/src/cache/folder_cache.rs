//! Memoized task discovery for one workspace folder.
//!
//! The cache moves `Empty -> Computing -> Ready` and back to `Empty` whenever
//! the folder's configuration file or its `yourbase` settings change. Callers
//! that arrive while a discovery is running share it. A discovery that was
//! invalidated while running still answers the callers already waiting on it,
//! but its result is never stored.

use futures::future::{self, BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

use super::discovery::{DiscoveryContext, discover_tasks};
use crate::config::Subscription;
use crate::error::Result;
use crate::types::{Task, WorkspaceFolder};
use crate::watch::{ConfigChange, ConfigWatcher, WatchGuard};

pub type TaskListResult = Result<Arc<Vec<Task>>>;

type SharedDiscovery = Shared<BoxFuture<'static, TaskListResult>>;

enum CacheState {
    Empty,
    Computing {
        generation: u64,
        discovery: SharedDiscovery,
    },
    Ready(TaskListResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Empty,
    Computing,
    Ready,
}

struct CacheInner {
    folder: WorkspaceFolder,
    state: Mutex<CacheState>,
    generation: AtomicU64,
    runs: AtomicUsize,
    changed: Arc<Notify>,
}

impl CacheInner {
    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn invalidate(&self, reason: &str) {
        *self.state() = CacheState::Empty;
        tracing::debug!("Invalidated tasks for {} ({})", self.folder, reason);
        self.changed.notify_one();
    }

    fn finish(&self, generation: u64, result: &TaskListResult) {
        let mut state = self.state();
        match &*state {
            CacheState::Computing {
                generation: current,
                ..
            } if *current == generation => {
                *state = CacheState::Ready(result.clone());
            }
            _ => tracing::debug!(
                "Dropping stale task list for {} (generation {})",
                self.folder,
                generation
            ),
        }
    }
}

/// Task list of one workspace folder, kept in sync with its configuration.
///
/// Dropping the cache releases its file watch and settings subscription.
pub struct FolderTaskCache {
    inner: Arc<CacheInner>,
    context: DiscoveryContext,
    _watch: Option<WatchGuard>,
    _settings: Subscription,
}

impl FolderTaskCache {
    pub fn new(
        folder: WorkspaceFolder,
        context: DiscoveryContext,
        watcher: &dyn ConfigWatcher,
        changed: Arc<Notify>,
    ) -> Self {
        let inner = Arc::new(CacheInner {
            folder: folder.clone(),
            state: Mutex::new(CacheState::Empty),
            generation: AtomicU64::new(0),
            runs: AtomicUsize::new(0),
            changed,
        });

        let weak = Arc::downgrade(&inner);
        let watch = match watcher.watch(
            &folder,
            Arc::new(move |change: ConfigChange| {
                if let Some(inner) = weak.upgrade() {
                    inner.invalidate(&format!("configuration {change:?}"));
                }
            }),
        ) {
            Ok(guard) => Some(guard),
            Err(e) => {
                tracing::warn!("Cannot watch {} for configuration changes: {}", folder, e);
                None
            }
        };

        let weak = Arc::downgrade(&inner);
        let settings = context.settings.subscribe(move |previous, next| {
            if let Some(inner) = weak.upgrade() {
                if previous.affects(next, &inner.folder) {
                    inner.invalidate("settings changed");
                }
            }
        });

        Self {
            inner,
            context,
            _watch: watch,
            _settings: settings,
        }
    }

    pub fn folder(&self) -> &WorkspaceFolder {
        &self.inner.folder
    }

    /// The folder's tasks.
    ///
    /// The state transition happens when this is called, not when the
    /// returned future is first polled: two calls in a row share one
    /// discovery even if neither has been awaited yet.
    pub fn get_tasks(&self) -> BoxFuture<'static, TaskListResult> {
        let mut state = self.inner.state();
        match &*state {
            CacheState::Ready(result) => return future::ready(result.clone()).boxed(),
            CacheState::Computing { discovery, .. } => return discovery.clone().boxed(),
            CacheState::Empty => {}
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.runs.fetch_add(1, Ordering::SeqCst);
        let folder = self.inner.folder.clone();
        let flags = self.context.flags_for(&folder);
        tracing::debug!(
            "Discovering tasks for {} (generation {}, {:?})",
            folder,
            generation,
            flags
        );

        let pipeline = discover_tasks(self.context.clone(), folder, flags);
        let inner = Arc::downgrade(&self.inner);
        let discovery = async move {
            let result = pipeline.await.map(Arc::new);
            if let Some(inner) = inner.upgrade() {
                inner.finish(generation, &result);
            }
            result
        }
        .boxed()
        .shared();

        *state = CacheState::Computing {
            generation,
            discovery: discovery.clone(),
        };
        discovery.boxed()
    }

    /// Forget the current task list. The next query rediscovers.
    pub fn invalidate(&self) {
        self.inner.invalidate("requested");
    }

    pub fn status(&self) -> CacheStatus {
        match &*self.inner.state() {
            CacheState::Empty => CacheStatus::Empty,
            CacheState::Computing { .. } => CacheStatus::Computing,
            CacheState::Ready(_) => CacheStatus::Ready,
        }
    }

    /// How many discoveries this cache has started.
    pub fn discovery_runs(&self) -> usize {
        self.inner.runs.load(Ordering::SeqCst)
    }
}

impl Drop for FolderTaskCache {
    fn drop(&mut self) {
        tracing::debug!("Releasing task cache for {}", self.inner.folder);
    }
}
