//! Per-folder task caching

pub mod discovery;
pub mod folder_cache;

// Re-export the main cache type
pub use discovery::{DiscoveryContext, discover_tasks};
pub use folder_cache::{CacheStatus, FolderTaskCache, TaskListResult};
