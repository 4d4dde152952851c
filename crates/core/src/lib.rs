//! yb-tasks - Discover YourBase build targets and serve them as tasks
//!
//! This crate provides functionality to:
//! - Locate the `.yourbase.yml` that governs a file or workspace folder
//! - Parse the build targets it declares
//! - Turn each target into a `yb build`/`yb remotebuild` invocation
//! - Keep per-folder task lists cached and in sync with file and settings changes
pub mod cache;
pub mod command;
pub mod config;
pub mod error;
pub mod fs;
pub mod registry;
pub mod types;
pub mod watch;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use cache::{CacheStatus, FolderTaskCache};
pub use command::{ExecutionSpec, InvocationBuilder};
pub use config::{ConfigLocator, EnvironmentFlags, Platform, Settings, SettingsStore, TargetParser};
pub use fs::{FileSystem, MemoryFileSystem, TokioFileSystem};
pub use registry::{AggregationPolicy, TaskListing, TaskProvider, TaskRegistry};
pub use watch::{ConfigChange, ConfigWatcher, ManualWatcher, NotifyWatcher};
