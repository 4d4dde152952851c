pub mod folder;
pub mod target;
pub mod task;

// Re-export commonly used types
pub use folder::WorkspaceFolder;
pub use target::BuildTarget;
pub use task::{PartialTask, TASK_SOURCE, TASK_TYPE, Task, TaskDefinition, TaskGroup, TaskScope};
