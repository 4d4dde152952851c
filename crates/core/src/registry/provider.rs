use async_trait::async_trait;

use super::{AggregationPolicy, TaskRegistry};
use crate::error::Result;
use crate::types::{PartialTask, Task};

/// The contract a host expects from a task provider.
#[async_trait]
pub trait TaskProvider: Send + Sync {
    /// Every task the provider knows about.
    async fn provide_tasks(&self) -> Result<Vec<Task>>;

    /// Fill in the execution of a task rebuilt from its definition.
    fn resolve_task(&self, task: &PartialTask) -> Option<Task>;
}

#[async_trait]
impl TaskProvider for TaskRegistry {
    async fn provide_tasks(&self) -> Result<Vec<Task>> {
        let listing = self.list_tasks().await;
        match (self.policy(), listing.failures.into_iter().next()) {
            (AggregationPolicy::FailFast, Some(failure)) => Err(failure.error),
            _ => Ok(listing.tasks),
        }
    }

    fn resolve_task(&self, task: &PartialTask) -> Option<Task> {
        TaskRegistry::resolve_task(self, task)
    }
}
