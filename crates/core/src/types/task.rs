use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::WorkspaceFolder;
use crate::command::ExecutionSpec;

/// Task type identifier registered with the host.
pub const TASK_TYPE: &str = "yb";

/// Source label shown next to every discovered task.
pub const TASK_SOURCE: &str = "yb";

/// Durable, serializable identity of a task.
///
/// Two definitions are equal iff their targets match; the definition alone
/// is enough to rebuild a runnable task (see `TaskRegistry::resolve_task`).
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub target: String,
}

impl TaskDefinition {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            kind: TASK_TYPE.to_string(),
            target: target.into(),
        }
    }

    /// Validate a definition the host reconstructed from persisted data.
    ///
    /// Returns `None` unless `type` is `"yb"` and `target` is a non-empty
    /// string. Unknown extra keys are ignored.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if object.get("type").and_then(Value::as_str) != Some(TASK_TYPE) {
            return None;
        }
        let target = object.get("target").and_then(Value::as_str)?;
        if target.is_empty() {
            return None;
        }
        Some(Self::new(target))
    }
}

impl PartialEq for TaskDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl std::hash::Hash for TaskDefinition {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.target.hash(state);
    }
}

/// Host task group. Every yb target is a build task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskGroup {
    Build,
}

/// A task as handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub definition: TaskDefinition,
    pub scope: WorkspaceFolder,
    pub display_name: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionSpec>,
    pub group: TaskGroup,
}

impl Task {
    pub fn new(definition: TaskDefinition, scope: WorkspaceFolder) -> Self {
        Self {
            display_name: definition.target.clone(),
            definition,
            scope,
            source: TASK_SOURCE.to_string(),
            execution: None,
            group: TaskGroup::Build,
        }
    }

    pub fn with_execution(mut self, execution: ExecutionSpec) -> Self {
        self.execution = Some(execution);
        self
    }

    pub fn target(&self) -> &str {
        &self.definition.target
    }
}

/// Where a host-reconstructed task claims to belong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "folder")]
pub enum TaskScope {
    Global,
    Workspace,
    Folder(WorkspaceFolder),
}

/// Minimal task data a host may hold on to, for example to re-run the last
/// task without going through discovery again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialTask {
    pub definition: Value,
    pub scope: TaskScope,
}

impl PartialTask {
    pub fn new(definition: Value, scope: TaskScope) -> Self {
        Self { definition, scope }
    }

    pub fn for_folder(definition: &TaskDefinition, folder: WorkspaceFolder) -> crate::Result<Self> {
        Ok(Self {
            definition: serde_json::to_value(definition)?,
            scope: TaskScope::Folder(folder),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_definition_equality_is_by_target() {
        let a = TaskDefinition::new("foo");
        let mut b = TaskDefinition::new("foo");
        b.kind = "other".to_string();
        assert_eq!(a, b);
        assert_ne!(a, TaskDefinition::new("bar"));
    }

    #[test]
    fn test_definition_from_value() {
        let defn = TaskDefinition::from_value(&json!({"type": "yb", "target": "foo"}));
        assert_eq!(defn, Some(TaskDefinition::new("foo")));

        let extra =
            TaskDefinition::from_value(&json!({"type": "yb", "target": "foo", "label": "x"}));
        assert!(extra.is_some());
    }

    #[test]
    fn test_definition_from_invalid_value() {
        assert!(TaskDefinition::from_value(&json!({"type": "npm", "target": "foo"})).is_none());
        assert!(TaskDefinition::from_value(&json!({"type": "yb"})).is_none());
        assert!(TaskDefinition::from_value(&json!({"type": "yb", "target": ""})).is_none());
        assert!(TaskDefinition::from_value(&json!({"type": "yb", "target": 42})).is_none());
        assert!(TaskDefinition::from_value(&json!("yb")).is_none());
    }

    #[test]
    fn test_definition_serializes_type_key() {
        let json = serde_json::to_value(TaskDefinition::new("release")).unwrap();
        assert_eq!(json, json!({"type": "yb", "target": "release"}));
    }

    #[test]
    fn test_new_task_is_build_group() {
        let task = Task::new(TaskDefinition::new("foo"), WorkspaceFolder::new("/w"));
        assert_eq!(task.display_name, "foo");
        assert_eq!(task.source, "yb");
        assert_eq!(task.group, TaskGroup::Build);
        assert!(task.execution.is_none());
    }
}
