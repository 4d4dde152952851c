use std::sync::Arc;

use crate::command::InvocationBuilder;
use crate::config::{ConfigLocator, EnvironmentFlags, Platform, SettingsStore, TargetParser};
use crate::error::Result;
use crate::fs::FileSystem;
use crate::types::{Task, TaskDefinition, WorkspaceFolder};

/// Collaborators shared by every folder's discovery pipeline.
#[derive(Clone)]
pub struct DiscoveryContext {
    pub fs: Arc<dyn FileSystem>,
    pub settings: SettingsStore,
    pub platform: Platform,
    pub builder: InvocationBuilder,
    pub parser: TargetParser,
}

impl DiscoveryContext {
    pub fn new(fs: Arc<dyn FileSystem>, settings: SettingsStore) -> Self {
        Self {
            fs,
            settings,
            platform: Platform::current(),
            builder: InvocationBuilder::new(),
            parser: TargetParser::new(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn locator(&self) -> ConfigLocator {
        ConfigLocator::new(self.fs.clone())
    }

    /// Current flags for `folder`, read once per query.
    pub fn flags_for(&self, folder: &WorkspaceFolder) -> EnvironmentFlags {
        self.settings.flags_for(folder, self.platform)
    }

    /// A task for `definition` with its execution attached.
    pub fn task(
        &self,
        definition: TaskDefinition,
        folder: WorkspaceFolder,
        flags: EnvironmentFlags,
    ) -> Task {
        let execution = self.builder.build(&definition.target, flags);
        Task::new(definition, folder).with_execution(execution)
    }
}

/// Read `<folder>/.yourbase.yml` and turn every target into a task.
///
/// A folder without a configuration has no tasks. A configuration that
/// cannot be parsed is an error.
pub async fn discover_tasks(
    context: DiscoveryContext,
    folder: WorkspaceFolder,
    flags: EnvironmentFlags,
) -> Result<Vec<Task>> {
    let Some(config_path) = context.locator().find_in(&folder).await else {
        tracing::debug!("No build configuration in {}", folder);
        return Ok(Vec::new());
    };

    let contents = context.fs.read_to_string(&config_path).await.map_err(|e| {
        tracing::error!("Failed to read build configuration {:?}: {}", config_path, e);
        e
    })?;
    let targets = context.parser.parse(&contents).map_err(|e| {
        tracing::error!("Failed to parse build configuration {:?}: {}", config_path, e);
        e.at(&config_path)
    })?;

    tracing::debug!("Found {} build targets in {:?}", targets.len(), config_path);
    Ok(targets
        .into_iter()
        .map(|target| context.task(TaskDefinition::new(target.name), folder.clone(), flags))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    fn context(fs: MemoryFileSystem) -> DiscoveryContext {
        DiscoveryContext::new(Arc::new(fs), SettingsStore::default()).with_platform(Platform::Unix)
    }

    #[tokio::test]
    async fn test_discover_tasks_attaches_executions() {
        let fs = MemoryFileSystem::new().with_file(
            "/w/.yourbase.yml",
            "build_targets:\n  - name: foo\n  - name: bar\n",
        );
        let folder = WorkspaceFolder::new("/w");
        let tasks = discover_tasks(context(fs), folder.clone(), EnvironmentFlags::default())
            .await
            .unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].target(), "foo");
        assert_eq!(tasks[1].target(), "bar");
        assert_eq!(tasks[0].scope, folder);
        let execution = tasks[1].execution.as_ref().unwrap();
        assert_eq!(execution.program, "yb");
        assert_eq!(execution.args, vec!["build", "--", "bar"]);
    }

    #[tokio::test]
    async fn test_discover_tasks_uses_given_flags() {
        let fs = MemoryFileSystem::new()
            .with_file("/w/.yourbase.yml", "build_targets:\n  - name: foo\n");
        let flags = EnvironmentFlags {
            remote: true,
            use_compat_shim: false,
        };
        let tasks = discover_tasks(context(fs), WorkspaceFolder::new("/w"), flags)
            .await
            .unwrap();
        assert_eq!(tasks[0].execution.as_ref().unwrap().args[0], "remotebuild");
    }

    #[tokio::test]
    async fn test_missing_config_yields_no_tasks() {
        let fs = MemoryFileSystem::new()
            .with_file("/.yourbase.yml", "build_targets:\n  - name: root\n");
        let flags = EnvironmentFlags::default();
        let tasks = discover_tasks(context(fs), WorkspaceFolder::new("/w"), flags)
            .await
            .unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_config_is_an_error() {
        let fs = MemoryFileSystem::new().with_file("/w/.yourbase.yml", "not_build_targets: []\n");
        let flags = EnvironmentFlags::default();
        let err = discover_tasks(context(fs), WorkspaceFolder::new("/w"), flags)
            .await
            .unwrap_err();
        assert!(err.is_malformed_config());
    }
}
