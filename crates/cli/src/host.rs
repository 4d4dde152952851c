//! The workspace the CLI stands in for: its folders and settings.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use yb_tasks_core::config::{SectionSettings, folder_settings_path};
use yb_tasks_core::{
    ConfigLocator, ConfigWatcher, Settings, SettingsStore, TaskRegistry, TokioFileSystem,
    WorkspaceFolder,
};

use crate::cli::WorkspaceArgs;
use crate::utils::absolute_path;

pub struct Host {
    pub folders: Vec<WorkspaceFolder>,
    pub settings: SettingsStore,
    settings_file: Option<PathBuf>,
    remote: bool,
}

impl Host {
    pub fn from_args(args: &WorkspaceArgs) -> Result<Self> {
        let mut folders: Vec<WorkspaceFolder> = Vec::new();
        if args.folders.is_empty() {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            folders.push(WorkspaceFolder::new(cwd));
        } else {
            for path in &args.folders {
                let folder = WorkspaceFolder::new(absolute_path(path)?);
                if !folders.contains(&folder) {
                    folders.push(folder);
                }
            }
        }

        let settings_file = match &args.settings {
            Some(path) => Some(absolute_path(path)?),
            None => None,
        };
        let settings = load_settings(&folders, settings_file.as_deref(), args.remote)?;
        debug!("Workspace folders: {:?}, settings: {:?}", folders, settings);

        Ok(Self {
            folders,
            settings: SettingsStore::new(settings),
            settings_file,
            remote: args.remote,
        })
    }

    /// Every file the settings are read from, whether it exists yet or not.
    pub fn settings_paths(&self) -> Vec<PathBuf> {
        self.settings_file
            .iter()
            .cloned()
            .chain(self.folders.iter().map(folder_settings_path))
            .collect()
    }

    /// Re-read the settings files and publish the result.
    ///
    /// Registries built from this host share the store, so folders whose
    /// `yourbase` settings changed drop their cached tasks.
    pub fn reload_settings(&self) -> Result<()> {
        let next = load_settings(&self.folders, self.settings_file.as_deref(), self.remote)?;
        debug!("Reloaded settings: {:?}", next);
        self.settings.update(next);
        Ok(())
    }

    pub fn locator(&self) -> ConfigLocator {
        ConfigLocator::new(Arc::new(TokioFileSystem))
    }

    pub fn registry(&self, watcher: Arc<dyn ConfigWatcher>) -> TaskRegistry {
        TaskRegistry::new(Arc::new(TokioFileSystem), watcher, self.settings.clone())
            .with_folders(self.folders.iter().cloned())
    }

    /// The folder single-folder commands act on.
    pub fn primary_folder(&self) -> Result<&WorkspaceFolder> {
        match self.folders.first() {
            Some(folder) => Ok(folder),
            None => bail!(yb_tasks_core::Error::NoWorkspaceFolders),
        }
    }
}

fn load_settings(
    folders: &[WorkspaceFolder],
    settings_file: Option<&Path>,
    remote: bool,
) -> Result<Settings> {
    let global = match settings_file {
        Some(path) => SectionSettings::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => SectionSettings::default(),
    };
    let mut settings = Settings::new(global);
    for folder in folders {
        settings
            .load_folder(folder)
            .with_context(|| format!("Failed to load settings for {}", folder))?;
    }

    if remote {
        settings.global.remote_build = Some(true);
        for section in settings.folders.values_mut() {
            section.remote_build = Some(true);
        }
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use yb_tasks_core::{CacheStatus, ManualWatcher};

    fn write_folder_settings(dir: &Path, contents: &str) {
        fs::create_dir_all(dir.join(".vscode")).unwrap();
        fs::write(dir.join(".vscode/settings.json"), contents).unwrap();
    }

    fn subcommands(tasks: &[yb_tasks_core::Task]) -> Vec<String> {
        tasks
            .iter()
            .map(|t| t.execution.as_ref().unwrap().args[0].clone())
            .collect()
    }

    #[test]
    fn test_from_args_dedups_folders() {
        let temp = TempDir::new().unwrap();
        let args = WorkspaceArgs {
            folders: vec![temp.path().to_path_buf(), temp.path().to_path_buf()],
            ..Default::default()
        };
        let host = Host::from_args(&args).unwrap();
        assert_eq!(host.folders, vec![WorkspaceFolder::new(temp.path())]);
    }

    #[test]
    fn test_remote_flag_overrides_folder_settings() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".vscode")).unwrap();
        fs::write(
            temp.path().join(".vscode/settings.json"),
            r#"{"yourbase.remoteBuild": false}"#,
        )
        .unwrap();

        let folder = WorkspaceFolder::new(temp.path());
        let mut args = WorkspaceArgs {
            folders: vec![temp.path().to_path_buf()],
            ..Default::default()
        };
        let host = Host::from_args(&args).unwrap();
        assert!(!host.settings.current().remote_build(&folder));

        args.remote = true;
        let host = Host::from_args(&args).unwrap();
        assert!(host.settings.current().remote_build(&folder));
    }

    #[test]
    fn test_invalid_settings_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let settings = temp.path().join("settings.json");
        fs::write(&settings, "{not json").unwrap();
        let args = WorkspaceArgs {
            folders: vec![temp.path().to_path_buf()],
            settings: Some(settings),
            remote: false,
        };
        let err = Host::from_args(&args).err().unwrap();
        assert!(err.to_string().contains("Failed to load settings"));
    }

    #[test]
    fn test_settings_paths_cover_file_and_folders() {
        let temp = TempDir::new().unwrap();
        let settings = temp.path().join("user.json");
        fs::write(&settings, "{}").unwrap();
        let api = temp.path().join("api");
        let args = WorkspaceArgs {
            folders: vec![api.clone()],
            settings: Some(settings.clone()),
            remote: false,
        };
        let host = Host::from_args(&args).unwrap();
        assert_eq!(
            host.settings_paths(),
            vec![settings, api.join(".vscode").join("settings.json")]
        );
    }

    #[tokio::test]
    async fn test_reload_settings_invalidates_cached_tasks() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".yourbase.yml"),
            "build_targets:\n  - name: default\n",
        )
        .unwrap();
        write_folder_settings(temp.path(), r#"{"yourbase.remoteBuild": false}"#);

        let folder = WorkspaceFolder::new(temp.path());
        let host = Host::from_args(&WorkspaceArgs {
            folders: vec![temp.path().to_path_buf()],
            ..Default::default()
        })
        .unwrap();
        let registry = host.registry(Arc::new(ManualWatcher::new()));
        let listing = registry.list_tasks().await;
        assert_eq!(subcommands(&listing.tasks), vec!["build"]);
        assert_eq!(registry.cache(&folder).unwrap().status(), CacheStatus::Ready);

        write_folder_settings(temp.path(), r#"{"yourbase.remoteBuild": true}"#);
        host.reload_settings().unwrap();
        assert_eq!(registry.cache(&folder).unwrap().status(), CacheStatus::Empty);

        let listing = registry.list_tasks().await;
        assert_eq!(subcommands(&listing.tasks), vec!["remotebuild"]);
    }

    #[tokio::test]
    async fn test_reload_without_changes_keeps_cache() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".yourbase.yml"), "build_targets: []\n").unwrap();
        let folder = WorkspaceFolder::new(temp.path());
        let host = Host::from_args(&WorkspaceArgs {
            folders: vec![temp.path().to_path_buf()],
            ..Default::default()
        })
        .unwrap();
        let registry = host.registry(Arc::new(ManualWatcher::new()));
        registry.list_tasks().await;

        host.reload_settings().unwrap();
        assert_eq!(registry.cache(&folder).unwrap().status(), CacheStatus::Ready);
    }

    #[test]
    fn test_reload_reapplies_remote_flag() {
        let temp = TempDir::new().unwrap();
        write_folder_settings(temp.path(), "{}");
        let folder = WorkspaceFolder::new(temp.path());
        let host = Host::from_args(&WorkspaceArgs {
            folders: vec![temp.path().to_path_buf()],
            settings: None,
            remote: true,
        })
        .unwrap();

        write_folder_settings(temp.path(), r#"{"yourbase.remoteBuild": false}"#);
        host.reload_settings().unwrap();
        assert!(host.settings.current().remote_build(&folder));
    }

    #[test]
    fn test_failed_reload_keeps_previous_settings() {
        let temp = TempDir::new().unwrap();
        write_folder_settings(temp.path(), r#"{"yourbase.remoteBuild": true}"#);
        let folder = WorkspaceFolder::new(temp.path());
        let host = Host::from_args(&WorkspaceArgs {
            folders: vec![temp.path().to_path_buf()],
            ..Default::default()
        })
        .unwrap();

        write_folder_settings(temp.path(), "{not json");
        assert!(host.reload_settings().is_err());
        assert!(host.settings.current().remote_build(&folder));
    }
}
