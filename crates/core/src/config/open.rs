//! Resolution behind the "open configuration" commands.
//!
//! These functions decide *which* file to open; showing editors, menus and
//! messages is left to the host.

use futures::future::join_all;
use std::path::PathBuf;

use super::{ConfigLocator, slash_path_base};
use crate::error::{Error, Result};
use crate::types::WorkspaceFolder;

/// The document the user is looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentRef {
    /// A document that has never been saved.
    Untitled,
    File(PathBuf),
}

/// A configuration file to open, possibly one that still has to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTarget {
    pub path: PathBuf,
    pub exists: bool,
}

/// One entry of the folder selection menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfigurationItem {
    pub label: String,
    pub description: Option<String>,
    pub folder: WorkspaceFolder,
    pub config: ConfigTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Open(ConfigTarget),
    /// Several folders are open; the user has to pick one.
    Choose(Vec<WorkspaceConfigurationItem>),
}

/// Where a new configuration for `folder` would live.
pub fn default_workspace_configuration(folder: &WorkspaceFolder) -> ConfigTarget {
    ConfigTarget {
        path: folder.config_path(),
        exists: false,
    }
}

/// Open the configuration that governs the given document.
pub async fn open_file_configuration(
    locator: &ConfigLocator,
    document: &DocumentRef,
) -> Result<ConfigTarget> {
    let path = match document {
        DocumentRef::Untitled => return Err(Error::UntitledDocument),
        DocumentRef::File(path) => path,
    };
    match locator.find(path).await {
        Some(path) => Ok(ConfigTarget { path, exists: true }),
        None => Err(Error::ConfigNotFound {
            name: slash_path_base(path),
        }),
    }
}

/// Open the configuration of a workspace folder.
///
/// With an explicit `folder`, or when the workspace has exactly one folder,
/// the answer is that folder's configuration (or where to create it).
/// Otherwise the host gets a menu of every folder.
pub async fn open_workspace_configuration(
    locator: &ConfigLocator,
    folder: Option<&WorkspaceFolder>,
    workspace_folders: &[WorkspaceFolder],
) -> Result<OpenOutcome> {
    let folder = match (folder, workspace_folders) {
        (Some(folder), _) => folder,
        (None, []) => return Err(Error::NoWorkspaceFolders),
        (None, [only]) => only,
        (None, folders) => {
            let items = workspace_configuration_items(locator, folders).await;
            return Ok(OpenOutcome::Choose(items));
        }
    };
    Ok(OpenOutcome::Open(folder_configuration(locator, folder).await))
}

/// Build the selection menu, looking up every folder concurrently.
///
/// Folders with an existing configuration come first; the rest are offered
/// as "(no build configuration)" so a new file can be created there.
pub async fn workspace_configuration_items(
    locator: &ConfigLocator,
    folders: &[WorkspaceFolder],
) -> Vec<WorkspaceConfigurationItem> {
    let lookups = folders.iter().map(|folder| async move {
        let config = folder_configuration(locator, folder).await;
        WorkspaceConfigurationItem {
            label: folder.name(),
            description: (!config.exists).then(|| "(no build configuration)".to_string()),
            folder: folder.clone(),
            config,
        }
    });
    let (existing, creates): (Vec<_>, Vec<_>) = join_all(lookups)
        .await
        .into_iter()
        .partition(|item| item.config.exists);
    existing.into_iter().chain(creates).collect()
}

async fn folder_configuration(locator: &ConfigLocator, folder: &WorkspaceFolder) -> ConfigTarget {
    match locator.find(folder.path()).await {
        Some(path) => ConfigTarget { path, exists: true },
        None => default_workspace_configuration(folder),
    }
}
