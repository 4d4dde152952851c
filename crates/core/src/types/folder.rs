use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{CONFIG_FILE_NAME, slash_path_base};

/// One root of a (possibly multi-root) workspace.
///
/// The path is the folder's identity: two folders with the same path are the
/// same folder, regardless of how they were obtained.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceFolder {
    path: PathBuf,
}

impl WorkspaceFolder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name, the final component of the folder path.
    pub fn name(&self) -> String {
        slash_path_base(&self.path)
    }

    /// Location of the folder's own build configuration, whether or not it
    /// exists.
    pub fn config_path(&self) -> PathBuf {
        self.path.join(CONFIG_FILE_NAME)
    }
}

impl fmt::Display for WorkspaceFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl From<PathBuf> for WorkspaceFolder {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for WorkspaceFolder {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}
