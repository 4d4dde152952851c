use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Errors that can occur during yb-tasks operations
///
/// The type is `Clone` so that one failed discovery can be handed to every
/// caller waiting on the same memoized computation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("Malformed build configuration {}: {reason}", path.display())]
    MalformedConfig { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(Arc<io::Error>),

    #[error("Watch error: {0}")]
    WatchError(Arc<notify::Error>),

    #[error("Settings error: {0}")]
    SettingsError(String),

    #[error("Serialization error: {0}")]
    SerializationError(Arc<serde_json::Error>),

    #[error("Cannot open YourBase build configuration: there are no folders in the workspace.")]
    NoWorkspaceFolders,

    #[error("Could not find YourBase build configuration for {name}.")]
    ConfigNotFound { name: String },

    #[error("No YourBase build configuration for untitled file.")]
    UntitledDocument,
}

impl Error {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::MalformedConfig {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error came from a build configuration that exists but
    /// could not be understood.
    pub fn is_malformed_config(&self) -> bool {
        matches!(self, Error::MalformedConfig { .. })
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IoError(Arc::new(err))
    }
}

impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Error::WatchError(Arc::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(Arc::new(err))
    }
}

/// Result type alias for yb-tasks operations
pub type Result<T> = std::result::Result<T, Error>;
