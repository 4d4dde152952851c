//! Build configuration discovery and host settings

pub mod locator;
pub mod open;
pub mod settings;
pub mod targets;

pub use locator::{CONFIG_FILE_NAME, ConfigLocator, slash_path_base};
pub use open::{
    ConfigTarget, DocumentRef, OpenOutcome, WorkspaceConfigurationItem,
    default_workspace_configuration, open_file_configuration, open_workspace_configuration,
    workspace_configuration_items,
};
pub use settings::{
    EnvironmentFlags, Platform, SETTINGS_SECTION, SectionSettings, Settings, SettingsStore,
    Subscription, folder_settings_path,
};
pub use targets::{MalformedConfig, TargetParser};
