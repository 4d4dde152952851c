pub mod config;
pub mod list;
pub mod resolve;
pub mod run;
pub mod watch;

pub use config::{config_command, workspace_config_command};
pub use list::list_command;
pub use resolve::resolve_command;
pub use run::run_command;
pub use watch::watch_command;
