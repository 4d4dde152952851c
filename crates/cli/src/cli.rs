use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{
    config_command, list_command, resolve_command, run_command, watch_command,
    workspace_config_command,
};
use crate::host::Host;

/// Discover YourBase build targets and run them as tasks
#[derive(Parser, Debug)]
#[command(name = "yb-tasks")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Describes the workspace the tasks come from
#[derive(Args, Debug, Clone, Default)]
pub struct WorkspaceArgs {
    /// Workspace folder (repeatable, defaults to the current directory)
    #[arg(short, long = "folder", global = true)]
    pub folders: Vec<PathBuf>,

    /// Settings file with `yourbase.*` keys
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Build remotely regardless of settings
    #[arg(long, global = true)]
    pub remote: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the build tasks of every workspace folder
    #[command(visible_alias = "ls")]
    List {
        /// Print tasks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Complete a task from its serialized definition
    Resolve {
        /// Task definition, e.g. '{"type":"yb","target":"default"}'
        definition: String,
    },
    /// Build a target in the first workspace folder
    #[command(visible_alias = "r")]
    Run {
        /// Build target name
        target: String,

        /// Print the command without executing it
        #[arg(short, long)]
        dry_run: bool,
    },
    /// Show the build configuration governing a file
    Config {
        /// File or folder to start from (defaults to the current directory)
        path: Option<PathBuf>,

        /// Open the configuration in $EDITOR
        #[arg(short, long)]
        edit: bool,
    },
    /// Show the build configuration of a workspace folder
    WorkspaceConfig {
        /// Folder to pick when several are open
        #[arg(long)]
        select: Option<String>,

        /// Open the configuration in $EDITOR
        #[arg(short, long)]
        edit: bool,
    },
    /// Keep listing tasks as configurations change
    Watch,
}

impl Cli {
    /// Execute the command
    pub async fn execute(self) -> Result<()> {
        let host = Host::from_args(&self.workspace)?;
        match self.command {
            Commands::List { json } => list_command(&host, json).await,
            Commands::Resolve { definition } => resolve_command(&host, &definition),
            Commands::Run { target, dry_run } => run_command(&host, &target, dry_run).await,
            Commands::Config { path, edit } => config_command(&host, path.as_deref(), edit).await,
            Commands::WorkspaceConfig { select, edit } => {
                workspace_config_command(&host, select.as_deref(), edit).await
            }
            Commands::Watch => watch_command(&host).await,
        }
    }
}
