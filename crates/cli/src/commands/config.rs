use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::info;

use yb_tasks_core::config::{
    ConfigTarget, DocumentRef, OpenOutcome, open_file_configuration, open_workspace_configuration,
};

use crate::display::format_menu;
use crate::host::Host;
use crate::utils::absolute_path;

/// Open the configuration that governs `path`.
pub async fn config_command(host: &Host, path: Option<&Path>, edit: bool) -> Result<()> {
    let start = match path {
        Some(path) => absolute_path(path)?,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let target = open_file_configuration(&host.locator(), &DocumentRef::File(start)).await?;
    show(&target, edit)
}

/// Open a workspace folder's configuration, asking which folder when
/// several are open.
pub async fn workspace_config_command(host: &Host, select: Option<&str>, edit: bool) -> Result<()> {
    let selected = match select {
        Some(label) => match host.folders.iter().find(|f| f.name() == label) {
            Some(folder) => Some(folder),
            None => bail!("No workspace folder named {:?}", label),
        },
        None => None,
    };

    match open_workspace_configuration(&host.locator(), selected, &host.folders).await? {
        OpenOutcome::Open(target) => show(&target, edit),
        OpenOutcome::Choose(items) => {
            eprintln!("Several folders are open. Pick one with --select <FOLDER>:");
            eprint!("{}", format_menu(&items));
            bail!("No folder selected")
        }
    }
}

fn show(target: &ConfigTarget, edit: bool) -> Result<()> {
    if !target.exists {
        info!("{} does not exist yet", target.path.display());
    }
    if edit {
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
        let status = std::process::Command::new(&editor)
            .arg(&target.path)
            .status()
            .with_context(|| format!("Failed to launch {}", editor))?;
        if !status.success() {
            bail!("{} exited with {}", editor, status);
        }
    } else {
        println!("{}", target.path.display());
    }
    Ok(())
}
