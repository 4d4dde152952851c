use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tracing::{debug, info, warn};

use yb_tasks_core::{ManualWatcher, PartialTask, TaskDefinition};

use crate::host::Host;

pub async fn run_command(host: &Host, target: &str, dry_run: bool) -> Result<()> {
    let folder = host.primary_folder()?.clone();
    let registry = host.registry(Arc::new(ManualWatcher::new()));

    let definition = TaskDefinition::new(target);
    let partial = PartialTask::for_folder(&definition, folder.clone())?;
    let Some(task) = registry.resolve_task(&partial) else {
        bail!("Cannot build target {:?}", target);
    };
    let Some(execution) = task.execution else {
        bail!("Task {:?} has no execution", target);
    };

    let listing = registry.list_tasks().await;
    if !listing.tasks.iter().any(|t| t.definition == definition) {
        warn!("Target {:?} is not declared in {}", target, folder.config_path().display());
    }

    let shell_cmd = execution.to_shell_command();
    if dry_run {
        println!("{}", shell_cmd);
        println!("Working directory: {}", folder);
        return Ok(());
    }

    info!("Running: {}", shell_cmd);
    debug!("Working directory: {}", folder);
    let status = execution
        .execute(folder.path())
        .with_context(|| format!("Failed to execute: {}", shell_cmd))?;

    if !status.success() {
        std::process::exit(status.code().unwrap_or(1));
    }
    Ok(())
}
