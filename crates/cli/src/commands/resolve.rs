use anyhow::{Context, Result, bail};
use std::sync::Arc;

use yb_tasks_core::{ManualWatcher, PartialTask, TaskScope};

use crate::host::Host;

/// Rebuild a task from a serialized definition, as a host does for
/// "run last task".
pub fn resolve_command(host: &Host, definition: &str) -> Result<()> {
    let definition: serde_json::Value =
        serde_json::from_str(definition).context("Task definition is not valid JSON")?;
    let folder = host.primary_folder()?.clone();
    let registry = host.registry(Arc::new(ManualWatcher::new()));

    let partial = PartialTask::new(definition, TaskScope::Folder(folder));
    match registry.resolve_task(&partial) {
        Some(task) => {
            println!("{}", serde_json::to_string_pretty(&task)?);
            Ok(())
        }
        None => bail!("Task definition is not resolvable: {}", partial.definition),
    }
}
