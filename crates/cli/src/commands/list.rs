use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use yb_tasks_core::ManualWatcher;

use crate::display::{format_listing, print_failures};
use crate::host::Host;

pub async fn list_command(host: &Host, json: bool) -> Result<()> {
    // One-shot listing: nothing will be around to see file events.
    let registry = host.registry(Arc::new(ManualWatcher::new()));
    let listing = registry.list_tasks().await;
    debug!(
        "Listed {} tasks with {} failures",
        listing.tasks.len(),
        listing.failures.len()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&listing.tasks)?);
    } else {
        print!("{}", format_listing(&registry.folders(), &listing.tasks));
    }
    print_failures(&listing.failures);

    if !listing.failures.is_empty() && listing.tasks.is_empty() {
        anyhow::bail!("No tasks could be discovered");
    }
    Ok(())
}
