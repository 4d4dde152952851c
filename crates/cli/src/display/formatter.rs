use yb_tasks_core::config::WorkspaceConfigurationItem;
use yb_tasks_core::registry::FolderFailure;
use yb_tasks_core::{Task, WorkspaceFolder};

/// Render tasks grouped under their folder, in listing order.
pub fn format_listing(folders: &[WorkspaceFolder], tasks: &[Task]) -> String {
    let mut out = String::new();
    for folder in folders {
        let folder_tasks: Vec<&Task> = tasks.iter().filter(|t| &t.scope == folder).collect();
        out.push_str(&format!("📦 {} ({})\n", folder.name(), folder));
        if folder_tasks.is_empty() {
            out.push_str("   (no build targets)\n");
            continue;
        }
        let width = folder_tasks
            .iter()
            .map(|t| t.display_name.len())
            .max()
            .unwrap_or(0);
        for task in folder_tasks {
            let command = task
                .execution
                .as_ref()
                .map(|e| e.to_shell_command())
                .unwrap_or_default();
            out.push_str(&format!(
                "   • {:width$}  {}\n",
                task.display_name,
                command,
                width = width
            ));
        }
    }
    out
}

/// Render the folder selection menu.
pub fn format_menu(items: &[WorkspaceConfigurationItem]) -> String {
    let mut out = String::new();
    for item in items {
        match &item.description {
            Some(description) => out.push_str(&format!("   • {} {}\n", item.label, description)),
            None => out.push_str(&format!(
                "   • {} → {}\n",
                item.label,
                item.config.path.display()
            )),
        }
    }
    out
}

pub fn print_failures(failures: &[FolderFailure]) {
    for failure in failures {
        eprintln!("⚠️  {}: {}", failure.folder.name(), failure.error);
    }
}
