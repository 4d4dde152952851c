use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// A concrete, host-executable invocation: a program and its argv.
///
/// Execution never goes through a shell, so target names are passed to the
/// build tool exactly as declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl ExecutionSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Render the invocation for humans. Only used for display, never run.
    pub fn to_shell_command(&self) -> String {
        let mut cmd = quote_arg(&self.program);
        for arg in &self.args {
            cmd.push(' ');
            cmd.push_str(&quote_arg(arg));
        }
        cmd
    }

    /// Build a process for this invocation with `working_dir` as its cwd.
    pub fn to_command(&self, working_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.current_dir(working_dir);
        cmd
    }

    pub fn execute(&self, working_dir: &Path) -> io::Result<ExitStatus> {
        tracing::debug!(
            "Executing {} in {}",
            self.to_shell_command(),
            working_dir.display()
        );
        self.to_command(working_dir).status()
    }
}

fn quote_arg(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+@,".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
