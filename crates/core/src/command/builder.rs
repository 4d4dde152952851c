//! Maps a build target to the process that builds it.
//!
//! Every invocation of the build tool goes through [`InvocationBuilder`];
//! nothing else in the crate assembles argv for `yb`.

use crate::config::EnvironmentFlags;

use super::ExecutionSpec;

/// Command name of the YourBase build tool.
pub const BUILD_TOOL: &str = "yb";

/// Launcher used to run the build tool through the compatibility shim.
pub const COMPAT_SHIM: &str = "wsl";

/// Builds [`ExecutionSpec`]s. Pure: no filesystem or network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvocationBuilder;

impl InvocationBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, target: &str, flags: EnvironmentFlags) -> ExecutionSpec {
        let (program, mut args) = if flags.use_compat_shim {
            (COMPAT_SHIM, vec![BUILD_TOOL.to_string()])
        } else {
            (BUILD_TOOL, Vec::new())
        };

        let subcommand = if flags.remote { "remotebuild" } else { "build" };
        args.push(subcommand.to_string());
        args.push("--".to_string());
        args.push(target.to_string());

        ExecutionSpec::new(program, args)
    }
}
