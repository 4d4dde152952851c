pub mod builder;
pub mod execution;

pub use builder::{BUILD_TOOL, COMPAT_SHIM, InvocationBuilder};
pub use execution::ExecutionSpec;
