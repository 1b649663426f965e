//! CLI command handlers, one file per command.

mod perf;

pub use perf::{run_perf_command, PerfArgs};
