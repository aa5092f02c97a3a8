//! Command-line surface. Verbosity is controlled by `RUST_LOG`, not a
//! dedicated flag, matching the teacher's `env_logger`-only convention.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "cachesim",
    about = "Trace-driven multi-level set-associative cache hierarchy simulator"
)]
pub struct Args {
    /// Cache configuration file: one line per level, ending with the
    /// memory layer (associativity 0).
    pub config: PathBuf,

    /// Keep simulating remaining workload entries after one fails instead
    /// of aborting the whole run.
    #[arg(long)]
    pub continue_on_error: bool,
}
