#[macro_use]
extern crate log;

pub mod bitgeom;
pub mod cli;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod level;
pub mod report;
pub mod stats;
pub mod trace;
pub mod way;
pub mod workload;

pub use crate::cli::Args;
pub use crate::config::LevelConfig;
pub use crate::error::SimError;
pub use crate::hierarchy::Hierarchy;
pub use crate::trace::{Reference, TraceReader};
pub use crate::workload::{read_workload, WorkloadEntry};

use std::io::{BufRead, BufReader};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// The fixed seed the reference protocol's victim selection is drawn from,
/// shared process-wide so that runs are bit-reproducible.
pub const RNG_SEED: u64 = 1;

/// Drives one workload entry's trace through a freshly built hierarchy and
/// returns the rendered per-process report. The hierarchy is constructed
/// cold and dropped at the end of the run, so statistics never leak between
/// processes sharing the same configuration.
pub fn run_process(
    pid: u64,
    configs: &[LevelConfig],
    entry: &WorkloadEntry,
    rng: &mut StdRng,
) -> Result<String, SimError> {
    let file = entry.open_trace().map_err(|e| SimError::WorkloadError(e.to_string()))?;
    let reader = TraceReader::new(BufReader::new(file));
    info!("pid {}: starting trace {}", pid, entry.path.display());
    let mut hierarchy = Hierarchy::new(configs);
    for reference in reader {
        hierarchy.handle_reference(reference, rng)?;
    }
    info!("pid {}: trace exhausted", pid);
    debug_assert!(
        hierarchy.integrity_check(),
        "post-trace integrity check failed for pid {}",
        pid
    );
    Ok(report::render(pid, &hierarchy))
}

/// Reads the workload list from `r` and simulates each entry in turn,
/// writing one report per process. Returns the number of entries that
/// failed; with `continue_on_error` set, a per-entry failure is logged and
/// simulation moves on to the next entry instead of aborting the run.
pub fn run_workload<R: BufRead, W: std::io::Write>(
    configs: &[LevelConfig],
    workload: R,
    mut out: W,
    continue_on_error: bool,
) -> Result<u64, SimError> {
    let entries = read_workload(workload)?;
    let mut rng = StdRng::seed_from_u64(RNG_SEED);
    let mut failures = 0u64;
    for (pid, entry) in entries.iter().enumerate() {
        if let Some(tag) = entry.process_type {
            debug!("process {} ({}) tagged '{}'", pid, entry.path.display(), tag);
        }
        match run_process(pid as u64, configs, entry, &mut rng) {
            Ok(report) => {
                let _ = write!(out, "{}", report);
            }
            Err(e) => {
                failures += 1;
                error!("process {} ({}): {}", pid, entry.path.display(), e);
                if !continue_on_error || !e.is_soft() {
                    return Err(e);
                }
                warn!("Continuing...");
            }
        }
    }
    Ok(failures)
}
