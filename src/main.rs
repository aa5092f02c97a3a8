#[macro_use]
extern crate log;

use std::io::{self};
use std::process::ExitCode;

use clap::Parser;

use cachesim::{Args, LevelConfig, SimError};

fn read_config(path: &std::path::Path) -> Result<Vec<LevelConfig>, SimError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| SimError::ConfigFileError(format!("{}: {}", path.display(), e)))?;
    LevelConfig::parse_all(&text)
}

fn run(args: &Args) -> Result<(), SimError> {
    let configs = read_config(&args.config)?;
    debug!("{}", LevelConfig::report_table(&configs));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let failures = cachesim::run_workload(
        &configs,
        stdin.lock(),
        stdout.lock(),
        args.continue_on_error,
    )?;
    if failures > 0 {
        warn!("{} workload entries failed", failures);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
