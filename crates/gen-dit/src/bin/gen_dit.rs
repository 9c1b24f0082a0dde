//! Directory tree generator CLI.
//!
//! This binary wires configuration, logging and standard output to
//! `gen_dit::run`, keeping generation testable without spawning a process.
//! LDIF goes to standard output; progress and errors go to standard error.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use gen_dit::{GeneratorSettings, RunError};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_LOG_FILTER: &str = "info";

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

fn run() -> Result<(), RunError> {
    let settings = GeneratorSettings::load().map_err(|err| RunError::Config {
        message: err.to_string(),
    })?;
    let options = settings.run_options()?;
    let summary = gen_dit::run(&options, BufWriter::new(io::stdout().lock()))?;
    info!(
        seed = summary.seed,
        people = summary.people,
        groups = summary.groups,
        tier_report = %options.tier_dump,
        "generation complete"
    );
    Ok(())
}
