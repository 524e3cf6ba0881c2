//! Binary entrypoint for the binding generator.
//!
//! Installs stderr-bound structured logging, then delegates to
//! [`rig_apigen::run`] with the process streams.

use std::io::{self, Write};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    install_telemetry();
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    let code = rig_apigen::run(std::env::args_os(), &mut stdin, &mut stdout, &mut stderr);
    if stderr.flush().is_err() {
        return ExitCode::FAILURE;
    }
    code
}

/// Installs the global subscriber; an already-installed one wins.
fn install_telemetry() {
    drop(
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .try_init(),
    );
}
