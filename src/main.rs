//! physlab CLI.
//!
//! Evaluates the lab's physics models from the command line.

use std::process::ExitCode;

use physlab::cli::{run_cli, Args};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("physlab=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    run_cli(Args::parse())
}
