//! Binary crate for the `weathervane` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and per-run overrides
//! - Interactive configuration and the interactive session
//! - Rendering published snapshots for the terminal

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod configure;
mod labels;
mod render;
mod session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);
    cmd.run().await
}

/// `RUST_LOG` wins; otherwise `--verbose` selects debug output. Logs go to stderr.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
