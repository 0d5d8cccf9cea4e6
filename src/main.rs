//! Stratum CLI
//!
//! Usage: stratum <COMMAND>
//!
//! Commands:
//!   plan   Build the layer plan and print the manifest
//!   check  Validate configuration and entry synthesis
//!   watch  Watch for changes and emit hot update signals

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let context = cli.command.context();
    match &cli.command {
        Commands::Plan { .. } => commands::plan::cmd_plan(context, cli.json),
        Commands::Check { .. } => commands::check::cmd_check(context, cli.json),
        Commands::Watch { .. } => commands::watch::cmd_watch(context, cli.json),
    }
}

/// Logs go to stderr so NDJSON on stdout stays parseable. `RUST_LOG` wins
/// over the `-v` count.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stratum={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
