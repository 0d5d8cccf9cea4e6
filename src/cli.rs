use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

/// Stratum - layer planning for server-component builds
#[derive(Parser, Debug)]
#[command(name = "stratum")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI (JSON / NDJSON)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the layer plan and print the manifest
    Plan {
        /// Directory holding stratum.toml
        #[arg(short, long, default_value = ".")]
        context: PathBuf,
    },

    /// Validate configuration and entry synthesis
    Check {
        /// Directory holding stratum.toml
        #[arg(short, long, default_value = ".")]
        context: PathBuf,
    },

    /// Watch for changes, rebuild and emit hot update signals
    Watch {
        /// Directory holding stratum.toml
        #[arg(short, long, default_value = ".")]
        context: PathBuf,
    },
}

impl Commands {
    /// Directory holding `stratum.toml` for any subcommand.
    pub fn context(&self) -> &Path {
        match self {
            Commands::Plan { context }
            | Commands::Check { context }
            | Commands::Watch { context } => context.as_path(),
        }
    }
}
