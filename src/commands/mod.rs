//! Subcommand implementations

pub mod check;
pub mod plan;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use stratum::config::Config;

/// Load `stratum.toml` from `dir`, reporting unknown keys on stderr.
pub(crate) fn load_config(dir: &Path) -> Result<(Config, PathBuf)> {
    let dir = dir
        .canonicalize()
        .with_context(|| format!("context directory {} not found", dir.display()))?;
    let (config, warnings) = Config::load_or_default(&dir)?;
    for warning in &warnings {
        eprintln!("warning: {}", warning);
    }
    Ok((config, dir))
}
