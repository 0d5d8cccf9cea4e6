//! Configuration module for stratum
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (STRATUM_*)
//! 3. Project config (`stratum.toml` in the context directory)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{parse_with_warnings, with_env_overrides, ConfigError, ConfigWarning};
pub use types::{
    Config, DevConfig, EntriesConfig, EntryItem, EntrySpec, LayersConfig, MatcherList,
    MatcherSpec, Mode, NamedEntry, CONFIG_FILE,
};
