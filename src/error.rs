//! Error types for stratum
//!
//! Uses `thiserror` for library errors. Each component owns a focused error
//! enum; `StratumError` wraps them for callers that drive a whole session.

use thiserror::Error;

use crate::application::router::{LoadError, RouteError};
use crate::config::ConfigError;
use crate::domain::services::{ClassifyError, SynthesizeError};

/// Result type alias for stratum operations
pub type StratumResult<T> = Result<T, StratumError>;

/// Main error type for stratum operations
#[derive(Error, Debug)]
pub enum StratumError {
    /// Configuration file could not be read or parsed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Entry synthesis failed (unresolved specifier, invalid matcher, conflict)
    #[error(transparent)]
    Synthesize(#[from] SynthesizeError),

    /// Two classification rules of equal priority disagree about a module
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// The server bundle could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Routing a request failed after it was matched
    #[error(transparent)]
    Route(#[from] RouteError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File watcher could not be set up
    #[error("watcher error: {0}")]
    Watch(String),

    /// Hot updates requested in production mode
    #[error("hot updates are disabled in production mode")]
    HotUpdatesDisabled,
}

impl From<notify::Error> for StratumError {
    fn from(err: notify::Error) -> Self {
        StratumError::Watch(err.to_string())
    }
}
