//! Stratum - layer planning and dev-time plumbing for server-component builds
//!
//! Stratum decides which compilation layer (server components, server-side
//! rendering, client) every module belongs to, overrides module resolution so
//! each layer sees the right package conditions, and drives the development
//! runtime: request routing against a lazily loaded server bundle and
//! layer-scoped hot updates.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    BuildDriver, BuildInput, BundleSlot, DevRuntime, DevWatchUseCase, HotSignal,
    HotUpdateChannel, Route, Router, RuntimeSession, WatchEvent, WatchOptions,
};
pub use config::{Config, ConfigWarning, Mode};
pub use domain::entities::{BuildManifest, Entry, LayerAssociation, RawEntry};
pub use domain::value_objects::{Directive, Environment, LayerId, ModuleId};
pub use error::{StratumError, StratumResult};
pub use infrastructure::{FsModuleSource, NodeResolver};
