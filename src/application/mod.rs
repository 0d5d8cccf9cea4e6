//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `BuildDriver` - Synthesize entries, walk both environments, emit the manifest
//! - `Router` - Dev request routing against the single-flight bundle slot
//! - `HotUpdateChannel` - Layer-scoped hot signals after a rebuild
//! - `DevRuntime` - Mode-gated wiring of router and hot channel
//! - `DevWatchUseCase` - File watching with incremental rebuilds

pub mod build;
pub mod dev;
pub mod hot;
pub mod router;
pub mod watch;

pub use build::{BuildDriver, BuildInput};
pub use dev::DevRuntime;
pub use hot::{HotSignal, HotUpdateChannel, RuntimeSession};
pub use router::{BundleSlot, Route, Router};
pub use watch::{DevWatchUseCase, WatchEvent, WatchOptions};
