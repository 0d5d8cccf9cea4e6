//! Watch Use Case
//!
//! Continuous development rebuilds feeding the hot update channel:
//! - File system monitoring (via `notify` crate)
//! - Debouncing (100ms default)
//! - Content-hash filtering of no-op saves
//! - Rebuild, manifest diff and hot signal propagation
//!
//! ## Usage
//!
//! ```ignore
//! let options = WatchOptions::new(input);
//! let use_case = DevWatchUseCase::new(options, NodeResolver::new(), FsModuleSource::new());
//! use_case.start(running, |event| { ... });
//! ```

mod cache;
mod event;
mod use_case;

#[cfg(test)]
mod tests;

pub use cache::{ContentChange, ContentHashes};
pub use event::{WatchEvent, WatchOptions, WatcherState, DEBOUNCE_MS};
pub use use_case::DevWatchUseCase;
