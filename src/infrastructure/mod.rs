//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//!
//! - `resolver` - Node-style resolution with `exports` conditions
//! - `source` - Directive and import scanning from disk

pub mod resolver;
pub mod source;

pub use resolver::NodeResolver;
pub use source::FsModuleSource;
