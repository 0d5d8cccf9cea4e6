//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod module_resolver;
pub mod module_source;

pub use module_resolver::ModuleResolver;
pub use module_source::{ModuleSource, SourceError, SourceModule};
