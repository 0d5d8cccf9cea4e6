//! ModuleSource port - directive and import extraction
//!
//! The bundler owns real parsing; this port only needs the directive
//! prologue and the import specifiers of a module.

use std::path::PathBuf;

use crate::domain::value_objects::{Directive, ModuleId};

/// What the graph walk needs to know about one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceModule {
    pub directives: Vec<Directive>,
    /// Prologue strings that look like directives but are not recognized
    pub unrecognized: Vec<String>,
    /// Import specifiers in source order
    pub imports: Vec<String>,
}

impl SourceModule {
    pub fn has_directive(&self, directive: Directive) -> bool {
        self.directives.contains(&directive)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("module not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Loads module sources.
pub trait ModuleSource: Send + Sync {
    fn load(&self, module: &ModuleId) -> Result<SourceModule, SourceError>;
}

impl<T: ModuleSource + ?Sized> ModuleSource for &T {
    fn load(&self, module: &ModuleId) -> Result<SourceModule, SourceError> {
        (**self).load(module)
    }
}
