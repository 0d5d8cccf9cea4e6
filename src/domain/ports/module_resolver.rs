//! ModuleResolver port - specifier resolution under a condition set
//!
//! The resolver is the only place package `exports` maps are consulted, so
//! the ordered condition set decides which package variant a layer sees.

use std::path::Path;

use crate::domain::value_objects::{ConditionSet, ModuleId};

/// Resolves an import specifier to a canonical module identity.
///
/// Implementations:
/// - `NodeResolver` - node_modules walk-up with `exports` conditions
/// - in-memory maps in tests
pub trait ModuleResolver: Send + Sync {
    /// Resolve `specifier` as imported from `from_dir`.
    ///
    /// Returns `None` when nothing matches. Earlier conditions in
    /// `conditions` are preferred; a missing condition falls back silently.
    fn resolve(&self, from_dir: &Path, specifier: &str, conditions: &ConditionSet)
        -> Option<ModuleId>;
}

impl<T: ModuleResolver + ?Sized> ModuleResolver for &T {
    fn resolve(
        &self,
        from_dir: &Path,
        specifier: &str,
        conditions: &ConditionSet,
    ) -> Option<ModuleId> {
        (**self).resolve(from_dir, specifier, conditions)
    }
}
