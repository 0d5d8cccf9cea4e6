//! Domain Entities
//!
//! - `Entry` / `RawEntry` / `LayerAssociation` - configured graph roots and pins
//! - `ClassificationRule` / `RuleSet` - layer assignment rules
//! - `ExclusionSet` / `ExclusionSets` - per-layer resolution exclusions
//! - `BuildManifest` - the emitted layer plan

mod entry;
mod exclusion;
mod manifest;
mod rule;

pub use entry::{AssociationTarget, Entry, LayerAssociation, RawEntry};
pub use exclusion::{ExclusionSet, ExclusionSets};
pub use manifest::{BuildManifest, EnvironmentManifest, ModuleRecord};
pub use rule::{
    ClassificationRule, RulePredicate, RuleSet, DIRECTIVE_PRIORITY, ENTRY_PRIORITY,
    EXPLICIT_PRIORITY,
};
