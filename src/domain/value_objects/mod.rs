//! Value Objects
//!
//! Immutable types without identity:
//! - `LayerId` / `Layer` / `Environment` - the layer registry
//! - `ConditionSet` - ordered resolve conditions
//! - `ModuleId` - canonical module identity
//! - `Directive` - recognized source directives
//! - `Matcher` - glob/regex module predicates
//! - `ContentHash` - SHA-256 digests

mod conditions;
mod directive;
mod hash;
mod layer;
mod matcher;
mod module_id;

pub use conditions::ConditionSet;
pub use directive::{
    scan_prologue, Directive, DirectivePrologue, CLIENT_DIRECTIVE, SERVER_CALLABLE_DIRECTIVE,
    SERVER_ENTRY_DIRECTIVE,
};
pub use hash::ContentHash;
pub use layer::{Environment, Layer, LayerId};
pub use matcher::{Matcher, MatcherError};
pub use module_id::ModuleId;
