//! Resolution override engine
//!
//! Computes the ordered condition set a module's own imports resolve with:
//! layer tokens first, then the environment defaults. A module excluded from
//! the layer it was reached under takes its designated layer's conditions.

use crate::domain::entities::{ExclusionSets, RuleSet};
use crate::domain::value_objects::{ConditionSet, LayerId, ModuleId};

/// Layer tokens followed by the environment defaults.
pub fn layer_conditions(layer: LayerId) -> ConditionSet {
    let tokens = layer.layer().resolve_conditions().iter().copied();
    let mut conditions = ConditionSet::from_tokens(tokens);
    conditions.extend(layer.environment().default_conditions().iter().map(str::to_string));
    conditions
}

#[derive(Debug, Clone, Copy)]
pub struct ResolutionOverride<'a> {
    exclusions: &'a ExclusionSets,
    rules: &'a RuleSet,
}

impl<'a> ResolutionOverride<'a> {
    pub fn new(exclusions: &'a ExclusionSets, rules: &'a RuleSet) -> Self {
        Self { exclusions, rules }
    }

    /// Layer whose conditions apply to `module` reached under `layer`.
    pub fn effective_layer(&self, module: &ModuleId, layer: LayerId) -> LayerId {
        if self.exclusions.is_excluded(module, layer) {
            return self.rules.designated_layer(module).unwrap_or(layer);
        }
        layer
    }

    pub fn override_conditions(&self, module: &ModuleId, layer: LayerId) -> ConditionSet {
        layer_conditions(self.effective_layer(module, layer))
    }
}
