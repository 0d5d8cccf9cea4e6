//! Exclusion sets
//!
//! Modules pinned to one layer are excluded from every other layer, so a
//! layer's resolve conditions never reach them.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::value_objects::{LayerId, Matcher, ModuleId};

#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    modules: BTreeSet<ModuleId>,
    matchers: Vec<Matcher>,
}

impl ExclusionSet {
    pub fn insert_module(&mut self, module: ModuleId) -> bool {
        self.modules.insert(module)
    }

    pub fn insert_matcher(&mut self, matcher: Matcher) {
        self.matchers.push(matcher);
    }

    pub fn contains(&self, module: &ModuleId) -> bool {
        self.modules.contains(module) || self.matchers.iter().any(|m| m.is_match(module))
    }

    pub fn modules(&self) -> &BTreeSet<ModuleId> {
        &self.modules
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.matchers.is_empty()
    }
}

/// One exclusion set per layer.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSets {
    per_layer: BTreeMap<LayerId, ExclusionSet>,
}

impl ExclusionSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_layer(&self, layer: LayerId) -> Option<&ExclusionSet> {
        self.per_layer.get(&layer)
    }

    pub fn is_excluded(&self, module: &ModuleId, layer: LayerId) -> bool {
        self.per_layer
            .get(&layer)
            .map(|set| set.contains(module))
            .unwrap_or(false)
    }

    /// Exclude `module` from every layer except `owner`.
    pub fn exclude_module_from_others(&mut self, module: &ModuleId, owner: LayerId) {
        for layer in LayerId::ALL.into_iter().filter(|l| *l != owner) {
            self.per_layer
                .entry(layer)
                .or_default()
                .insert_module(module.clone());
        }
    }

    /// Exclude everything `matcher` matches from every layer except `owner`.
    pub fn exclude_matcher_from_others(&mut self, matcher: &Matcher, owner: LayerId) {
        for layer in LayerId::ALL.into_iter().filter(|l| *l != owner) {
            self.per_layer
                .entry(layer)
                .or_default()
                .insert_matcher(matcher.clone());
        }
    }
}
