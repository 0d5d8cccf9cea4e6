//! Module classifier
//!
//! Assigns a module to exactly one layer per compilation pass. Rules are
//! evaluated by descending priority; among equal priorities the first
//! registered rule wins unless another one names a different layer.

use std::fmt;

use crate::domain::entities::RuleSet;
use crate::domain::value_objects::{Directive, LayerId, ModuleId};

/// Why a module ended up in its layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationReason {
    /// A rule matched
    Rule { origin: String, priority: u32 },
    /// No rule matched; importer's layer propagated
    Inherited,
    /// No rule and no importer; environment default
    Default,
}

impl fmt::Display for ClassificationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationReason::Rule { origin, .. } => write!(f, "{}", origin),
            ClassificationReason::Inherited => write!(f, "inherited from importer"),
            ClassificationReason::Default => write!(f, "environment default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub layer: LayerId,
    pub reason: ClassificationReason,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error(
        "conflicting layers for {module}: {first} assigns {first_layer}, {second} assigns {second_layer} (both priority {priority})"
    )]
    Conflict {
        module: ModuleId,
        first: String,
        first_layer: LayerId,
        second: String,
        second_layer: LayerId,
        priority: u32,
    },
}

/// Classifies modules against a rule set.
#[derive(Debug, Clone, Copy)]
pub struct ModuleClassifier<'a> {
    rules: &'a RuleSet,
    default_layer: LayerId,
}

impl<'a> ModuleClassifier<'a> {
    pub fn new(rules: &'a RuleSet, default_layer: LayerId) -> Self {
        Self {
            rules,
            default_layer,
        }
    }

    pub fn default_layer(&self) -> LayerId {
        self.default_layer
    }

    /// Classify `module`.
    ///
    /// `importer` is the layer of the pass that reached the module, or
    /// `None` for a graph root.
    pub fn classify(
        &self,
        module: &ModuleId,
        directives: &[Directive],
        importer: Option<LayerId>,
    ) -> Result<Classification, ClassifyError> {
        let top_priority = self
            .rules
            .matching(module, directives)
            .map(|rule| rule.priority)
            .max();

        if let Some(priority) = top_priority {
            let mut top = self
                .rules
                .matching(module, directives)
                .filter(|rule| rule.priority == priority);
            if let Some(first) = top.next() {
                if let Some(other) = top.find(|rule| rule.layer != first.layer) {
                    return Err(ClassifyError::Conflict {
                        module: module.clone(),
                        first: first.origin.clone(),
                        first_layer: first.layer,
                        second: other.origin.clone(),
                        second_layer: other.layer,
                        priority,
                    });
                }

                return Ok(Classification {
                    layer: first.layer,
                    reason: ClassificationReason::Rule {
                        origin: first.origin.clone(),
                        priority,
                    },
                });
            }
        }

        Ok(match importer {
            Some(layer) => Classification {
                layer,
                reason: ClassificationReason::Inherited,
            },
            None => Classification {
                layer: self.default_layer,
                reason: ClassificationReason::Default,
            },
        })
    }
}
