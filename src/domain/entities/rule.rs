//! Classification rules
//!
//! A rule pairs a predicate with a target layer and a priority. Rules are
//! kept in declaration order; the classifier picks the highest priority.

use std::fmt;

use crate::domain::value_objects::{Directive, LayerId, Matcher, ModuleId};

/// Explicit layer associations from configuration.
pub const EXPLICIT_PRIORITY: u32 = 300;
/// Source directives.
pub const DIRECTIVE_PRIORITY: u32 = 200;
/// Configured entries.
pub const ENTRY_PRIORITY: u32 = 100;

#[derive(Debug, Clone)]
pub enum RulePredicate {
    Directive(Directive),
    Module(ModuleId),
    Matcher(Matcher),
}

impl RulePredicate {
    pub fn matches(&self, module: &ModuleId, directives: &[Directive]) -> bool {
        match self {
            RulePredicate::Directive(directive) => directives.contains(directive),
            RulePredicate::Module(id) => id == module,
            RulePredicate::Matcher(matcher) => matcher.is_match(module),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pub predicate: RulePredicate,
    pub layer: LayerId,
    pub priority: u32,
    /// Where the rule came from, for error messages
    pub origin: String,
}

impl ClassificationRule {
    pub fn directive(directive: Directive) -> Self {
        Self {
            predicate: RulePredicate::Directive(directive),
            layer: directive.layer(),
            priority: DIRECTIVE_PRIORITY,
            origin: format!("directive {}", directive),
        }
    }

    pub fn explicit_module(module: ModuleId, layer: LayerId, origin: impl Into<String>) -> Self {
        Self {
            predicate: RulePredicate::Module(module),
            layer,
            priority: EXPLICIT_PRIORITY,
            origin: origin.into(),
        }
    }

    pub fn explicit_matcher(matcher: Matcher, layer: LayerId, origin: impl Into<String>) -> Self {
        Self {
            predicate: RulePredicate::Matcher(matcher),
            layer,
            priority: EXPLICIT_PRIORITY,
            origin: origin.into(),
        }
    }

    pub fn entry(module: ModuleId, layer: LayerId, origin: impl Into<String>) -> Self {
        Self {
            predicate: RulePredicate::Module(module),
            layer,
            priority: ENTRY_PRIORITY,
            origin: origin.into(),
        }
    }

    pub fn is_explicit(&self) -> bool {
        self.priority == EXPLICIT_PRIORITY
    }
}

impl fmt::Display for ClassificationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.origin, self.layer)
    }
}

/// Rules in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<ClassificationRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rule set seeded with one rule per recognized directive.
    pub fn with_directive_rules() -> Self {
        let mut rules = Self::new();
        for directive in Directive::ALL {
            rules.push(ClassificationRule::directive(directive));
        }
        rules
    }

    pub fn push(&mut self, rule: ClassificationRule) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassificationRule> {
        self.rules.iter()
    }

    /// Matching rules, in declaration order.
    pub fn matching<'a>(
        &'a self,
        module: &'a ModuleId,
        directives: &'a [Directive],
    ) -> impl Iterator<Item = &'a ClassificationRule> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.predicate.matches(module, directives))
    }

    /// Layer designated for `module` by explicit configuration, if any.
    pub fn designated_layer(&self, module: &ModuleId) -> Option<LayerId> {
        self.rules
            .iter()
            .filter(|rule| rule.is_explicit())
            .find(|rule| rule.predicate.matches(module, &[]))
            .map(|rule| rule.layer)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
