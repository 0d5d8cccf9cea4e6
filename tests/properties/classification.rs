//! Property tests for layer classification.

use proptest::prelude::*;

use stratum::domain::entities::{ClassificationRule, ExclusionSets, RuleSet};
use stratum::domain::services::{ModuleClassifier, ResolutionOverride};
use stratum::domain::value_objects::{Directive, LayerId, ModuleId};

fn layer() -> impl Strategy<Value = LayerId> {
    prop::sample::select(LayerId::ALL.to_vec())
}

fn directives() -> impl Strategy<Value = Vec<Directive>> {
    prop::sample::subsequence(Directive::ALL.to_vec(), 0..=1)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Classification is a pure function of its inputs.
    #[test]
    fn property_classification_is_deterministic(
        name in "[a-z]{1,8}",
        directives in directives(),
        importer in proptest::option::of(layer()),
        entry_layer in proptest::option::of(layer()),
    ) {
        let module = ModuleId::new(format!("/app/src/{}.tsx", name));
        let mut rules = RuleSet::with_directive_rules();
        if let Some(layer) = entry_layer {
            rules.push(ClassificationRule::entry(module.clone(), layer, "entries"));
        }
        let classifier = ModuleClassifier::new(&rules, LayerId::ServerComponents);

        let first = classifier.classify(&module, &directives, importer).unwrap();
        let second = classifier.classify(&module, &directives, importer).unwrap();
        prop_assert_eq!(first, second);
    }

    /// PROPERTY: A directive always beats an entry; explicit config beats both.
    #[test]
    fn property_priority_order_holds(
        directive in prop::sample::select(Directive::ALL.to_vec()),
        entry_layer in layer(),
        explicit_layer in layer(),
        importer in proptest::option::of(layer()),
    ) {
        let module = ModuleId::new("/app/src/module.tsx");
        let mut rules = RuleSet::with_directive_rules();
        rules.push(ClassificationRule::entry(module.clone(), entry_layer, "entries"));
        let classifier = ModuleClassifier::new(&rules, LayerId::Client);
        let classified = classifier.classify(&module, &[directive], importer).unwrap();
        prop_assert_eq!(classified.layer, directive.layer());

        rules.push(ClassificationRule::explicit_module(module.clone(), explicit_layer, "layers"));
        let classifier = ModuleClassifier::new(&rules, LayerId::Client);
        let classified = classifier.classify(&module, &[directive], importer).unwrap();
        prop_assert_eq!(classified.layer, explicit_layer);
    }

    /// PROPERTY: A module pinned to a layer is excluded from every other layer,
    /// and every layer resolves it with the owner's conditions.
    #[test]
    fn property_pinned_modules_are_exclusive(
        name in "[a-z]{1,8}",
        owner in layer(),
        asked in layer(),
    ) {
        let module = ModuleId::new(format!("/app/src/{}.tsx", name));
        let mut exclusions = ExclusionSets::new();
        exclusions.exclude_module_from_others(&module, owner);
        let mut rules = RuleSet::with_directive_rules();
        rules.push(ClassificationRule::explicit_module(module.clone(), owner, "layers"));

        prop_assert_eq!(exclusions.is_excluded(&module, asked), asked != owner);

        let engine = ResolutionOverride::new(&exclusions, &rules);
        prop_assert_eq!(engine.effective_layer(&module, asked), owner);
    }
}
