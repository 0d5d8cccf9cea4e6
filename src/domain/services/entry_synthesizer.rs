//! Entry synthesizer
//!
//! Runs once at configuration time. Resolves configured entry specifiers and
//! explicit layer associations to canonical identities, tags each with its
//! layer, registers classification rules and fills the per-layer exclusion
//! sets.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::entities::{
    AssociationTarget, ClassificationRule, Entry, ExclusionSets, LayerAssociation, RawEntry,
    RuleSet,
};
use crate::domain::ports::ModuleResolver;
use crate::domain::services::resolution_override::layer_conditions;
use crate::domain::value_objects::{Environment, LayerId, Matcher, MatcherError, ModuleId};

#[derive(Debug, thiserror::Error)]
pub enum SynthesizeError {
    #[error("Can't resolve '{specifier}' in '{}'", context.display())]
    Unresolved { specifier: String, context: PathBuf },

    #[error(transparent)]
    InvalidMatcher(#[from] MatcherError),

    #[error(
        "{module} is configured for {first_layer} by {first} and for {second_layer} by {second}"
    )]
    Conflict {
        module: ModuleId,
        first: String,
        first_layer: LayerId,
        second: String,
        second_layer: LayerId,
    },

    #[error(
        "{environment} entry '{name}' is configured for both {first_layer} and {second_layer}"
    )]
    DuplicateEntry {
        environment: Environment,
        name: String,
        first_layer: LayerId,
        second_layer: LayerId,
    },
}

/// Output of entry synthesis.
#[derive(Debug, Clone, Default)]
pub struct Synthesis {
    pub entries: BTreeMap<Environment, Vec<Entry>>,
    pub exclusions: ExclusionSets,
    pub rules: RuleSet,
}

impl Synthesis {
    pub fn entries_for(&self, environment: Environment) -> &[Entry] {
        self.entries
            .get(&environment)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether anything pins modules to the server-side rendering layer.
    pub fn has_ssr_layer(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.is_explicit() && rule.layer == LayerId::ServerSideRendering)
            || self
                .entries_for(Environment::Server)
                .iter()
                .any(|entry| entry.layer == LayerId::ServerSideRendering)
    }
}

pub struct EntrySynthesizer<'a, R: ModuleResolver + ?Sized> {
    resolver: &'a R,
    context: PathBuf,
}

impl<'a, R: ModuleResolver + ?Sized> EntrySynthesizer<'a, R> {
    /// `context` is the build context directory relative specifiers resolve from.
    pub fn new(resolver: &'a R, context: impl Into<PathBuf>) -> Self {
        Self {
            resolver,
            context: context.into(),
        }
    }

    pub fn context(&self) -> &Path {
        &self.context
    }

    pub fn synthesize(
        &self,
        raw_entries: &[RawEntry],
        associations: &[LayerAssociation],
    ) -> Result<Synthesis, SynthesizeError> {
        let mut synthesis = Synthesis {
            rules: RuleSet::with_directive_rules(),
            ..Synthesis::default()
        };

        let mut pinned: HashMap<ModuleId, (LayerId, String)> = HashMap::new();
        for association in associations {
            self.register_association(association, &mut synthesis, &mut pinned)?;
        }

        let mut configured: HashMap<ModuleId, (LayerId, String)> = HashMap::new();
        // Several imports may share one entry name, but only within one layer.
        let mut names: HashMap<(Environment, &str), LayerId> = HashMap::new();
        for raw in raw_entries {
            let layer = raw.effective_layer();
            let first_layer = *names
                .entry((raw.environment, raw.name.as_str()))
                .or_insert(layer);
            if first_layer != layer {
                return Err(SynthesizeError::DuplicateEntry {
                    environment: raw.environment,
                    name: raw.name.clone(),
                    first_layer,
                    second_layer: layer,
                });
            }
            let origin = format!("entries.{}", layer.short_name());
            let import = self.resolve_specifier(&raw.specifier, layer)?;

            if let Some((pinned_layer, first)) = pinned.get(&import) {
                if *pinned_layer != layer {
                    return Err(SynthesizeError::Conflict {
                        module: import,
                        first: first.clone(),
                        first_layer: *pinned_layer,
                        second: origin,
                        second_layer: layer,
                    });
                }
            }

            if let Some((first_layer, first)) = configured.get(&import) {
                if *first_layer != layer {
                    return Err(SynthesizeError::Conflict {
                        module: import,
                        first: first.clone(),
                        first_layer: *first_layer,
                        second: origin,
                        second_layer: layer,
                    });
                }
            } else {
                configured.insert(import.clone(), (layer, origin.clone()));
                synthesis
                    .rules
                    .push(ClassificationRule::entry(import.clone(), layer, origin));
            }

            debug!(name = %raw.name, import = %import, layer = %layer, "synthesized entry");
            synthesis
                .entries
                .entry(raw.environment)
                .or_default()
                .push(Entry {
                    name: raw.name.clone(),
                    import,
                    layer,
                });
        }

        Ok(synthesis)
    }

    fn register_association(
        &self,
        association: &LayerAssociation,
        synthesis: &mut Synthesis,
        pinned: &mut HashMap<ModuleId, (LayerId, String)>,
    ) -> Result<(), SynthesizeError> {
        let layer = association.layer;
        match &association.target {
            AssociationTarget::Specifier(specifier) => {
                let module = self.resolve_specifier(specifier, layer)?;
                if let Some((first_layer, first)) = pinned.get(&module) {
                    if *first_layer != layer {
                        return Err(SynthesizeError::Conflict {
                            module,
                            first: first.clone(),
                            first_layer: *first_layer,
                            second: association.origin.clone(),
                            second_layer: layer,
                        });
                    }
                    return Ok(());
                }

                debug!(
                    module = %module,
                    layer = %layer,
                    origin = %association.origin,
                    "pinned module"
                );
                synthesis.exclusions.exclude_module_from_others(&module, layer);
                synthesis.rules.push(ClassificationRule::explicit_module(
                    module.clone(),
                    layer,
                    association.origin.clone(),
                ));
                pinned.insert(module, (layer, association.origin.clone()));
            }
            AssociationTarget::Glob(pattern) => {
                let matcher = Matcher::glob(&self.context, pattern)?;
                self.register_matcher(matcher, association, synthesis);
            }
            AssociationTarget::Regex(pattern) => {
                let matcher = Matcher::regex(pattern)?;
                self.register_matcher(matcher, association, synthesis);
            }
        }
        Ok(())
    }

    fn register_matcher(
        &self,
        matcher: Matcher,
        association: &LayerAssociation,
        synthesis: &mut Synthesis,
    ) {
        debug!(
            matcher = %matcher,
            layer = %association.layer,
            origin = %association.origin,
            "pinned matcher"
        );
        synthesis
            .exclusions
            .exclude_matcher_from_others(&matcher, association.layer);
        synthesis.rules.push(ClassificationRule::explicit_matcher(
            matcher,
            association.layer,
            association.origin.clone(),
        ));
    }

    /// Absolute paths pass through unchanged; everything else goes through
    /// the resolver from the context directory.
    fn resolve_specifier(
        &self,
        specifier: &str,
        layer: LayerId,
    ) -> Result<ModuleId, SynthesizeError> {
        let path = Path::new(specifier);
        if path.is_absolute() {
            return Ok(ModuleId::new(path));
        }

        self.resolver
            .resolve(&self.context, specifier, &layer_conditions(layer))
            .ok_or_else(|| SynthesizeError::Unresolved {
                specifier: specifier.to_string(),
                context: self.context.clone(),
            })
    }
}
