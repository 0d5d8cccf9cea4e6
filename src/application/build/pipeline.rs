//! Per-environment graph walk
//!
//! Classification and resolution override for one environment. A node is a
//! module in a layer; the same module may be compiled in several layers but
//! each pass assigns it exactly one.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use tracing::{debug, trace, warn};

use crate::domain::entities::ModuleRecord;
use crate::domain::ports::{ModuleResolver, ModuleSource, SourceModule};
use crate::domain::services::{ClassifyError, ModuleClassifier, ResolutionOverride};
use crate::domain::value_objects::{Directive, Environment, LayerId, ModuleId};

/// Everything one environment discovered.
#[derive(Debug, Default)]
pub struct GraphState {
    visited: HashSet<(ModuleId, LayerId)>,
    pub records: Vec<ModuleRecord>,
    pub client_references: BTreeSet<ModuleId>,
    pub server_references: BTreeSet<ModuleId>,
    pub server_entries: BTreeSet<ModuleId>,
    pub warnings: Vec<String>,
}

pub struct EnvironmentPipeline<'a, R, S> {
    environment: Environment,
    classifier: ModuleClassifier<'a>,
    override_engine: ResolutionOverride<'a>,
    resolver: &'a R,
    source: &'a S,
    sources: HashMap<ModuleId, Option<SourceModule>>,
    state: GraphState,
}

impl<'a, R: ModuleResolver, S: ModuleSource> EnvironmentPipeline<'a, R, S> {
    pub fn new(
        environment: Environment,
        classifier: ModuleClassifier<'a>,
        override_engine: ResolutionOverride<'a>,
        resolver: &'a R,
        source: &'a S,
    ) -> Self {
        Self {
            environment,
            classifier,
            override_engine,
            resolver,
            source,
            sources: HashMap::new(),
            state: GraphState::default(),
        }
    }

    pub fn state(&self) -> &GraphState {
        &self.state
    }

    pub fn into_state(self) -> GraphState {
        self.state
    }

    /// Breadth-first walk from `roots`, each already tagged with its layer.
    pub fn walk(&mut self, roots: Vec<(ModuleId, LayerId)>) -> Result<(), ClassifyError> {
        let mut queue: VecDeque<(ModuleId, LayerId)> = VecDeque::new();
        for root in roots {
            if self.state.visited.insert(root.clone()) {
                queue.push_back(root);
            }
        }

        while let Some((module, layer)) = queue.pop_front() {
            let Some(source) = self.load(&module) else {
                continue;
            };

            for unknown in &source.unrecognized {
                debug!(module = %module, directive = %unknown, "unrecognized directive");
            }
            if self.environment == Environment::Server
                && source.has_directive(Directive::ServerEntry)
            {
                self.state.server_entries.insert(module.clone());
            }

            let conditions = self.override_engine.override_conditions(&module, layer);
            trace!(module = %module, layer = %layer, conditions = %conditions, "compiling");

            for specifier in &source.imports {
                if specifier.starts_with("node:") {
                    continue;
                }
                let resolved = self.resolver.resolve(module.dir(), specifier, &conditions);
                let Some(target) = resolved else {
                    let message = format!(
                        "Module not found: Can't resolve '{}' in '{}'",
                        specifier,
                        module.dir().display()
                    );
                    warn!(environment = %self.environment, layer = %layer, "{}", message);
                    self.state.warnings.push(message);
                    continue;
                };

                let directives = self
                    .load(&target)
                    .map(|target_source| target_source.directives)
                    .unwrap_or_default();
                let classified = self
                    .classifier
                    .classify(&target, &directives, Some(layer))?
                    .layer;

                let crossing = self.crossing(&module, layer, &target, classified, &directives);
                let Some(next_layer) = crossing else {
                    continue;
                };
                if self.state.visited.insert((target.clone(), next_layer)) {
                    queue.push_back((target, next_layer));
                }
            }

            self.state.records.push(ModuleRecord {
                id: module,
                layer,
                directives: source.directives,
                conditions,
            });
        }

        Ok(())
    }

    /// Layer `target` compiles in when imported from `importer` under
    /// `layer`, or `None` when the edge is a boundary reference.
    fn crossing(
        &mut self,
        importer: &ModuleId,
        layer: LayerId,
        target: &ModuleId,
        classified: LayerId,
        directives: &[Directive],
    ) -> Option<LayerId> {
        if classified.environment() == self.environment {
            return Some(classified);
        }

        match self.environment {
            // SSR renders client components in place.
            Environment::Server if layer == LayerId::ServerSideRendering => Some(layer),
            Environment::Server => {
                debug!(importer = %importer, reference = %target, "client reference");
                self.state.client_references.insert(target.clone());
                None
            }
            Environment::Client if directives.contains(&Directive::ServerCallable) => {
                debug!(importer = %importer, reference = %target, "server reference");
                self.state.server_references.insert(target.clone());
                None
            }
            Environment::Client => {
                let message = format!(
                    "{} imports {}, which compiles in {} and cannot be bundled for the client",
                    importer, target, classified
                );
                warn!("{}", message);
                self.state.warnings.push(message);
                None
            }
        }
    }

    fn load(&mut self, module: &ModuleId) -> Option<SourceModule> {
        if let Some(cached) = self.sources.get(module) {
            return cached.clone();
        }

        let loaded = match self.source.load(module) {
            Ok(source) => Some(source),
            Err(err) => {
                warn!(module = %module, error = %err, "failed to load module");
                self.state.warnings.push(err.to_string());
                None
            }
        };
        self.sources.insert(module.clone(), loaded.clone());
        loaded
    }
}
