//! Build driver
//!
//! Runs the layer planning stages in order:
//! `Synthesize -> Classify -> Override Resolution -> Emit`.
//!
//! Synthesis runs once. Classification and resolution override happen while
//! the two environment pipelines walk the module graph; the server and
//! client walks run concurrently and exchange boundary references in
//! top-up passes until nothing new is discovered. Emit assembles the
//! `BuildManifest`.

mod pipeline;


use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Config;
use crate::domain::entities::{
    BuildManifest, EnvironmentManifest, LayerAssociation, RawEntry,
};
use crate::domain::ports::{ModuleResolver, ModuleSource};
use crate::domain::services::{
    EntrySynthesizer, ModuleClassifier, ResolutionOverride, SynthesizeError, Synthesis,
};
use crate::domain::value_objects::{Environment, LayerId, ModuleId};
use crate::error::StratumResult;

pub use pipeline::{EnvironmentPipeline, GraphState};

/// What the driver plans from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildInput {
    /// Build context directory relative specifiers resolve from
    pub context: PathBuf,
    pub raw_entries: Vec<RawEntry>,
    pub associations: Vec<LayerAssociation>,
}

impl BuildInput {
    pub fn new(context: impl Into<PathBuf>) -> Self {
        Self {
            context: context.into(),
            ..Self::default()
        }
    }

    /// Entries and associations from a loaded config.
    ///
    /// `config_dir` is the directory containing the config file; the
    /// configured `context` is relative to it.
    pub fn from_config(config: &Config, config_dir: &Path) -> Self {
        Self {
            context: config.context_dir(config_dir),
            raw_entries: config.raw_entries(),
            associations: config.layer_associations(),
        }
    }

    pub fn with_entry(mut self, entry: RawEntry) -> Self {
        self.raw_entries.push(entry);
        self
    }

    pub fn with_association(mut self, association: LayerAssociation) -> Self {
        self.associations.push(association);
        self
    }
}

/// Owns the ordered build stages.
pub struct BuildDriver<R, S> {
    resolver: R,
    source: S,
    input: BuildInput,
}

impl<R: ModuleResolver, S: ModuleSource> BuildDriver<R, S> {
    pub fn new(resolver: R, source: S, input: BuildInput) -> Self {
        Self {
            resolver,
            source,
            input,
        }
    }

    pub fn input(&self) -> &BuildInput {
        &self.input
    }

    /// Stage 1: resolve entries and associations into rules and exclusions.
    pub fn synthesize(&self) -> Result<Synthesis, SynthesizeError> {
        EntrySynthesizer::new(&self.resolver, self.input.context.clone())
            .synthesize(&self.input.raw_entries, &self.input.associations)
    }

    /// Run every stage and emit the manifest.
    pub fn run(&self) -> StratumResult<BuildManifest> {
        let synthesis = self.synthesize()?;
        debug!(
            rules = synthesis.rules.len(),
            ssr = synthesis.has_ssr_layer(),
            "entries synthesized"
        );

        let override_engine = ResolutionOverride::new(&synthesis.exclusions, &synthesis.rules);
        let mut server = EnvironmentPipeline::new(
            Environment::Server,
            ModuleClassifier::new(&synthesis.rules, Environment::Server.default_layer()),
            override_engine,
            &self.resolver,
            &self.source,
        );
        let mut client = EnvironmentPipeline::new(
            Environment::Client,
            ModuleClassifier::new(&synthesis.rules, Environment::Client.default_layer()),
            override_engine,
            &self.resolver,
            &self.source,
        );

        let server_roots = entry_roots(&synthesis, Environment::Server);
        let client_roots = entry_roots(&synthesis, Environment::Client);

        let (server_result, client_result) = std::thread::scope(|scope| {
            let server_walk = scope.spawn(|| server.walk(server_roots));
            let client_walk = scope.spawn(|| client.walk(client_roots));
            (join(server_walk), join(client_walk))
        });
        server_result?;
        client_result?;

        self.top_up(&synthesis, &mut server, &mut client)?;

        let manifest = emit(&synthesis, server.into_state(), client.into_state());
        info!(
            modules = manifest.module_count(),
            warnings = manifest.warnings.len(),
            shape = %manifest.shape,
            "build planned"
        );
        Ok(manifest)
    }

    /// Walk boundary references discovered by the other environment until
    /// neither side finds anything new.
    fn top_up(
        &self,
        synthesis: &Synthesis,
        server: &mut EnvironmentPipeline<'_, R, S>,
        client: &mut EnvironmentPipeline<'_, R, S>,
    ) -> StratumResult<()> {
        let mut seen_client_refs: BTreeSet<ModuleId> = BTreeSet::new();
        let mut seen_server_refs: BTreeSet<ModuleId> = BTreeSet::new();

        loop {
            let client_refs: Vec<ModuleId> = server
                .state()
                .client_references
                .iter()
                .filter(|id| !seen_client_refs.contains(*id))
                .cloned()
                .collect();
            let server_refs: Vec<ModuleId> = client
                .state()
                .server_references
                .iter()
                .filter(|id| !seen_server_refs.contains(*id))
                .cloned()
                .collect();

            if client_refs.is_empty() && server_refs.is_empty() {
                return Ok(());
            }
            debug!(
                client_refs = client_refs.len(),
                server_refs = server_refs.len(),
                "top-up pass"
            );

            // Client components compile for the browser and render on the
            // server in the SSR layer.
            let mut client_roots = Vec::new();
            let mut server_roots = Vec::new();
            for id in client_refs {
                if !synthesis.exclusions.is_excluded(&id, LayerId::Client) {
                    client_roots.push((id.clone(), LayerId::Client));
                }
                if !synthesis
                    .exclusions
                    .is_excluded(&id, LayerId::ServerSideRendering)
                {
                    server_roots.push((id.clone(), LayerId::ServerSideRendering));
                }
                seen_client_refs.insert(id);
            }
            for id in server_refs {
                server_roots.push((id.clone(), LayerId::ServerComponents));
                seen_server_refs.insert(id);
            }

            server.walk(server_roots)?;
            client.walk(client_roots)?;
        }
    }
}

fn entry_roots(synthesis: &Synthesis, environment: Environment) -> Vec<(ModuleId, LayerId)> {
    synthesis
        .entries_for(environment)
        .iter()
        .map(|entry| (entry.import.clone(), entry.layer))
        .collect()
}

fn join<T>(handle: std::thread::ScopedJoinHandle<'_, T>) -> T {
    match handle.join() {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Stage 4: assemble the manifest.
fn emit(synthesis: &Synthesis, server: GraphState, client: GraphState) -> BuildManifest {
    let mut warnings = Vec::new();
    let mut environments = BTreeMap::new();

    for (environment, state) in [(Environment::Server, server), (Environment::Client, client)] {
        warnings.extend(state.warnings);
        environments.insert(
            environment,
            EnvironmentManifest {
                entries: synthesis.entries_for(environment).to_vec(),
                modules: state.records,
                client_references: state.client_references,
                server_references: state.server_references,
                server_entries: state.server_entries,
            },
        );
    }

    BuildManifest::new(environments, warnings)
}
