//! Build manifest
//!
//! Output of the emit stage: per environment, which modules compile in which
//! layer and under which conditions, plus the asset/entry shape that decides
//! between incremental hot updates and a full reload.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::Entry;
use crate::domain::value_objects::{
    ConditionSet, ContentHash, Directive, Environment, LayerId, ModuleId,
};

/// A module compiled in one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleRecord {
    pub id: ModuleId,
    pub layer: LayerId,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
    /// Conditions the module's own imports resolve with
    pub conditions: ConditionSet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvironmentManifest {
    pub entries: Vec<Entry>,
    pub modules: Vec<ModuleRecord>,
    /// Client-directive modules reached from server code
    pub client_references: BTreeSet<ModuleId>,
    /// Server-layer modules reached from client code
    pub server_references: BTreeSet<ModuleId>,
    /// Modules carrying the server-entry directive (stylesheet emitted)
    pub server_entries: BTreeSet<ModuleId>,
}

impl EnvironmentManifest {
    pub fn module(&self, id: &ModuleId, layer: LayerId) -> Option<&ModuleRecord> {
        self.modules
            .iter()
            .find(|record| &record.id == id && record.layer == layer)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildManifest {
    pub environments: BTreeMap<Environment, EnvironmentManifest>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Fingerprint of the emitted entry/asset shape
    pub shape: ContentHash,
}

impl BuildManifest {
    /// Build a manifest and compute its shape fingerprint.
    pub fn new(
        environments: BTreeMap<Environment, EnvironmentManifest>,
        warnings: Vec<String>,
    ) -> Self {
        let shape = compute_shape(&environments);
        Self {
            environments,
            warnings,
            shape,
        }
    }

    pub fn environment(&self, environment: Environment) -> Option<&EnvironmentManifest> {
        self.environments.get(&environment)
    }

    /// Every layer `module` compiles in, across environments.
    pub fn layers_of(&self, module: &ModuleId) -> BTreeSet<LayerId> {
        self.environments
            .values()
            .flat_map(|env| env.modules.iter())
            .filter(|record| &record.id == module)
            .map(|record| record.layer)
            .collect()
    }

    /// Every record for `module`, across environments.
    pub fn records_of<'a>(
        &'a self,
        module: &'a ModuleId,
    ) -> impl Iterator<Item = &'a ModuleRecord> + 'a {
        self.environments
            .values()
            .flat_map(|env| env.modules.iter())
            .filter(move |record| &record.id == module)
    }

    pub fn module_count(&self) -> usize {
        self.environments.values().map(|env| env.modules.len()).sum()
    }

    pub fn contains(&self, module: &ModuleId) -> bool {
        self.records_of(module).next().is_some()
    }
}

fn compute_shape(environments: &BTreeMap<Environment, EnvironmentManifest>) -> ContentHash {
    let mut parts: Vec<String> = Vec::new();
    for (environment, manifest) in environments {
        parts.push(format!("env:{}", environment));
        for entry in &manifest.entries {
            parts.push(format!("entry:{}:{}:{}", entry.name, entry.import, entry.layer));
        }
        for id in &manifest.server_entries {
            parts.push(format!("server-entry:{}", id));
        }
        for id in &manifest.client_references {
            parts.push(format!("client-ref:{}", id));
        }
        for id in &manifest.server_references {
            parts.push(format!("server-ref:{}", id));
        }
    }
    ContentHash::from_parts(parts.iter().map(String::as_str))
}
