//! Entry entity
//!
//! Entries are the only roots of a layer's compilation graph.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Environment, LayerId, ModuleId};

/// A resolved entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub import: ModuleId,
    pub layer: LayerId,
}

/// An entry as configured, before its specifier is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub environment: Environment,
    pub specifier: String,
    /// Explicit layer; `None` takes the environment default
    pub layer: Option<LayerId>,
}

impl RawEntry {
    pub fn new(
        name: impl Into<String>,
        environment: Environment,
        specifier: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            environment,
            specifier: specifier.into(),
            layer: None,
        }
    }

    pub fn with_layer(mut self, layer: LayerId) -> Self {
        self.layer = Some(layer);
        self
    }

    pub fn effective_layer(&self) -> LayerId {
        self.layer
            .unwrap_or_else(|| self.environment.default_layer())
    }
}

/// What an explicit layer association points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssociationTarget {
    /// A path or package specifier resolved to exactly one module
    Specifier(String),
    Glob(String),
    Regex(String),
}

/// Configuration that pins modules to a layer regardless of directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerAssociation {
    pub layer: LayerId,
    pub target: AssociationTarget,
    /// Config key the association came from (`entries.ssr`, `layers.ssr`)
    pub origin: String,
}

impl LayerAssociation {
    pub fn specifier(
        layer: LayerId,
        specifier: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            layer,
            target: AssociationTarget::Specifier(specifier.into()),
            origin: origin.into(),
        }
    }

    pub fn glob(layer: LayerId, pattern: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            layer,
            target: AssociationTarget::Glob(pattern.into()),
            origin: origin.into(),
        }
    }

    pub fn regex(layer: LayerId, pattern: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            layer,
            target: AssociationTarget::Regex(pattern.into()),
            origin: origin.into(),
        }
    }
}
