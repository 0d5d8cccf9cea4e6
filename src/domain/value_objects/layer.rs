//! Layer registry
//!
//! The three compilation layers and their resolve-condition sets. Exactly
//! three `Layer` records exist; they are statics and never change.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ConditionSet;

/// Identifies one of the three compilation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayerId {
    #[serde(rename = "rsc", alias = "react-server-components")]
    ServerComponents,
    #[serde(rename = "ssr", alias = "server-side-rendering")]
    ServerSideRendering,
    #[serde(rename = "client")]
    Client,
}

impl LayerId {
    /// All layers, in propagation order.
    pub const ALL: [LayerId; 3] = [
        LayerId::ServerComponents,
        LayerId::ServerSideRendering,
        LayerId::Client,
    ];

    /// The registry record for this layer.
    pub fn layer(self) -> &'static Layer {
        match self {
            LayerId::ServerComponents => &SERVER_COMPONENTS,
            LayerId::ServerSideRendering => &SERVER_SIDE_RENDERING,
            LayerId::Client => &CLIENT,
        }
    }

    /// Environment that compiles modules of this layer.
    pub fn environment(self) -> Environment {
        match self {
            LayerId::ServerComponents | LayerId::ServerSideRendering => Environment::Server,
            LayerId::Client => Environment::Client,
        }
    }

    /// Bundler-facing layer name.
    pub fn as_str(self) -> &'static str {
        match self {
            LayerId::ServerComponents => "react-server-components",
            LayerId::ServerSideRendering => "server-side-rendering",
            LayerId::Client => "client",
        }
    }

    /// Short name used in config files and manifests.
    pub fn short_name(self) -> &'static str {
        match self {
            LayerId::ServerComponents => "rsc",
            LayerId::ServerSideRendering => "ssr",
            LayerId::Client => "client",
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable layer record.
#[derive(Debug, PartialEq, Eq)]
pub struct Layer {
    id: LayerId,
    resolve_conditions: &'static [&'static str],
}

impl Layer {
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Condition tokens preferred when resolving under this layer.
    pub fn resolve_conditions(&self) -> &'static [&'static str] {
        self.resolve_conditions
    }
}

static SERVER_COMPONENTS: Layer = Layer {
    id: LayerId::ServerComponents,
    resolve_conditions: &["react-server"],
};

static SERVER_SIDE_RENDERING: Layer = Layer {
    id: LayerId::ServerSideRendering,
    resolve_conditions: &[],
};

static CLIENT: Layer = Layer {
    id: LayerId::Client,
    resolve_conditions: &["browser"],
};

/// A bundler environment: one compiler, one output target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Node target hosting the server-components and SSR layers
    Server,
    /// Browser target
    Client,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Environment::Server, Environment::Client];

    /// Layer given to entries that do not name one.
    pub fn default_layer(self) -> LayerId {
        match self {
            Environment::Server => LayerId::ServerComponents,
            Environment::Client => LayerId::Client,
        }
    }

    /// Conditions appended after any layer-specific tokens.
    pub fn default_conditions(self) -> ConditionSet {
        match self {
            Environment::Server => {
                ConditionSet::from_tokens(["node", "import", "require", "default"])
            }
            Environment::Client => {
                ConditionSet::from_tokens(["browser", "import", "module", "default"])
            }
        }
    }

    pub fn target(self) -> &'static str {
        match self {
            Environment::Server => "node",
            Environment::Client => "web",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Server => "server",
            Environment::Client => "client",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_one_record_per_layer() {
        for id in LayerId::ALL {
            assert_eq!(id.layer().id(), id);
        }
        assert!(std::ptr::eq(
            LayerId::Client.layer(),
            LayerId::Client.layer()
        ));
    }

    #[test]
    fn server_components_prefer_react_server() {
        assert_eq!(
            LayerId::ServerComponents.layer().resolve_conditions(),
            &["react-server"]
        );
        assert!(LayerId::ServerSideRendering
            .layer()
            .resolve_conditions()
            .is_empty());
    }

    #[test]
    fn layers_map_to_environments() {
        assert_eq!(LayerId::ServerComponents.environment(), Environment::Server);
        assert_eq!(LayerId::ServerSideRendering.environment(), Environment::Server);
        assert_eq!(LayerId::Client.environment(), Environment::Client);
        assert_eq!(Environment::Server.default_layer(), LayerId::ServerComponents);
    }

    #[test]
    fn layer_id_serde_accepts_short_and_long_names() {
        let short: LayerId = serde_json::from_str("\"ssr\"").unwrap();
        let long: LayerId = serde_json::from_str("\"server-side-rendering\"").unwrap();
        assert_eq!(short, LayerId::ServerSideRendering);
        assert_eq!(long, LayerId::ServerSideRendering);
        assert_eq!(
            serde_json::to_string(&LayerId::ServerComponents).unwrap(),
            "\"rsc\""
        );
    }
}
