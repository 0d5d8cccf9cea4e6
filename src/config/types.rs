//! Configuration type definitions

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::{LayerAssociation, RawEntry};
use crate::domain::value_objects::{Environment, LayerId};

use super::loader::{self, ConfigError, ConfigWarning};

/// Config file name looked up in the context directory.
pub const CONFIG_FILE: &str = "stratum.toml";

/// Development keeps the hot update machinery; production instantiates none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }

    pub fn is_development(self) -> bool {
        self == Mode::Development
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry specifiers for one layer.
///
/// Supports a single path, a list of paths, or a named table:
///   rsc = "./src/entry.rsc.tsx"
///   client = ["./src/a.tsx", "./src/b.tsx"]
///   client = { index = "./src/entry.client.tsx", admin = { import = "./src/admin.tsx" } }
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntrySpec {
    Single(String),
    List(Vec<String>),
    Named(BTreeMap<String, NamedEntry>),
}

/// One value of a named entry table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NamedEntry {
    Path(String),
    Paths(Vec<String>),
    Detailed {
        import: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer: Option<LayerId>,
    },
}

/// A configured entry before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryItem {
    pub name: String,
    pub specifier: String,
    pub layer: Option<LayerId>,
}

impl EntryItem {
    fn new(name: &str, specifier: &str, layer: Option<LayerId>) -> Self {
        Self {
            name: name.to_string(),
            specifier: specifier.to_string(),
            layer,
        }
    }
}

impl EntrySpec {
    /// Flatten to entries; unnamed forms use `index`.
    pub fn items(&self) -> Vec<EntryItem> {
        match self {
            EntrySpec::Single(specifier) => {
                vec![EntryItem::new(DEFAULT_ENTRY_NAME, specifier, None)]
            }
            EntrySpec::List(specifiers) => specifiers
                .iter()
                .map(|specifier| EntryItem::new(DEFAULT_ENTRY_NAME, specifier, None))
                .collect(),
            EntrySpec::Named(map) => map
                .iter()
                .flat_map(|(name, entry)| match entry {
                    NamedEntry::Path(specifier) => vec![EntryItem::new(name, specifier, None)],
                    NamedEntry::Paths(specifiers) => specifiers
                        .iter()
                        .map(|specifier| EntryItem::new(name, specifier, None))
                        .collect(),
                    NamedEntry::Detailed { import, layer } => {
                        vec![EntryItem::new(name, import, *layer)]
                    }
                })
                .collect(),
        }
    }
}

const DEFAULT_ENTRY_NAME: &str = "index";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntriesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsc: Option<EntrySpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssr: Option<EntrySpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<EntrySpec>,
}

/// A module predicate in `[layers]`. A plain string is a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatcherSpec {
    Path(String),
    Glob { glob: String },
    Regex { regex: String },
}

/// One matcher or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatcherList {
    One(MatcherSpec),
    Many(Vec<MatcherSpec>),
}

impl MatcherList {
    pub fn iter(&self) -> impl Iterator<Item = &MatcherSpec> {
        match self {
            MatcherList::One(spec) => std::slice::from_ref(spec).iter(),
            MatcherList::Many(specs) => specs.iter(),
        }
    }
}

/// Explicit layer associations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayersConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsc: Option<MatcherList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssr: Option<MatcherList>,
}

/// Dev server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_context() -> PathBuf {
    PathBuf::from(".")
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mode: Mode,

    /// Build context directory, relative to the config file
    #[serde(default = "default_context")]
    pub context: PathBuf,

    #[serde(default)]
    pub entries: EntriesConfig,

    #[serde(default)]
    pub layers: LayersConfig,

    #[serde(default)]
    pub dev: DevConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            context: default_context(),
            entries: EntriesConfig::default(),
            layers: LayersConfig::default(),
            dev: DevConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::load_with_warnings(path)?.0)
    }

    /// Load configuration and collect unknown-key warnings.
    pub fn load_with_warnings(path: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_with_warnings(path)
    }

    /// Load `stratum.toml` from `dir` if present, defaults otherwise;
    /// environment overrides apply either way.
    pub fn load_or_default(dir: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_or_default(dir)
    }

    /// Build context resolved against the directory holding the config.
    pub fn context_dir(&self, config_dir: &Path) -> PathBuf {
        let joined = if self.context.is_absolute() {
            self.context.clone()
        } else {
            config_dir.join(&self.context)
        };
        joined.canonicalize().unwrap_or(joined)
    }

    /// Configured entries, server environment first.
    ///
    /// `entries.rsc` always compiles in the server-components layer, whatever
    /// layer it names. `entries.client` takes its named layer or the client
    /// default. `entries.ssr` is not a root: it only pins its module (see
    /// [`Config::layer_associations`]) and is reached through RSC imports.
    pub fn raw_entries(&self) -> Vec<RawEntry> {
        let mut raw = Vec::new();
        if let Some(spec) = &self.entries.rsc {
            for item in spec.items() {
                raw.push(
                    RawEntry::new(item.name, Environment::Server, item.specifier)
                        .with_layer(LayerId::ServerComponents),
                );
            }
        }
        if let Some(spec) = &self.entries.client {
            for item in spec.items() {
                let entry = RawEntry::new(item.name, Environment::Client, item.specifier);
                raw.push(match item.layer {
                    Some(layer) => entry.with_layer(layer),
                    None => entry,
                });
            }
        }
        raw
    }

    /// Explicit layer associations: SSR entries pin their module, then every
    /// `[layers]` matcher in file order.
    pub fn layer_associations(&self) -> Vec<LayerAssociation> {
        let mut associations = Vec::new();
        if let Some(spec) = &self.entries.ssr {
            for item in spec.items() {
                associations.push(LayerAssociation::specifier(
                    LayerId::ServerSideRendering,
                    item.specifier,
                    "entries.ssr",
                ));
            }
        }

        let layers = [
            (LayerId::ServerComponents, &self.layers.rsc),
            (LayerId::ServerSideRendering, &self.layers.ssr),
        ];
        for (layer, list) in layers {
            let Some(list) = list else { continue };
            let origin = format!("layers.{}", layer.short_name());
            for spec in list.iter() {
                associations.push(match spec {
                    MatcherSpec::Path(path) => LayerAssociation::specifier(layer, path, &origin),
                    MatcherSpec::Glob { glob } => LayerAssociation::glob(layer, glob, &origin),
                    MatcherSpec::Regex { regex } => LayerAssociation::regex(layer, regex, &origin),
                });
            }
        }
        associations
    }
}
