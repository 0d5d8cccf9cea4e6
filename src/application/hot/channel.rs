//! Layer-aware change propagation
//!
//! Maps changed files to the layers they compile in and decides between
//! incremental updates and a full reload. Signals go out over a broadcast
//! channel to every connected session.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info};

use super::{HotSignal, RuntimeSession, UpdateEvent, UpdateKind, SERVER_COMPONENTS_UPDATED_MARKER};
use crate::application::router::BundleInvalidator;
use crate::domain::entities::BuildManifest;
use crate::domain::value_objects::{Environment, LayerId, ModuleId};

/// Signals buffered per session before it lags.
pub const CHANNEL_CAPACITY: usize = 64;

pub struct HotUpdateChannel {
    sender: broadcast::Sender<HotSignal>,
    manifest: BuildManifest,
    bundle: Option<Arc<dyn BundleInvalidator>>,
}

impl HotUpdateChannel {
    pub fn new(manifest: BuildManifest) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            manifest,
            bundle: None,
        }
    }

    /// Invalidate `bundle` whenever server code changes.
    pub fn with_bundle(mut self, bundle: Arc<dyn BundleInvalidator>) -> Self {
        self.bundle = Some(bundle);
        self
    }

    pub fn manifest(&self) -> &BuildManifest {
        &self.manifest
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HotSignal> {
        self.sender.subscribe()
    }

    /// A new runtime session connected to this channel.
    pub fn session(&self) -> RuntimeSession {
        RuntimeSession::new(self.subscribe())
    }

    /// Propagate a change set against the rebuilt manifest.
    ///
    /// Returns the signals sent, in layer order.
    pub fn apply(&mut self, changed: &[PathBuf], next: BuildManifest) -> Vec<HotSignal> {
        let previous = std::mem::replace(&mut self.manifest, next);
        let next = &self.manifest;

        if previous.shape != next.shape {
            let reason = shape_change_reason(&previous, next);
            info!(reason = %reason, "entry shape changed, full reload");
            self.invalidate_bundle();
            let signal = HotSignal::FullReload { reason };
            self.send(signal.clone());
            return vec![signal];
        }

        let changed: Vec<ModuleId> = changed
            .iter()
            .map(|path| ModuleId::new(std::fs::canonicalize(path).unwrap_or_else(|_| path.clone())))
            .collect();

        let mut signals = Vec::new();
        for layer in LayerId::ALL {
            let modules: Vec<ModuleId> = changed
                .iter()
                .filter(|id| {
                    next.layers_of(id).contains(&layer) || previous.layers_of(id).contains(&layer)
                })
                .cloned()
                .collect();
            if modules.is_empty() {
                continue;
            }

            let kind = match layer {
                LayerId::ServerComponents => UpdateKind::Accepted,
                LayerId::ServerSideRendering => UpdateKind::Invalidated,
                LayerId::Client => UpdateKind::Accepted,
            };
            signals.push(HotSignal::Update(UpdateEvent {
                affected_layer: layer,
                kind,
                modules,
            }));
        }

        if signals.is_empty() {
            debug!(files = changed.len(), "changes outside the module graph ignored");
            return signals;
        }

        if signals
            .iter()
            .any(|signal| signal.layer().map(LayerId::environment) == Some(Environment::Server))
        {
            self.invalidate_bundle();
        }
        for signal in &signals {
            if signal.layer() == Some(LayerId::ServerComponents) {
                info!("{}", SERVER_COMPONENTS_UPDATED_MARKER);
            }
            self.send(signal.clone());
        }
        signals
    }

    fn invalidate_bundle(&self) {
        if let Some(bundle) = &self.bundle {
            bundle.invalidate();
        }
    }

    fn send(&self, signal: HotSignal) {
        // No connected sessions is not an error.
        if let Err(err) = self.sender.send(signal) {
            debug!(signal = ?err.0, "no sessions connected");
        }
    }
}

fn shape_change_reason(previous: &BuildManifest, next: &BuildManifest) -> String {
    let before = server_entries(previous);
    let after = server_entries(next);
    if let Some(id) = after.difference(&before).next() {
        return format!("server entry added: {}", id);
    }
    if let Some(id) = before.difference(&after).next() {
        return format!("server entry removed: {}", id);
    }
    if references(previous) != references(next) {
        return "module references changed".to_string();
    }
    "entries changed".to_string()
}

fn server_entries(manifest: &BuildManifest) -> BTreeSet<&ModuleId> {
    manifest
        .environments
        .values()
        .flat_map(|env| env.server_entries.iter())
        .collect()
}

fn references(manifest: &BuildManifest) -> BTreeSet<&ModuleId> {
    manifest
        .environments
        .values()
        .flat_map(|env| env.client_references.iter().chain(&env.server_references))
        .collect()
}
