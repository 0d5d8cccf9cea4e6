//! Watch event types and options

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::application::build::BuildInput;
use crate::application::hot::{HotSignal, UpdateKind, SERVER_COMPONENTS_UPDATED_MARKER};
use crate::application::router::BundleInvalidator;
use crate::domain::value_objects::LayerId;

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Watch options
#[derive(Clone)]
pub struct WatchOptions {
    /// Entries and associations to plan from; `input.context` is watched
    pub input: BuildInput,
    /// Quiet period before a batch of changes is rebuilt
    pub debounce: Duration,
    /// Bundle invalidated on server-side changes
    pub bundle: Option<Arc<dyn BundleInvalidator>>,
}

impl WatchOptions {
    pub fn new(input: BuildInput) -> Self {
        Self {
            input,
            debounce: Duration::from_millis(DEBOUNCE_MS),
            bundle: None,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_bundle(mut self, bundle: Arc<dyn BundleInvalidator>) -> Self {
        self.bundle = Some(bundle);
        self
    }
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    WatchStarted { context: String, debounce_ms: u64 },
    FileChanged { path: String },
    BuildStarted,
    BuildComplete {
        modules: usize,
        warnings: usize,
        shape: String,
    },
    HotUpdate {
        layer: LayerId,
        kind: UpdateKind,
        modules: Vec<String>,
    },
    FullReload { reason: String },
    Error { message: String },
    Shutdown,
}

impl WatchEvent {
    /// Convert to JSON string with "command": "watch" field included.
    /// Server-components updates also carry the hot-update `marker`.
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
            if self.is_server_components_update() {
                obj.insert(
                    "marker".to_string(),
                    serde_json::json!(SERVER_COMPONENTS_UPDATED_MARKER),
                );
            }
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Whether this completes a server-components acceptance cycle.
    pub fn is_server_components_update(&self) -> bool {
        matches!(
            self,
            WatchEvent::HotUpdate {
                layer: LayerId::ServerComponents,
                kind: UpdateKind::Accepted,
                ..
            }
        )
    }
}

impl From<&HotSignal> for WatchEvent {
    fn from(signal: &HotSignal) -> Self {
        match signal {
            HotSignal::Update(event) => WatchEvent::HotUpdate {
                layer: event.affected_layer,
                kind: event.kind,
                modules: event.modules.iter().map(|id| id.to_string()).collect(),
            },
            HotSignal::FullReload { reason } => WatchEvent::FullReload {
                reason: reason.clone(),
            },
        }
    }
}

/// Watcher state for debouncing
#[derive(Debug)]
pub struct WatcherState {
    pending_changes: HashSet<PathBuf>,
    last_change: Option<Instant>,
    debounce: Duration,
}

impl Default for WatcherState {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEBOUNCE_MS))
    }
}

impl WatcherState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            pending_changes: HashSet::new(),
            last_change: None,
            debounce,
        }
    }

    /// Add a file change to pending changes
    pub fn add_change(&mut self, path: PathBuf) {
        self.pending_changes.insert(path);
        self.last_change = Some(Instant::now());
    }

    /// Check if debounce period has passed and we have pending changes
    pub fn should_rebuild(&self) -> bool {
        match self.last_change {
            Some(last) => !self.pending_changes.is_empty() && last.elapsed() >= self.debounce,
            None => false,
        }
    }

    /// Take all pending changes in path order, resetting state
    pub fn take_changes(&mut self) -> Vec<PathBuf> {
        let mut changes: Vec<_> = self.pending_changes.drain().collect();
        changes.sort();
        self.last_change = None;
        changes
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_changes.is_empty()
    }
}
