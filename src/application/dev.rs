//! Development runtime
//!
//! Wires the router, the bundle slot and, in development mode only, the hot
//! update channel. Production builds get a router and nothing else.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use super::hot::{HotSignal, HotUpdateChannel, RuntimeSession};
use super::router::{default_routes, BundleInvalidator, BundleLoader, BundleSlot, Router};
use crate::config::Mode;
use crate::domain::entities::BuildManifest;
use crate::error::{StratumError, StratumResult};

pub struct DevRuntime<L: BundleLoader> {
    mode: Mode,
    router: Arc<Router<L>>,
    hot: Option<HotUpdateChannel>,
}

impl<L: BundleLoader> DevRuntime<L> {
    pub fn new(mode: Mode, loader: L, manifest: BuildManifest) -> Self {
        let slot = Arc::new(BundleSlot::new(loader));
        let router = Arc::new(Router::new(Arc::clone(&slot)));

        let hot = match mode {
            Mode::Development => {
                let invalidator: Arc<dyn BundleInvalidator> = slot;
                Some(HotUpdateChannel::new(manifest).with_bundle(invalidator))
            }
            Mode::Production => None,
        };
        info!(mode = %mode, hot_updates = hot.is_some(), "runtime ready");

        Self { mode, router, hot }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn router(&self) -> &Arc<Router<L>> {
        &self.router
    }

    pub fn hot(&self) -> Option<&HotUpdateChannel> {
        self.hot.as_ref()
    }

    /// Connect a browser runtime to hot updates.
    pub fn connect(&self) -> StratumResult<RuntimeSession> {
        self.hot
            .as_ref()
            .map(HotUpdateChannel::session)
            .ok_or(StratumError::HotUpdatesDisabled)
    }

    /// Propagate a rebuild. A full reload also rebuilds the route table.
    pub async fn apply_changes(
        &mut self,
        changed: &[PathBuf],
        next: BuildManifest,
    ) -> StratumResult<Vec<HotSignal>> {
        let hot = self.hot.as_mut().ok_or(StratumError::HotUpdatesDisabled)?;
        let signals = hot.apply(changed, next);
        if signals.iter().any(HotSignal::is_full_reload) {
            self.router.replace_routes(default_routes()).await;
        }
        Ok(signals)
    }
}
