//! Lazily loaded server-components bundle
//!
//! The bundle is loaded on the first matching request and shared by every
//! request after it. Loading is single-flight: concurrent first requests
//! wait on the same load.
//!
//! ```text
//! request A ─┐
//! request B ─┼──► BundleSlot ──(one load)──► BundleLoader
//! request C ─┘        │
//!                     ▼
//!               Arc<Bundle> shared by A, B, C
//! ```
//!
//! Invalidation bumps a generation counter without taking the lock. A load
//! is installed tagged with the generation it started under. A load that
//! completes after an invalidation still serves the request that started
//! it; every request that takes the lock afterwards, including those already
//! queued behind the load, sees the stale tag and loads again.

use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use http::Request;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{BundleResponse, LoadError, RenderError, RouteParams};

/// The compiled server-components bundle's request handler.
pub trait ServerBundle: Send + Sync + 'static {
    fn handle(
        &self,
        request: &Request<Bytes>,
        params: &RouteParams,
    ) -> impl Future<Output = Result<BundleResponse, RenderError>> + Send;
}

/// Produces a fresh bundle, e.g. by importing the latest compiled output.
pub trait BundleLoader: Send + Sync + 'static {
    type Bundle: ServerBundle;

    fn load(&self) -> impl Future<Output = Result<Self::Bundle, LoadError>> + Send;
}

/// Invalidation handle the hot-update channel holds.
pub trait BundleInvalidator: Send + Sync {
    /// Mark the loaded bundle stale; returns the new generation.
    fn invalidate(&self) -> u64;
}

struct Loaded<B> {
    bundle: Arc<B>,
    generation: u64,
}

pub struct BundleSlot<L: BundleLoader> {
    loader: L,
    slot: Mutex<Option<Loaded<L::Bundle>>>,
    generation: AtomicU64,
    loads: AtomicUsize,
}

impl<L: BundleLoader> BundleSlot<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            slot: Mutex::new(None),
            generation: AtomicU64::new(0),
            loads: AtomicUsize::new(0),
        }
    }

    /// The current bundle, loading it if absent or stale.
    pub async fn get(&self) -> Result<Arc<L::Bundle>, LoadError> {
        let mut slot = self.slot.lock().await;
        let current = self.generation.load(Ordering::Acquire);

        if let Some(loaded) = slot.as_ref() {
            if loaded.generation == current {
                return Ok(Arc::clone(&loaded.bundle));
            }
            debug!(
                loaded = loaded.generation,
                current, "bundle is stale, reloading"
            );
        }

        let load_number = self.loads.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(generation = current, load_number, "loading server bundle");

        match self.loader.load().await {
            Ok(bundle) => {
                let bundle = Arc::new(bundle);
                *slot = Some(Loaded {
                    bundle: Arc::clone(&bundle),
                    generation: current,
                });
                info!(generation = current, "server bundle loaded");
                Ok(bundle)
            }
            Err(err) => {
                *slot = None;
                Err(err)
            }
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Number of loads started so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Acquire)
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

impl<L: BundleLoader> BundleInvalidator for BundleSlot<L> {
    fn invalidate(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(generation, "server bundle invalidated");
        generation
    }
}
