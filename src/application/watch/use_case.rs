//! Watch Use Case implementation

use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::application::build::BuildDriver;
use crate::application::hot::HotUpdateChannel;
use crate::domain::entities::BuildManifest;
use crate::domain::ports::{ModuleResolver, ModuleSource};
use crate::error::StratumResult;

use super::cache::{ContentChange, ContentHashes};
use super::event::{WatchEvent, WatchOptions, WatcherState};

/// Events notify sends for files that already existed are drained for this long.
const STARTUP_COOLDOWN: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Directories whose churn never affects the plan.
const IGNORED_DIRS: &[&str] = &["node_modules", ".git", "dist"];

/// Watch Use Case
///
/// Rebuilds the layer plan on every debounced batch of changes and feeds
/// the diff to the hot update channel. Entry point of `stratum watch`.
pub struct DevWatchUseCase<R, S> {
    options: WatchOptions,
    resolver: R,
    source: S,
}

impl<R: ModuleResolver, S: ModuleSource> DevWatchUseCase<R, S> {
    pub fn new(options: WatchOptions, resolver: R, source: S) -> Self {
        Self {
            options,
            resolver,
            source,
        }
    }

    /// Start watching (blocking)
    ///
    /// Blocks until `running` is cleared. The initial build must succeed;
    /// later rebuild failures are reported as `Error` events and watching
    /// continues.
    pub fn start<F>(&self, running: Arc<AtomicBool>, on_event: F) -> StratumResult<()>
    where
        F: Fn(WatchEvent),
    {
        let context = &self.options.input.context;
        on_event(WatchEvent::WatchStarted {
            context: context.display().to_string(),
            debounce_ms: self.options.debounce.as_millis() as u64,
        });

        let mut channel = self.initial_build(&on_event)?;
        let mut hashes = ContentHashes::seed(channel.manifest());

        let (tx, rx) = std::sync::mpsc::channel::<PathBuf>();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    for path in event.paths {
                        let _ = tx.send(path);
                    }
                }
                Err(err) => warn!(error = %err, "watch error"),
            },
            Config::default(),
        )?;
        watcher.watch(context, RecursiveMode::Recursive)?;

        let cooldown_end = Instant::now() + STARTUP_COOLDOWN;
        while Instant::now() < cooldown_end {
            let _ = rx.recv_timeout(POLL_INTERVAL);
        }

        let mut state = WatcherState::new(self.options.debounce);
        while running.load(Ordering::SeqCst) {
            if let Ok(path) = rx.recv_timeout(POLL_INTERVAL) {
                if !is_ignored(context, &path) {
                    let path = path.canonicalize().unwrap_or(path);
                    match hashes.observe(&path) {
                        ContentChange::Modified | ContentChange::Removed => state.add_change(path),
                        ContentChange::Unchanged => {}
                    }
                }
            }

            if state.should_rebuild() {
                let changes = state.take_changes();
                for path in &changes {
                    on_event(WatchEvent::FileChanged {
                        path: path.display().to_string(),
                    });
                }
                self.process_changes(&changes, &mut channel, &on_event);
            }
        }

        on_event(WatchEvent::Shutdown);
        Ok(())
    }

    /// Build the first plan and open the hot update channel on it.
    pub fn initial_build(&self, on_event: &impl Fn(WatchEvent)) -> StratumResult<HotUpdateChannel> {
        on_event(WatchEvent::BuildStarted);
        let manifest = match self.driver().run() {
            Ok(manifest) => manifest,
            Err(err) => {
                on_event(WatchEvent::Error {
                    message: err.to_string(),
                });
                return Err(err);
            }
        };
        on_event(build_complete(&manifest));

        let channel = HotUpdateChannel::new(manifest);
        Ok(match &self.options.bundle {
            Some(bundle) => channel.with_bundle(Arc::clone(bundle)),
            None => channel,
        })
    }

    /// Rebuild after `changes` and propagate the result.
    pub fn process_changes(
        &self,
        changes: &[PathBuf],
        channel: &mut HotUpdateChannel,
        on_event: &impl Fn(WatchEvent),
    ) {
        on_event(WatchEvent::BuildStarted);
        let manifest = match self.driver().run() {
            Ok(manifest) => manifest,
            Err(err) => {
                warn!(error = %err, "rebuild failed, keeping previous plan");
                on_event(WatchEvent::Error {
                    message: err.to_string(),
                });
                return;
            }
        };
        on_event(build_complete(&manifest));

        let signals = channel.apply(changes, manifest);
        debug!(changes = changes.len(), signals = signals.len(), "changes propagated");
        for signal in &signals {
            on_event(WatchEvent::from(signal));
        }
    }

    fn driver(&self) -> BuildDriver<&R, &S> {
        BuildDriver::new(&self.resolver, &self.source, self.options.input.clone())
    }
}

fn build_complete(manifest: &BuildManifest) -> WatchEvent {
    WatchEvent::BuildComplete {
        modules: manifest.module_count(),
        warnings: manifest.warnings.len(),
        shape: manifest.shape.to_string(),
    }
}

fn is_ignored(context: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(context).unwrap_or(path);
    relative.components().any(|component| match component {
        Component::Normal(name) => IGNORED_DIRS.iter().any(|dir| *name == **dir),
        _ => false,
    })
}
