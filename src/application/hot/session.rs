//! Runtime sessions
//!
//! One per connected browser runtime. Tracks the server-components
//! acceptance cycle `Idle -> AwaitingAcceptance -> Applied -> Idle` and the
//! session's request memo.

use std::collections::HashMap;

use bytes::Bytes;
use http::{Method, Request};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};

use super::{HotSignal, UpdateKind};
use crate::domain::value_objects::LayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Server components changed; the runtime is re-fetching
    AwaitingAcceptance,
    /// New payload rendered; waiting to settle
    Applied,
}

/// Stable identity of a request within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub method: Method,
    pub path: String,
}

impl RequestKey {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

impl From<&Request<Bytes>> for RequestKey {
    fn from(request: &Request<Bytes>) -> Self {
        Self::new(request.method().clone(), request.uri().path())
    }
}

/// Per-session memoization of server responses.
#[derive(Debug, Default)]
pub struct RequestMemo {
    entries: HashMap<RequestKey, Bytes>,
}

impl RequestMemo {
    pub fn get(&self, key: &RequestKey) -> Option<&Bytes> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: RequestKey, payload: Bytes) {
        self.entries.insert(key, payload);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct RuntimeSession {
    receiver: broadcast::Receiver<HotSignal>,
    state: SessionState,
    memo: RequestMemo,
    full_reloads: usize,
}

impl RuntimeSession {
    pub fn new(receiver: broadcast::Receiver<HotSignal>) -> Self {
        Self {
            receiver,
            state: SessionState::Idle,
            memo: RequestMemo::default(),
            full_reloads: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn full_reloads(&self) -> usize {
        self.full_reloads
    }

    pub fn memo(&self) -> &RequestMemo {
        &self.memo
    }

    pub fn memo_mut(&mut self) -> &mut RequestMemo {
        &mut self.memo
    }

    /// Wait for the next signal. `None` once the channel is gone.
    pub async fn next_signal(&mut self) -> Option<HotSignal> {
        let signal = match self.receiver.recv().await {
            Ok(signal) => signal,
            Err(RecvError::Lagged(missed)) => lagged(missed),
            Err(RecvError::Closed) => return None,
        };
        self.observe(&signal);
        Some(signal)
    }

    /// Next signal if one is queued.
    pub fn try_next_signal(&mut self) -> Option<HotSignal> {
        let signal = match self.receiver.try_recv() {
            Ok(signal) => signal,
            Err(TryRecvError::Lagged(missed)) => lagged(missed),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
        };
        self.observe(&signal);
        Some(signal)
    }

    fn observe(&mut self, signal: &HotSignal) {
        match signal {
            HotSignal::Update(event)
                if event.affected_layer == LayerId::ServerComponents
                    && event.kind == UpdateKind::Accepted =>
            {
                self.memo.clear();
                self.state = SessionState::AwaitingAcceptance;
            }
            // Single-shot replacement, no acceptance cycle.
            HotSignal::Update(_) => {}
            HotSignal::FullReload { .. } => {
                self.memo.clear();
                self.state = SessionState::Idle;
                self.full_reloads += 1;
            }
        }
    }

    /// The runtime rendered the re-fetched payload.
    pub fn acknowledge(&mut self) -> bool {
        if self.state != SessionState::AwaitingAcceptance {
            debug!(state = ?self.state, "acknowledge ignored");
            return false;
        }
        self.state = SessionState::Applied;
        true
    }

    pub fn settle(&mut self) -> bool {
        if self.state != SessionState::Applied {
            return false;
        }
        self.state = SessionState::Idle;
        true
    }

    /// Client-side navigation drops memoized responses.
    pub fn navigate(&mut self) {
        self.memo.clear();
    }
}

fn lagged(missed: u64) -> HotSignal {
    warn!(missed, "session fell behind, forcing full reload");
    HotSignal::FullReload {
        reason: format!("missed {} updates", missed),
    }
}
