//! Hot update signals

use serde::Serialize;

use crate::domain::value_objects::{LayerId, ModuleId};

/// Logged once per server-components acceptance cycle.
pub const SERVER_COMPONENTS_UPDATED_MARKER: &str = "[stratum] server components updated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    /// Updated in place; the runtime re-fetches or hot-swaps
    Accepted,
    /// Compiled output discarded; the next request reloads it
    Invalidated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateEvent {
    pub affected_layer: LayerId,
    pub kind: UpdateKind,
    /// Changed modules compiled in the layer
    pub modules: Vec<ModuleId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum HotSignal {
    Update(UpdateEvent),
    FullReload { reason: String },
}

impl HotSignal {
    pub fn is_full_reload(&self) -> bool {
        matches!(self, HotSignal::FullReload { .. })
    }

    pub fn layer(&self) -> Option<LayerId> {
        match self {
            HotSignal::Update(event) => Some(event.affected_layer),
            HotSignal::FullReload { .. } => None,
        }
    }
}
