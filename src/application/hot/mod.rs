//! Hot update channel
//!
//! - `HotUpdateChannel` - change set in, layer-aware signals out
//! - `RuntimeSession` - acceptance state machine and request memo per client
//! - `HotSignal` / `UpdateEvent` - what sessions receive

mod channel;
mod event;
mod session;


pub use channel::{HotUpdateChannel, CHANNEL_CAPACITY};
pub use event::{HotSignal, UpdateEvent, UpdateKind, SERVER_COMPONENTS_UPDATED_MARKER};
pub use session::{RequestKey, RequestMemo, RuntimeSession, SessionState};
