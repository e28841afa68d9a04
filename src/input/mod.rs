//! Input handling: host session types, normalized controller snapshots,
//! discrete controller events, and the per-frame poller.

/// Discrete controller events and handedness.
pub mod event;
/// Polls the session once per frame and pairs snapshots with history.
pub mod poller;
/// Named-field controller snapshots.
pub mod snapshot;
/// Host-facing session and source data.
pub mod source;

pub use event::{ControllerEvent, EventKind, Handedness};
pub use poller::{InputPoller, PolledController};
pub use snapshot::{ButtonName, ControllerSnapshot, StickAxis};
pub use source::{GamepadState, InputSession, InputSourceState, SourceId};
