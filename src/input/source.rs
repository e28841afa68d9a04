//! Host-facing input session types.
//!
//! These are plain data: the host copies its device state into them once per
//! frame and hands them to the [`InputPoller`](super::InputPoller).

use serde::{Deserialize, Serialize};

use crate::scene::Pose;

/// Stable identity of one physical input source for the session's lifetime.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct SourceId(pub u32);

/// Gamepad-like device state attached to an input source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadState {
    /// Button values in device order, each in `0.0..=1.0`.
    pub buttons: Vec<f32>,
    /// Axis values in device order, each in `-1.0..=1.0`.
    pub axes: Vec<f32>,
    /// Whether the device exposes a haptic actuator.
    pub has_haptics: bool,
}

/// One input source as reported by the host this frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSourceState {
    /// Source identity.
    pub id: SourceId,
    /// Raw handedness label (`"left"`, `"right"`, or absent).
    pub handedness: Option<String>,
    /// Attached gamepad, if any. Sources without one are skipped by the
    /// poller.
    pub gamepad: Option<GamepadState>,
    /// Controller pose relative to the viewer anchor, if tracked.
    pub pose: Option<Pose>,
}

/// An active input session: the set of sources visible this frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSession {
    /// Every source the host reported, in host order.
    pub sources: Vec<InputSourceState>,
}

impl InputSession {
    /// Look up a source by identity.
    #[must_use]
    pub fn source(&self, id: SourceId) -> Option<&InputSourceState> {
        self.sources.iter().find(|s| s.id == id)
    }
}
