use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::source::SourceId;

/// Which hand a controller is held in.
///
/// Hosts report handedness as an optional string; anything other than
/// `"left"` or `"right"` resolves to [`Handedness::Unknown`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    /// Left-hand controller.
    Left,
    /// Right-hand controller.
    Right,
    /// Handedness not reported by the host.
    #[default]
    Unknown,
}

impl Handedness {
    /// Resolve a host-provided handedness label.
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("left") => Self::Left,
            Some("right") => Self::Right,
            _ => Self::Unknown,
        }
    }

    /// Whether this is the left hand. Unknown hands act as right hands.
    #[must_use]
    pub fn is_left(self) -> bool {
        self == Self::Left
    }

    /// Sign applied to digital yaw: the left hand turns one way, every other
    /// hand the other.
    #[must_use]
    pub fn yaw_sign(self) -> f32 {
        if self.is_left() {
            -1.0
        } else {
            1.0
        }
    }
}

/// Discrete controller events delivered by the host session.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Trigger pressed.
    SelectStart,
    /// Trigger released.
    SelectEnd,
    /// Grip pressed.
    SqueezeStart,
    /// Grip released.
    SqueezeEnd,
}

/// A discrete event raised by one input source.
///
/// The handedness and pose of the issuing controller are looked up from the
/// same frame's input session, so the host only needs to say who fired what.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerEvent {
    /// The input source that raised the event.
    pub source: SourceId,
    /// What happened.
    pub kind: EventKind,
}

impl ControllerEvent {
    /// Create an event for `source`.
    #[must_use]
    pub fn new(source: SourceId, kind: EventKind) -> Self {
        Self { source, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handedness_labels() {
        assert_eq!(Handedness::from_label(Some("left")), Handedness::Left);
        assert_eq!(Handedness::from_label(Some("right")), Handedness::Right);
        assert_eq!(Handedness::from_label(Some("none")), Handedness::Unknown);
        assert_eq!(Handedness::from_label(None), Handedness::Unknown);
    }

    #[test]
    fn unknown_hand_yaws_like_right() {
        assert_eq!(Handedness::Left.yaw_sign(), -1.0);
        assert_eq!(Handedness::Right.yaw_sign(), 1.0);
        assert_eq!(Handedness::Unknown.yaw_sign(), 1.0);
    }
}
