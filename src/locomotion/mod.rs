//! Continuous locomotion: thumbstick acceleration, digital yaw, forward
//! glide, teleport reset and the haptic pulses that accompany stick motion.

/// Per-axis acceleration factors.
pub mod accel;
/// Anchor integration.
pub mod controller;
/// Stick magnitude to haptic pulse mapping.
pub mod haptics;

pub use accel::{AccelCurve, AccelTable, AxisAccelState};
pub use controller::{head_from_orientation, LocomotionController, StickProfile};
pub use haptics::{HapticFeedback, HapticPulse, HapticSink, NoHaptics};
