//! Normalized per-frame controller snapshots.
//!
//! Raw device layouts are resolved once here into named fields so the rest
//! of the crate never touches device-specific button/axis indices.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::event::Handedness;
use super::source::{GamepadState, SourceId};
use crate::options::DeviceLayout;

/// Named digital/analog buttons resolved from the device layout.
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
pub enum ButtonName {
    /// Index-finger trigger.
    Trigger,
    /// Grip / squeeze button.
    Grip,
    /// Touchpad click.
    Touchpad,
    /// Thumbstick click.
    StickPress,
    /// Lower face button (A/X).
    PrimaryFace,
    /// Upper face button (B/Y).
    SecondaryFace,
}

/// The two thumbstick axes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum StickAxis {
    /// Horizontal stick axis (right is positive).
    X,
    /// Vertical stick axis (pushing forward is negative).
    Y,
}

/// Immutable capture of one controller's inputs for one frame.
///
/// Superseded, never mutated, by the next frame's snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    /// Physical source this snapshot was read from.
    pub source: SourceId,
    /// Hand the controller is held in.
    pub handedness: Handedness,
    /// Raw button values in device order, clamped to `0.0..=1.0`.
    pub buttons: Vec<f32>,
    /// Raw axis values in device order, clamped to `-1.0..=1.0`.
    pub axes: Vec<f32>,
    /// Thumbstick horizontal axis.
    pub stick_x: f32,
    /// Thumbstick vertical axis.
    pub stick_y: f32,
    /// Touchpad horizontal axis.
    pub touchpad_x: f32,
    /// Touchpad vertical axis.
    pub touchpad_y: f32,
    /// Trigger button value.
    pub trigger_value: f32,
    /// Grip button value.
    pub grip_value: f32,
    /// Touchpad click value.
    pub touchpad_value: f32,
    /// Thumbstick click value.
    pub stick_press_value: f32,
    /// Lower face button value.
    pub primary_face_value: f32,
    /// Upper face button value.
    pub secondary_face_value: f32,
    /// When the snapshot was captured.
    pub captured_at: Instant,
}

impl ControllerSnapshot {
    /// Read a gamepad's state through `layout`.
    ///
    /// Indices the device does not report read as zero.
    #[must_use]
    pub fn capture(
        source: SourceId,
        handedness: Handedness,
        gamepad: &GamepadState,
        layout: &DeviceLayout,
        captured_at: Instant,
    ) -> Self {
        let buttons: Vec<f32> =
            gamepad.buttons.iter().map(|&v| sanitize(v, 0.0)).collect();
        let axes: Vec<f32> =
            gamepad.axes.iter().map(|&v| sanitize(v, -1.0)).collect();

        let button = |name: ButtonName| {
            buttons
                .get(layout.button_index(name))
                .copied()
                .unwrap_or(0.0)
        };
        let axis = |idx: usize| axes.get(idx).copied().unwrap_or(0.0);

        Self {
            source,
            handedness,
            stick_x: axis(layout.stick_x),
            stick_y: axis(layout.stick_y),
            touchpad_x: axis(layout.touchpad_x),
            touchpad_y: axis(layout.touchpad_y),
            trigger_value: button(ButtonName::Trigger),
            grip_value: button(ButtonName::Grip),
            touchpad_value: button(ButtonName::Touchpad),
            stick_press_value: button(ButtonName::StickPress),
            primary_face_value: button(ButtonName::PrimaryFace),
            secondary_face_value: button(ButtonName::SecondaryFace),
            buttons,
            axes,
            captured_at,
        }
    }

    /// Value of a named button.
    #[must_use]
    pub fn button(&self, name: ButtonName) -> f32 {
        match name {
            ButtonName::Trigger => self.trigger_value,
            ButtonName::Grip => self.grip_value,
            ButtonName::Touchpad => self.touchpad_value,
            ButtonName::StickPress => self.stick_press_value,
            ButtonName::PrimaryFace => self.primary_face_value,
            ButtonName::SecondaryFace => self.secondary_face_value,
        }
    }

    /// Value of a thumbstick axis.
    #[must_use]
    pub fn axis(&self, axis: StickAxis) -> f32 {
        match axis {
            StickAxis::X => self.stick_x,
            StickAxis::Y => self.stick_y,
        }
    }

    /// Summed absolute magnitude of both stick axes.
    #[must_use]
    pub fn stick_magnitude(&self) -> f32 {
        self.stick_x.abs() + self.stick_y.abs()
    }
}

/// Clamp a raw device value into `min..=1.0`, mapping NaN to zero.
fn sanitize(value: f32, min: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(min, 1.0)
    }
}
