use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::input::ButtonName;

/// Raw device indices of every named input.
///
/// Defaults follow the `xr-standard` gamepad mapping: buttons are trigger,
/// squeeze, touchpad, thumbstick, then the two face buttons; axes are
/// touchpad x/y then thumbstick x/y.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema,
)]
#[schemars(title = "Device Layout", inline)]
#[serde(default)]
pub struct DeviceLayout {
    /// Button index of the trigger.
    pub trigger: usize,
    /// Button index of the grip.
    pub grip: usize,
    /// Button index of the touchpad click.
    pub touchpad: usize,
    /// Button index of the thumbstick click.
    pub stick_press: usize,
    /// Button index of the lower face button.
    pub primary_face: usize,
    /// Button index of the upper face button.
    pub secondary_face: usize,
    /// Axis index of the thumbstick's horizontal axis.
    pub stick_x: usize,
    /// Axis index of the thumbstick's vertical axis.
    pub stick_y: usize,
    /// Axis index of the touchpad's horizontal axis.
    pub touchpad_x: usize,
    /// Axis index of the touchpad's vertical axis.
    pub touchpad_y: usize,
}

impl Default for DeviceLayout {
    fn default() -> Self {
        Self {
            trigger: 0,
            grip: 1,
            touchpad: 2,
            stick_press: 3,
            primary_face: 4,
            secondary_face: 5,
            stick_x: 2,
            stick_y: 3,
            touchpad_x: 0,
            touchpad_y: 1,
        }
    }
}

impl DeviceLayout {
    /// Raw button index for a named button.
    #[must_use]
    pub fn button_index(&self, name: ButtonName) -> usize {
        match name {
            ButtonName::Trigger => self.trigger,
            ButtonName::Grip => self.grip,
            ButtonName::Touchpad => self.touchpad,
            ButtonName::StickPress => self.stick_press,
            ButtonName::PrimaryFace => self.primary_face,
            ButtonName::SecondaryFace => self.secondary_face,
        }
    }
}

/// Input device options.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[schemars(title = "Input", inline)]
#[serde(default)]
pub struct InputOptions {
    /// How raw device indices map onto named inputs.
    pub layout: DeviceLayout,
}
