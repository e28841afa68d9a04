use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::input::{ButtonName, Handedness};
use crate::locomotion::StickProfile;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Locomotion", inline)]
#[serde(default)]
/// Thumbstick, glide, yaw and teleport parameters.
pub struct LocomotionOptions {
    /// Axis magnitude below which a stick contributes no motion.
    #[schemars(title = "Dead Zone", range(min = 0.0, max = 0.9), extend("step" = 0.01))]
    pub dead_zone: f32,
    /// Axis magnitude below which the acceleration factor drops back to the
    /// floor.
    #[schemars(skip)]
    pub reset_epsilon: f32,
    /// Starting and reset value of the acceleration factor.
    #[schemars(skip)]
    pub accel_floor: f32,
    /// Per-frame multiplier applied to the factor while a stick is held.
    #[schemars(title = "Acceleration", range(min = 1.0, max = 1.1), extend("step" = 0.001))]
    pub accel_ramp: f32,
    /// Upper bound of the acceleration factor.
    #[schemars(skip)]
    pub accel_cap: f32,
    /// Stick displacement per frame at full factor and full deflection.
    #[schemars(title = "Stick Speed", range(min = 0.01, max = 5.0), extend("step" = 0.01))]
    pub stick_speed: f32,
    /// Degrees turned per frame by a fully deflected turning stick.
    #[schemars(title = "Stick Turn", range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    pub stick_yaw_degrees: f32,
    /// Glide speed in metres per second.
    #[schemars(title = "Glide Speed", range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    pub glide_speed: f32,
    /// Hand whose button enables forward glide.
    #[schemars(skip)]
    pub glide_hand: Handedness,
    /// Button held to glide.
    #[schemars(skip)]
    pub glide_button: ButtonName,
    /// Button that yaws the anchor.
    #[schemars(skip)]
    pub yaw_button: ButtonName,
    /// Degrees turned per frame while the yaw button is fully pressed.
    #[schemars(title = "Snap Turn Step", range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    pub yaw_step_degrees: f32,
    /// Button value above which yaw keeps firing every frame.
    #[schemars(skip)]
    pub yaw_threshold: f32,
    /// Hand whose button teleports.
    #[schemars(skip)]
    pub teleport_hand: Handedness,
    /// Button that teleports the anchor to the origin.
    #[schemars(skip)]
    pub teleport_button: ButtonName,
    /// Fixed teleport destination.
    #[schemars(skip)]
    pub teleport_origin: [f32; 3],
    /// Left thumbstick behaviour.
    #[schemars(skip)]
    pub left_stick: StickProfile,
    /// Right (and unknown-hand) thumbstick behaviour.
    #[schemars(skip)]
    pub right_stick: StickProfile,
}

impl Default for LocomotionOptions {
    fn default() -> Self {
        Self {
            dead_zone: 0.2,
            reset_epsilon: 0.025,
            accel_floor: 0.025,
            accel_ramp: 1.001,
            accel_cap: 1.0,
            stick_speed: 1.0,
            stick_yaw_degrees: 1.0,
            glide_speed: 1.5,
            glide_hand: Handedness::Right,
            glide_button: ButtonName::PrimaryFace,
            yaw_button: ButtonName::Grip,
            yaw_step_degrees: 1.0,
            yaw_threshold: 0.8,
            teleport_hand: Handedness::Left,
            teleport_button: ButtonName::StickPress,
            teleport_origin: [0.0, 0.0, 0.0],
            left_stick: StickProfile::StrafeAndLift,
            right_stick: StickProfile::TurnAndWalk,
        }
    }
}
