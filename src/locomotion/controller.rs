//! Per-frame integration of the viewer anchor from controller input.

use glam::{Quat, Vec3};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::accel::{AccelCurve, AccelTable};
use super::haptics::{HapticFeedback, HapticPulse};
use crate::input::{Handedness, PolledController, SourceId, StickAxis};
use crate::options::{HapticOptions, LocomotionOptions};
use crate::scene::{Pose, ViewerAnchor};

/// What a thumbstick does.
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
pub enum StickProfile {
    /// X strafes along the view's right vector, Y raises and lowers.
    StrafeAndLift,
    /// X yaws the anchor, Y walks along the view direction.
    TurnAndWalk,
}

/// Whether a configured hand accepts input from `actual`.
///
/// Unknown controllers act as right-hand controllers; a configured
/// `Unknown` accepts any hand.
fn hand_matches(configured: Handedness, actual: Handedness) -> bool {
    match configured {
        Handedness::Left => actual.is_left(),
        Handedness::Right => !actual.is_left(),
        Handedness::Unknown => true,
    }
}

/// Integrates the viewer anchor every frame.
///
/// Stick motion is per-frame displacement scaled by the acceleration
/// factor; forward glide is the only motion scaled by `dt`.
#[derive(Debug, Clone)]
pub struct LocomotionController {
    options: LocomotionOptions,
    accel: AccelTable,
    haptics: HapticFeedback,
}

impl Default for LocomotionController {
    fn default() -> Self {
        Self::new(LocomotionOptions::default(), HapticOptions::default())
    }
}

impl LocomotionController {
    /// Create a controller from locomotion and haptic options.
    #[must_use]
    pub fn new(options: LocomotionOptions, haptics: HapticOptions) -> Self {
        Self {
            accel: AccelTable::new(AccelCurve::from_options(&options)),
            haptics: HapticFeedback::new(haptics),
            options,
        }
    }

    /// Current acceleration factor for one stick axis.
    #[must_use]
    pub fn accel_factor(&self, source: SourceId, axis: StickAxis) -> f32 {
        self.accel.factor(source, axis)
    }

    /// Advance the anchor by one frame.
    ///
    /// `head` is the head pose relative to the anchor; the view direction is
    /// taken from it once, before any of this frame's motion. Returns the
    /// haptic pulses to send.
    pub fn update(
        &mut self,
        anchor: &mut ViewerAnchor,
        controllers: &[PolledController],
        head: &Pose,
        dt: f32,
    ) -> Vec<HapticPulse> {
        let view = anchor.world_pose(head);
        let forward = view.forward();
        let mut pulses = Vec::new();

        for controller in controllers {
            let hand = controller.handedness();

            if hand_matches(self.options.glide_hand, hand)
                && controller.held(self.options.glide_button)
            {
                anchor.translate_along(
                    view.orientation,
                    self.options.glide_speed * dt,
                );
            }

            self.apply_buttons(anchor, controller);

            if self.apply_stick(anchor, controller, forward) {
                if let Some(pulse) = self.haptics.pulse_for(controller) {
                    pulses.push(pulse);
                }
            }
        }
        pulses
    }

    /// Digital yaw and teleport.
    fn apply_buttons(
        &mut self,
        anchor: &mut ViewerAnchor,
        controller: &PolledController,
    ) {
        let hand = controller.handedness();
        let yaw_value = controller.current.button(self.options.yaw_button);
        if controller.changed(self.options.yaw_button)
            || yaw_value > self.options.yaw_threshold
        {
            let degrees = if yaw_value >= 1.0 {
                self.options.yaw_step_degrees
            } else {
                yaw_value.abs() * self.options.yaw_step_degrees
            };
            anchor.rotate_y(hand.yaw_sign() * degrees.to_radians());
        }

        if hand_matches(self.options.teleport_hand, hand)
            && controller.pressed(self.options.teleport_button)
        {
            let origin = Vec3::from(self.options.teleport_origin);
            log::debug!("teleport to {origin} from {}", anchor.position());
            anchor.teleport(origin);
            // The teleport button is the stick click, so the pressed stick
            // loses its ramp. Other controllers keep theirs.
            self.accel.reset_source(controller.source());
        }
    }

    /// Thumbstick motion. Returns whether either axis was past the dead-zone.
    fn apply_stick(
        &mut self,
        anchor: &mut ViewerAnchor,
        controller: &PolledController,
        forward: Vec3,
    ) -> bool {
        let profile = if controller.handedness().is_left() {
            self.options.left_stick
        } else {
            self.options.right_stick
        };
        let source = controller.source();
        let speed = self.options.stick_speed;
        let mut active = false;

        let x = controller.current.stick_x;
        if let Some(factor) = self.accel.advance(source, StickAxis::X, x) {
            active = true;
            match profile {
                StickProfile::StrafeAndLift => {
                    let right = Vec3::new(-forward.z, 0.0, forward.x);
                    anchor.translate(right * factor * speed * x);
                }
                StickProfile::TurnAndWalk => {
                    let degrees = -x * self.options.stick_yaw_degrees;
                    anchor.rotate_y(degrees.to_radians());
                }
            }
        }

        let y = controller.current.stick_y;
        if let Some(factor) = self.accel.advance(source, StickAxis::Y, y) {
            active = true;
            let delta = match profile {
                StickProfile::StrafeAndLift => Vec3::new(0.0, -factor * y, 0.0),
                StickProfile::TurnAndWalk => {
                    Vec3::new(-forward.x, 0.0, -forward.z) * factor * y
                }
            };
            anchor.translate(delta * speed);
        }
        active
    }
}

/// Convenience for hosts that track head orientation only.
#[must_use]
pub fn head_from_orientation(orientation: Quat) -> Pose {
    Pose::new(Vec3::ZERO, orientation)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use web_time::Instant;

    use super::*;
    use crate::input::{ControllerSnapshot, GamepadState};
    use crate::options::DeviceLayout;

    const DT: f32 = 0.016;

    fn snapshot(
        source: u32,
        hand: Handedness,
        buttons: &[f32],
        axes: &[f32],
    ) -> ControllerSnapshot {
        let pad = GamepadState {
            buttons: buttons.to_vec(),
            axes: axes.to_vec(),
            has_haptics: true,
        };
        ControllerSnapshot::capture(
            SourceId(source),
            hand,
            &pad,
            &DeviceLayout::default(),
            Instant::now(),
        )
    }

    /// Stateful stand-in for the poller: remembers last frame per source.
    struct Rig {
        loco: LocomotionController,
        anchor: ViewerAnchor,
        last: Option<ControllerSnapshot>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                loco: LocomotionController::default(),
                anchor: ViewerAnchor::new(Vec3::ZERO),
                last: None,
            }
        }

        fn frame(
            &mut self,
            hand: Handedness,
            buttons: &[f32],
            axes: &[f32],
        ) -> Vec<HapticPulse> {
            let current = snapshot(1, hand, buttons, axes);
            let polled = PolledController {
                previous: self.last.replace(current.clone()),
                current,
                has_haptics: true,
            };
            self.loco
                .update(&mut self.anchor, &[polled], &Pose::IDENTITY, DT)
        }
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn stick_inside_dead_zone_does_not_move() {
        let mut rig = Rig::new();
        let pulses = rig.frame(Handedness::Left, &[], &[0.0, 0.0, 0.05, 0.0]);
        assert_eq!(rig.anchor.position(), Vec3::ZERO);
        assert!(pulses.is_empty());
    }

    #[test]
    fn dead_zone_ignores_built_up_factor() {
        let mut rig = Rig::new();
        for _ in 0..300 {
            let _ = rig.frame(Handedness::Right, &[], &[0.0, 0.0, 0.0, -1.0]);
        }
        let before = rig.anchor.position();
        for v in [0.19, -0.19, 0.1, 0.0] {
            let _ = rig.frame(Handedness::Right, &[], &[0.0, 0.0, v, v]);
            assert_eq!(rig.anchor.position(), before);
        }
    }

    #[test]
    fn held_strafe_reaches_full_speed() {
        let mut rig = Rig::new();
        let src = SourceId(1);
        let mut frames = 0;
        let mut step = Vec3::ZERO;
        while rig.loco.accel_factor(src, StickAxis::X) < 1.0 {
            let before = rig.anchor.position();
            let _ = rig.frame(Handedness::Left, &[], &[0.0, 0.0, 0.5, 0.0]);
            step = rig.anchor.position() - before;
            frames += 1;
            assert!(frames <= 4000, "factor never reached 1.0");
        }
        // Identity head: camera right is +X.
        assert!(frames > 120);
        assert!(close(step, Vec3::new(0.5, 0.0, 0.0)), "{step}");
    }

    #[test]
    fn right_stick_walks_along_gaze_and_turns() {
        let mut rig = Rig::new();
        let _ = rig.frame(Handedness::Right, &[], &[0.0, 0.0, 0.0, -1.0]);
        let p = rig.anchor.position();
        assert!(p.z < 0.0 && p.x.abs() < 1e-6 && p.y == 0.0);

        let mut rig = Rig::new();
        let _ = rig.frame(Handedness::Right, &[], &[0.0, 0.0, 0.5, 0.0]);
        assert_eq!(rig.anchor.position(), Vec3::ZERO);
        let yawed = rig.anchor.orientation() * Vec3::NEG_Z;
        // Pushing right turns clockwise seen from above: gaze swings to +X.
        assert!(yawed.x > 0.0);
    }

    #[test]
    fn left_stick_y_lifts() {
        let mut rig = Rig::new();
        let _ = rig.frame(Handedness::Left, &[], &[0.0, 0.0, 0.0, -0.5]);
        let p = rig.anchor.position();
        assert!(p.y > 0.0 && p.x == 0.0 && p.z == 0.0);
    }

    #[test]
    fn unknown_hand_uses_right_profile() {
        let mut rig = Rig::new();
        let _ = rig.frame(Handedness::Unknown, &[], &[0.0, 0.0, 0.0, -1.0]);
        assert!(rig.anchor.position().z < 0.0);
    }

    #[test]
    fn teleport_resets_position_only() {
        let mut rig = Rig::new();
        for _ in 0..50 {
            let _ = rig.frame(Handedness::Left, &[], &[0.0, 0.0, 1.0, 0.0]);
        }
        rig.anchor.rotate_y(0.7);
        let orientation = rig.anchor.orientation();
        assert!(rig.loco.accel_factor(SourceId(1), StickAxis::X) > 0.025);

        // Stick resting between the reset epsilon and the dead-zone would
        // otherwise hold its factor.
        let _ = rig.frame(Handedness::Left, &[0.0, 0.0, 0.0, 1.0], &[0.0, 0.0, 0.1, 0.0]);
        assert_eq!(rig.anchor.position(), Vec3::ZERO);
        assert_eq!(rig.anchor.orientation(), orientation);
        assert_eq!(rig.loco.accel_factor(SourceId(1), StickAxis::X), 0.025);

        // Held button does not teleport again.
        rig.anchor.translate(Vec3::X);
        let _ = rig.frame(Handedness::Left, &[0.0, 0.0, 0.0, 1.0], &[]);
        assert_eq!(rig.anchor.position(), Vec3::X);
    }

    #[test]
    fn teleport_keeps_other_controllers_ramp() {
        let mut loco = LocomotionController::default();
        let mut anchor = ViewerAnchor::new(Vec3::ZERO);
        let mut last: Vec<ControllerSnapshot> = Vec::new();
        let mut frame = |left_buttons: &[f32], left_x: f32| {
            let current = vec![
                snapshot(1, Handedness::Left, left_buttons, &[0.0, 0.0, left_x, 0.0]),
                snapshot(2, Handedness::Right, &[], &[0.0, 0.0, 0.0, -1.0]),
            ];
            let polled: Vec<PolledController> = current
                .iter()
                .enumerate()
                .map(|(i, c)| PolledController {
                    previous: last.get(i).cloned(),
                    current: c.clone(),
                    has_haptics: true,
                })
                .collect();
            last = current;
            let _ = loco.update(&mut anchor, &polled, &Pose::IDENTITY, DT);
            (
                loco.accel_factor(SourceId(1), StickAxis::X),
                loco.accel_factor(SourceId(2), StickAxis::Y),
            )
        };

        let mut before = (0.0, 0.0);
        for _ in 0..50 {
            before = frame(&[], 1.0);
        }
        assert!(before.0 > 0.025);
        assert!(before.1 > 0.025);

        let after = frame(&[0.0, 0.0, 0.0, 1.0], 0.1);
        assert_eq!(after.0, 0.025);
        assert!(after.1 >= before.1);
    }

    #[test]
    fn grip_yaw_sign_depends_on_hand() {
        let gaze = |hand| {
            let mut rig = Rig::new();
            let _ = rig.frame(hand, &[0.0, 0.0], &[]);
            let _ = rig.frame(hand, &[0.0, 1.0], &[]);
            rig.anchor.orientation() * Vec3::NEG_Z
        };
        let left = gaze(Handedness::Left);
        let right = gaze(Handedness::Right);
        assert!(left.x > 0.0);
        assert!(right.x < 0.0);
        let one_degree = 1.0_f32.to_radians().sin();
        assert!((right.x.abs() - one_degree).abs() < 1e-5);
    }

    #[test]
    fn grip_held_past_threshold_keeps_turning() {
        let mut rig = Rig::new();
        for _ in 0..10 {
            let _ = rig.frame(Handedness::Right, &[0.0, 1.0], &[]);
        }
        let (_, angle) = rig.anchor.orientation().to_axis_angle();
        assert!((angle - 10.0_f32.to_radians()).abs() < 1e-4);

        // Below the threshold and unchanged: no turn.
        let mut rig = Rig::new();
        for _ in 0..5 {
            let _ = rig.frame(Handedness::Right, &[0.0, 0.5], &[]);
        }
        let (_, angle) = rig.anchor.orientation().to_axis_angle();
        assert!(angle.abs() < 1e-6);
    }

    #[test]
    fn glide_follows_gaze_without_turning_anchor() {
        let mut loco = LocomotionController::default();
        let mut anchor = ViewerAnchor::new(Vec3::ZERO);
        let polled = PolledController {
            current: snapshot(
                2,
                Handedness::Right,
                &[0.0, 0.0, 0.0, 0.0, 1.0],
                &[],
            ),
            previous: None,
            has_haptics: false,
        };
        let head = head_from_orientation(Quat::from_rotation_y(FRAC_PI_2));
        let _ = loco.update(&mut anchor, &[polled], &head, 0.5);
        assert!(close(anchor.position(), Vec3::new(-0.75, 0.0, 0.0)));
        assert_eq!(anchor.orientation(), Quat::IDENTITY);
    }

    #[test]
    fn pulse_only_when_stick_past_dead_zone() {
        let mut rig = Rig::new();
        assert!(rig.frame(Handedness::Left, &[], &[0.0, 0.0, 0.1, 0.1]).is_empty());
        let pulses = rig.frame(Handedness::Left, &[], &[0.0, 0.0, 0.6, 0.4]);
        assert_eq!(pulses.len(), 1);
        assert_eq!(pulses[0].strength, 0.75);
    }
}
