use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A rigid transform: position plus orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pose {
    /// Translation.
    pub position: Vec3,
    /// Rotation.
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    /// Create a pose from its parts.
    #[must_use]
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Local forward axis (-Z) rotated into this pose's frame.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Express a pose given relative to `self` in `self`'s parent frame.
    #[must_use]
    pub fn then(&self, local: &Pose) -> Pose {
        Pose {
            position: self.position + self.orientation * local.position,
            orientation: (self.orientation * local.orientation).normalize(),
        }
    }

    /// Homogeneous matrix form.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }
}

/// The movable viewpoint origin every head and controller pose hangs off.
///
/// Created once per session. Locomotion moves and yaws it; teleport snaps
/// its position back to the fixed origin. It is never destroyed.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerAnchor {
    pose: Pose,
}

impl ViewerAnchor {
    /// Create an anchor at `origin` with identity orientation.
    #[must_use]
    pub fn new(origin: Vec3) -> Self {
        Self {
            pose: Pose::new(origin, Quat::IDENTITY),
        }
    }

    /// Current anchor transform.
    #[must_use]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Current anchor position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    /// Current anchor orientation.
    #[must_use]
    pub fn orientation(&self) -> Quat {
        self.pose.orientation
    }

    /// Convert an anchor-relative pose into world space.
    #[must_use]
    pub fn world_pose(&self, local: &Pose) -> Pose {
        self.pose.then(local)
    }

    /// Move by a world-space offset.
    pub fn translate(&mut self, delta: Vec3) {
        self.pose.position += delta;
    }

    /// Yaw about the anchor's own up axis.
    pub fn rotate_y(&mut self, radians: f32) {
        self.pose.orientation =
            (self.pose.orientation * Quat::from_rotation_y(radians)).normalize();
    }

    /// Translate `distance` along the forward axis of `heading` without
    /// changing the anchor's own orientation.
    ///
    /// The anchor is aligned to `heading`, translated along its local -Z,
    /// then restored.
    pub fn translate_along(&mut self, heading: Quat, distance: f32) {
        let saved = self.pose.orientation;
        self.pose.orientation = heading;
        self.pose.position += self.pose.forward() * distance;
        self.pose.orientation = saved;
    }

    /// Snap the position to `origin`, keeping the orientation.
    pub fn teleport(&mut self, origin: Vec3) {
        self.pose.position = origin;
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn world_pose_composes_parent_first() {
        let mut anchor = ViewerAnchor::new(Vec3::new(1.0, 0.0, 0.0));
        anchor.rotate_y(FRAC_PI_2);
        let local = Pose::new(Vec3::new(0.0, 0.0, -1.0), Quat::IDENTITY);
        let world = anchor.world_pose(&local);
        // Yawing +90° turns local -Z into world -X.
        assert!(close(world.position, Vec3::new(0.0, 0.0, 0.0)));
        assert!(close(world.forward(), Vec3::NEG_X));
    }

    #[test]
    fn translate_along_keeps_orientation() {
        let mut anchor = ViewerAnchor::new(Vec3::ZERO);
        let before = anchor.orientation();
        anchor.translate_along(Quat::from_rotation_y(FRAC_PI_2), 2.0);
        assert!(close(anchor.position(), Vec3::new(-2.0, 0.0, 0.0)));
        assert_eq!(anchor.orientation(), before);
    }

    #[test]
    fn teleport_keeps_orientation() {
        let mut anchor = ViewerAnchor::new(Vec3::ZERO);
        anchor.rotate_y(0.3);
        anchor.translate(Vec3::new(4.0, 5.0, 6.0));
        let orientation = anchor.orientation();
        anchor.teleport(Vec3::new(0.0, 1.6, 0.0));
        assert_eq!(anchor.position(), Vec3::new(0.0, 1.6, 0.0));
        assert_eq!(anchor.orientation(), orientation);
    }
}
