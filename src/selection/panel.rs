use glam::{Mat3, Mat4, Quat, Vec3};

use super::resolver::ElementProperties;
use crate::scene::ElementRef;

/// Floating panel showing one element's properties.
///
/// Only the anchoring transform and the text lines are defined here; the
/// host decides how the panel looks.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPanel {
    /// Element the panel describes.
    pub element: ElementRef,
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation; local +Z faces the controller.
    pub orientation: Quat,
    /// Uniform scale.
    pub scale: f32,
    /// Text lines, top to bottom.
    pub lines: Vec<String>,
}

impl PropertyPanel {
    /// Place a panel `offset` of the way from `hit` toward `controller`,
    /// turned to face the controller.
    #[must_use]
    pub fn place(
        properties: &ElementProperties,
        hit: Vec3,
        controller: Vec3,
        offset: f32,
        scale: f32,
    ) -> Self {
        let position = hit + offset * (controller - hit);
        Self {
            element: properties.element,
            position,
            orientation: facing(position, controller),
            scale,
            lines: vec![
                format!("ExpressID : {}", properties.express_id),
                format!("Name: {}", properties.name.as_deref().unwrap_or("")),
            ],
        }
    }

    /// Model matrix for the renderer.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.orientation,
            self.position,
        )
    }
}

/// Rotation turning local +Z from `from` toward `target`, keeping +Y as
/// close to world up as possible.
fn facing(from: Vec3, target: Vec3) -> Quat {
    let Some(z) = (target - from).try_normalize() else {
        return Quat::IDENTITY;
    };
    let Some(x) = Vec3::Y.cross(z).try_normalize() else {
        // Looking straight up or down.
        return Quat::from_rotation_arc(Vec3::Z, z);
    };
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}
