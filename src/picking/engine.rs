use glam::Vec3;

use super::ray::Ray;
use crate::scene::{ElementRef, ModelId, ModelSet, Pose};

/// The nearest element a pick ray hit.
///
/// Transient: produced per cast and consumed by the selection controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    /// The element that was hit.
    pub element: ElementRef,
    /// World-space intersection point.
    pub point: Vec3,
    /// Distance along the ray.
    pub distance: f32,
    /// Face index within the owning model.
    pub face: u32,
}

impl PickResult {
    /// Model that owns the hit element.
    #[must_use]
    pub fn model(&self) -> ModelId {
        self.element.model
    }
}

/// First-hit ray picking against every loaded model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickEngine {
    max_distance: f32,
}

impl Default for PickEngine {
    fn default() -> Self {
        Self::new(1000.0)
    }
}

impl PickEngine {
    /// Create an engine that ignores hits farther than `max_distance`.
    #[must_use]
    pub fn new(max_distance: f32) -> Self {
        Self { max_distance }
    }

    /// Cast along a controller's world pose.
    #[must_use]
    pub fn cast(&self, models: &ModelSet, pose: &Pose) -> Option<PickResult> {
        self.cast_ray(models, &Ray::from_pose(pose))
    }

    /// Cast `ray` into the union of all models and return the closest hit.
    ///
    /// Models are visited in load order and a later model only wins with a
    /// strictly shorter distance, so repeated casts against unchanged
    /// geometry always return the same element.
    #[must_use]
    pub fn cast_ray(&self, models: &ModelSet, ray: &Ray) -> Option<PickResult> {
        if ray.direction == Vec3::ZERO {
            return None;
        }
        let mut best: Option<PickResult> = None;
        for model in models.iter() {
            let limit = best.map_or(self.max_distance, |b| b.distance);
            let Some(hit) = model.bvh().raycast(model.geometry(), ray, limit)
            else {
                continue;
            };
            if best.is_some_and(|b| b.distance <= hit.distance) {
                continue;
            }
            let Some(element) = model.geometry().element_of(hit.face as usize)
            else {
                continue;
            };
            best = Some(PickResult {
                element: ElementRef {
                    model: model.id(),
                    element,
                },
                point: ray.at(hit.distance),
                distance: hit.distance,
                face: hit.face,
            });
        }
        if let Some(hit) = &best {
            log::debug!(
                "pick hit {:?} at {:.3} m",
                hit.element,
                hit.distance
            );
        }
        best
    }
}
