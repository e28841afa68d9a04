//! CPU ray picking: controller rays, a per-model BVH, and first-hit casts
//! across every loaded model.

/// Per-model bounding volume hierarchy and triangle intersection.
pub mod bvh;
/// First-hit picking across the model set.
pub mod engine;
/// Rays built from controller poses.
pub mod ray;

pub use bvh::{Aabb, Bvh, TriangleHit};
pub use engine::{PickEngine, PickResult};
pub use ray::Ray;
