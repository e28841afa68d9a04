//! Bounding volume hierarchy over one model's triangles.
//!
//! Built once when a model is added; queried with first-hit semantics.
//! Splits are median splits along the longest centroid axis, which keeps
//! the build deterministic for identical geometry.

use glam::Vec3;

use super::ray::Ray;
use crate::scene::ModelGeometry;

/// Maximum triangles stored in a leaf before splitting.
const LEAF_SIZE: usize = 4;

/// Hits closer than this are treated as self-intersections at the origin.
const T_MIN: f32 = 1e-6;

/// Determinant threshold below which a ray counts as parallel to a triangle.
const PARALLEL_EPSILON: f32 = 1e-9;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box that any point or box grows out of.
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Smallest box containing the three corners.
    #[must_use]
    pub fn from_triangle([a, b, c]: [Vec3; 3]) -> Self {
        Self {
            min: a.min(b).min(c),
            max: a.max(b).max(c),
        }
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Smallest box containing this box and `point`.
    #[must_use]
    pub fn grow(&self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Index (0..3) of the widest axis.
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        let extent = self.max - self.min;
        if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        }
    }

    /// Slab test. Returns the entry distance if the ray meets the box within
    /// `0.0..=t_max`.
    ///
    /// An axis the ray does not move along puts no bound on `t`; the origin
    /// just has to lie inside that slab, faces included.
    #[must_use]
    pub fn ray_entry(&self, ray: &Ray, inv_dir: Vec3, t_max: f32) -> Option<f32> {
        let mut t_near = 0.0_f32;
        let mut t_far = t_max;
        for axis in 0..3 {
            let origin = ray.origin[axis];
            if ray.direction[axis] == 0.0 {
                if origin < self.min[axis] || origin > self.max[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (self.min[axis] - origin) * inv_dir[axis];
            let t2 = (self.max[axis] - origin) * inv_dir[axis];
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
        }
        (t_near <= t_far).then_some(t_near)
    }
}

/// Ray/triangle intersection (Möller–Trumbore), double-sided.
///
/// Returns the distance along the ray, or `None` for a miss or a hit behind
/// the origin.
#[must_use]
pub fn intersect_triangle(ray: &Ray, [a, b, c]: [Vec3; 3]) -> Option<f32> {
    let e1 = b - a;
    let e2 = c - a;
    let p = ray.direction.cross(e2);
    let det = e1.dot(p);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t > T_MIN).then_some(t)
}

/// Nearest triangle hit within one model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Face index into the model's triangle list.
    pub face: u32,
    /// Distance along the ray.
    pub distance: f32,
}

impl TriangleHit {
    /// Whether `self` should replace `other` as the nearest hit.
    ///
    /// Equal distances resolve to the lower face index so the answer does
    /// not depend on traversal order.
    fn beats(&self, other: Option<&Self>) -> bool {
        other.is_none_or(|o| {
            self.distance < o.distance
                || (self.distance == o.distance && self.face < o.face)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BvhNode {
    Leaf { bounds: Aabb, start: u32, count: u32 },
    Branch { bounds: Aabb, left: u32, right: u32 },
}

impl BvhNode {
    fn bounds(&self) -> &Aabb {
        match self {
            Self::Leaf { bounds, .. } | Self::Branch { bounds, .. } => bounds,
        }
    }
}

/// Bounding volume hierarchy over a model's triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    /// Face indices, reordered so every leaf owns a contiguous range.
    order: Vec<u32>,
}

impl Bvh {
    /// Build a hierarchy for `geometry`.
    #[must_use]
    pub fn build(geometry: &ModelGeometry) -> Self {
        let count = geometry.triangle_count();
        let bounds: Vec<Aabb> = (0..count)
            .map(|face| Aabb::from_triangle(geometry.triangle(face)))
            .collect();
        let centroids: Vec<Vec3> = bounds.iter().map(Aabb::center).collect();

        let mut bvh = Self {
            nodes: Vec::with_capacity(count.max(1) * 2 / LEAF_SIZE + 1),
            order: (0..count as u32).collect(),
        };
        if count > 0 {
            let _ = bvh.build_range(0, count, &bounds, &centroids);
        }
        bvh
    }

    fn build_range(
        &mut self,
        start: usize,
        end: usize,
        bounds: &[Aabb],
        centroids: &[Vec3],
    ) -> u32 {
        let index = self.nodes.len() as u32;
        let range = &self.order[start..end];
        let node_bounds = range
            .iter()
            .fold(Aabb::EMPTY, |acc, &f| acc.union(&bounds[f as usize]));
        let centroid_bounds = range
            .iter()
            .fold(Aabb::EMPTY, |acc, &f| acc.grow(centroids[f as usize]));
        let axis = centroid_bounds.longest_axis();
        let extent = (centroid_bounds.max - centroid_bounds.min)[axis];

        let count = end - start;
        if count <= LEAF_SIZE || extent <= 0.0 {
            self.nodes.push(BvhNode::Leaf {
                bounds: node_bounds,
                start: start as u32,
                count: count as u32,
            });
            return index;
        }

        self.order[start..end].sort_by(|&a, &b| {
            centroids[a as usize][axis]
                .total_cmp(&centroids[b as usize][axis])
                .then(a.cmp(&b))
        });
        let mid = start + count / 2;

        // Placeholder, patched once both children exist.
        self.nodes.push(BvhNode::Leaf {
            bounds: node_bounds,
            start: 0,
            count: 0,
        });
        let left = self.build_range(start, mid, bounds, centroids);
        let right = self.build_range(mid, end, bounds, centroids);
        self.nodes[index as usize] = BvhNode::Branch {
            bounds: node_bounds,
            left,
            right,
        };
        index
    }

    /// Number of nodes in the hierarchy.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nearest triangle hit along `ray` within `max_distance`.
    #[must_use]
    pub fn raycast(
        &self,
        geometry: &ModelGeometry,
        ray: &Ray,
        max_distance: f32,
    ) -> Option<TriangleHit> {
        if self.nodes.is_empty() {
            return None;
        }
        let inv_dir = ray.direction.recip();
        let mut best: Option<TriangleHit> = None;
        let mut stack = vec![0_u32];

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx as usize];
            let limit = best.map_or(max_distance, |b| b.distance);
            if node.bounds().ray_entry(ray, inv_dir, limit).is_none() {
                continue;
            }
            match *node {
                BvhNode::Leaf { start, count, .. } => {
                    let faces = &self.order[start as usize..(start + count) as usize];
                    for &face in faces {
                        let Some(distance) =
                            intersect_triangle(ray, geometry.triangle(face as usize))
                        else {
                            continue;
                        };
                        if distance > max_distance {
                            continue;
                        }
                        let hit = TriangleHit { face, distance };
                        if hit.beats(best.as_ref()) {
                            best = Some(hit);
                        }
                    }
                }
                BvhNode::Branch { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ElementId;

    /// A row of unit quads facing +Z, one per x offset, at depth `z`.
    fn wall(z: f32, columns: u32) -> ModelGeometry {
        let mut positions = Vec::new();
        let mut triangles = Vec::new();
        let mut elements = Vec::new();
        for col in 0..columns {
            let x = col as f32;
            let base = positions.len() as u32;
            positions.extend([
                Vec3::new(x, 0.0, z),
                Vec3::new(x + 1.0, 0.0, z),
                Vec3::new(x + 1.0, 1.0, z),
                Vec3::new(x, 1.0, z),
            ]);
            triangles.push([base, base + 1, base + 2]);
            triangles.push([base, base + 2, base + 3]);
            elements.extend([ElementId(col), ElementId(col)]);
        }
        ModelGeometry::new(positions, triangles, elements).unwrap()
    }

    #[test]
    fn triangle_hit_and_miss() {
        let tri = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let hit = Ray::new(Vec3::new(0.2, 0.2, 5.0), Vec3::NEG_Z);
        assert!((intersect_triangle(&hit, tri).unwrap() - 5.0).abs() < 1e-6);
        let miss = Ray::new(Vec3::new(2.0, 2.0, 5.0), Vec3::NEG_Z);
        assert!(intersect_triangle(&miss, tri).is_none());
    }

    #[test]
    fn triangle_behind_origin_is_ignored() {
        let tri = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let away = Ray::new(Vec3::new(0.2, 0.2, 5.0), Vec3::Z);
        assert!(intersect_triangle(&away, tri).is_none());
    }

    #[test]
    fn bvh_matches_brute_force() {
        let geometry = wall(-3.0, 40);
        let bvh = Bvh::build(&geometry);
        assert!(bvh.node_count() > 1);

        for i in 0..40 {
            let ray = Ray::new(
                Vec3::new(i as f32 + 0.3, 0.6, 0.0),
                Vec3::new(0.05, -0.02, -1.0),
            );
            let brute = brute_force(&geometry, &ray);
            let fast = bvh
                .raycast(&geometry, &ray, f32::MAX)
                .map(|h| (h.face, h.distance));
            assert_eq!(fast, brute, "ray {i}");
        }
    }

    fn brute_force(geometry: &ModelGeometry, ray: &Ray) -> Option<(u32, f32)> {
        (0..geometry.triangle_count())
            .filter_map(|f| {
                intersect_triangle(ray, geometry.triangle(f)).map(|d| (f as u32, d))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
    }

    #[test]
    fn axis_aligned_rays_on_box_faces_hit() {
        let quad = wall(-3.0, 1);
        let bvh = Bvh::build(&quad);
        for origin in [
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::ZERO,
        ] {
            let ray = Ray::new(origin, Vec3::NEG_Z);
            let hit = bvh.raycast(&quad, &ray, f32::MAX);
            assert!(hit.is_some(), "origin {origin}");
            assert_eq!(hit.map(|h| (h.face, h.distance)), brute_force(&quad, &ray));
        }

        // Columns share faces, so every integer x sits on a node boundary.
        let geometry = wall(-3.0, 40);
        let bvh = Bvh::build(&geometry);
        for col in 0..=40 {
            for y in [0.0, 0.5, 1.0] {
                let ray = Ray::new(Vec3::new(col as f32, y, 0.0), Vec3::NEG_Z);
                let fast = bvh
                    .raycast(&geometry, &ray, f32::MAX)
                    .map(|h| (h.face, h.distance));
                assert_eq!(fast, brute_force(&geometry, &ray), "x {col} y {y}");
            }
        }

        let outside = Ray::new(Vec3::new(0.5, 1.5, 0.0), Vec3::NEG_Z);
        assert!(bvh.raycast(&geometry, &outside, f32::MAX).is_none());
    }

    #[test]
    fn max_distance_limits_hits() {
        let geometry = wall(-3.0, 2);
        let bvh = Bvh::build(&geometry);
        let ray = Ray::new(Vec3::new(0.5, 0.5, 0.0), Vec3::NEG_Z);
        assert!(bvh.raycast(&geometry, &ray, 2.0).is_none());
        assert!(bvh.raycast(&geometry, &ray, 4.0).is_some());
    }

    #[test]
    fn empty_geometry_never_hits() {
        let geometry = ModelGeometry::new(vec![], vec![], vec![]).unwrap();
        let bvh = Bvh::build(&geometry);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(bvh.raycast(&geometry, &ray, f32::MAX).is_none());
    }
}
