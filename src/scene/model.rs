use std::collections::BTreeSet;

use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::XrViewError;
use crate::picking::Bvh;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of a loaded model, assigned in load order.
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
)]
#[serde(transparent)]
pub struct ModelId(pub u32);

/// Identifier of a building element inside one model (the file's express
/// id).
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
)]
#[serde(transparent)]
pub struct ElementId(pub u32);

/// A fully-qualified element: which model, which element.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ElementRef {
    /// Owning model.
    pub model: ModelId,
    /// Element within the model.
    pub element: ElementId,
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Triangle geometry of one model with a per-face element table.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelGeometry {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    elements: Vec<ElementId>,
}

impl ModelGeometry {
    /// Validate and wrap decoded geometry.
    ///
    /// `elements[i]` is the element that owns `triangles[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`XrViewError::InvalidGeometry`] if the element table length
    /// differs from the triangle count, or if any index is out of range.
    pub fn new(
        positions: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
        elements: Vec<ElementId>,
    ) -> Result<Self, XrViewError> {
        if elements.len() != triangles.len() {
            return Err(XrViewError::InvalidGeometry(format!(
                "{} triangles but {} element entries",
                triangles.len(),
                elements.len()
            )));
        }
        let vertex_count = positions.len();
        if let Some((face, tri)) = triangles
            .iter()
            .enumerate()
            .find(|(_, tri)| tri.iter().any(|&i| i as usize >= vertex_count))
        {
            return Err(XrViewError::InvalidGeometry(format!(
                "triangle {face} references {tri:?} but only {vertex_count} \
                 vertices exist"
            )));
        }
        Ok(Self {
            positions,
            triangles,
            elements,
        })
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Vertex positions.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Corner positions of triangle `face`.
    ///
    /// `face` must be below [`triangle_count`](Self::triangle_count).
    #[must_use]
    pub fn triangle(&self, face: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangles[face];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    /// Element owning triangle `face`.
    #[must_use]
    pub fn element_of(&self, face: usize) -> Option<ElementId> {
        self.elements.get(face).copied()
    }
}

// ---------------------------------------------------------------------------
// Highlight / ghost
// ---------------------------------------------------------------------------

/// Material used to draw a highlight subset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct HighlightMaterial {
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Opacity in `0.0..=1.0`.
    pub opacity: f32,
    /// Whether the highlight is depth tested against the scene.
    pub depth_test: bool,
}

impl Default for HighlightMaterial {
    fn default() -> Self {
        Self {
            color: [1.0, 0.55, 0.1],
            opacity: 1.0,
            depth_test: false,
        }
    }
}

/// Elements of one model drawn with a dedicated material.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightSubset {
    /// Element ids in the subset.
    pub elements: BTreeSet<ElementId>,
    /// Material used for the subset.
    pub material: HighlightMaterial,
    /// Whether applying this subset removes any previous one.
    pub remove_previous: bool,
}

/// Translucent duplicate of a model left visible while the opaque original
/// is hidden.
///
/// One is attached whenever a model is added and never removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostCopy {
    /// Opacity the ghost is drawn with.
    pub opacity: f32,
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// A loaded model: geometry, its acceleration structure, and the display
/// flags this crate is allowed to toggle.
#[derive(Debug, Clone)]
pub struct Model {
    id: ModelId,
    /// Human-readable name (usually the file name).
    pub name: String,
    geometry: ModelGeometry,
    bvh: Bvh,
    pub(super) visible: bool,
    pub(super) ghost: GhostCopy,
    pub(super) highlight: Option<HighlightSubset>,
}

impl Model {
    pub(super) fn new(
        id: ModelId,
        name: String,
        geometry: ModelGeometry,
        ghost: GhostCopy,
    ) -> Self {
        let bvh = Bvh::build(&geometry);
        Self {
            id,
            name,
            geometry,
            bvh,
            visible: true,
            ghost,
            highlight: None,
        }
    }

    /// Model identifier.
    #[must_use]
    pub fn id(&self) -> ModelId {
        self.id
    }

    /// Decoded geometry.
    #[must_use]
    pub fn geometry(&self) -> &ModelGeometry {
        &self.geometry
    }

    /// Spatial acceleration structure over the geometry.
    #[must_use]
    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    /// Whether the opaque primary geometry is drawn.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// The model's ghost copy.
    #[must_use]
    pub fn ghost(&self) -> GhostCopy {
        self.ghost
    }

    /// Active highlight subset, if any.
    #[must_use]
    pub fn highlight(&self) -> Option<&HighlightSubset> {
        self.highlight.as_ref()
    }
}
