use glam::Mat4;

use crate::scene::{HighlightSubset, ModelId, Pose};
use crate::selection::{PropertyPanel, SelectionMode};

/// What the renderer needs for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRenderState {
    /// Model identity.
    pub id: ModelId,
    /// Whether the opaque primary model is drawn.
    pub visible: bool,
    /// Opacity of the model's ghost copy.
    pub ghost_opacity: f32,
    /// Highlight subset, if this model holds the active highlight.
    pub highlight: Option<HighlightSubset>,
}

/// Snapshot handed to the rendering layer after each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    /// Viewer anchor transform.
    pub anchor: Pose,
    /// Per-model display state, in load order.
    pub models: Vec<ModelRenderState>,
    /// Property panel, if shown.
    pub panel: Option<PropertyPanel>,
    /// Selection mode.
    pub mode: SelectionMode,
}

impl RenderState {
    /// Anchor transform as a matrix.
    #[must_use]
    pub fn anchor_matrix(&self) -> Mat4 {
        self.anchor.matrix()
    }

    /// Panel transform as a matrix.
    #[must_use]
    pub fn panel_matrix(&self) -> Option<Mat4> {
        self.panel.as_ref().map(PropertyPanel::matrix)
    }
}
