//! Scene state this crate owns or toggles: the loaded model set, element
//! highlight subsets, ghost copies, and the viewer anchor.
//!
//! Models are stored flat in load order. Loading and decoding happen
//! elsewhere; a model arrives here as validated [`ModelGeometry`].

mod anchor;
mod model;

use std::collections::BTreeSet;

pub use anchor::{Pose, ViewerAnchor};
pub use model::{
    ElementId, ElementRef, GhostCopy, HighlightMaterial, HighlightSubset,
    Model, ModelGeometry, ModelId,
};

/// Every loaded model, plus the scene-wide highlight invariant: at most one
/// element is highlighted across the whole set.
#[derive(Debug, Clone)]
pub struct ModelSet {
    /// Models in load order.
    models: Vec<Model>,
    next_model_id: u32,
    ghost_opacity: f32,
    /// Monotonically increasing generation; bumped on any mutation.
    generation: u64,
}

impl Default for ModelSet {
    fn default() -> Self {
        Self::new(0.3)
    }
}

impl ModelSet {
    /// Create an empty set whose ghost copies are drawn at `ghost_opacity`.
    #[must_use]
    pub fn new(ghost_opacity: f32) -> Self {
        Self {
            models: Vec::new(),
            next_model_id: 0,
            ghost_opacity,
            generation: 0,
        }
    }

    /// Add a freshly loaded model and its ghost copy. Returns the new id.
    ///
    /// If a highlight is active the new model starts hidden, like every
    /// other primary model.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        geometry: ModelGeometry,
    ) -> ModelId {
        let id = ModelId(self.next_model_id);
        self.next_model_id += 1;
        let name = name.into();
        log::info!(
            "loaded model {} ({:?}) with {} triangles",
            name,
            id,
            geometry.triangle_count()
        );
        let mut model = Model::new(
            id,
            name,
            geometry,
            GhostCopy {
                opacity: self.ghost_opacity,
            },
        );
        model.visible = self.highlighted().is_none();
        self.models.push(model);
        self.generation += 1;
        id
    }

    /// Look up a model.
    #[must_use]
    pub fn get(&self, id: ModelId) -> Option<&Model> {
        self.models.iter().find(|m| m.id() == id)
    }

    /// Iterate models in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Model> {
        self.models.iter()
    }

    /// Number of loaded models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no model is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Current mutation generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace any active highlight with one containing only `target`, then
    /// hide every primary model so only the highlight and ghosts show.
    ///
    /// Returns `false` (and changes nothing) if `target.model` is not
    /// loaded.
    pub fn highlight(
        &mut self,
        target: ElementRef,
        material: HighlightMaterial,
    ) -> bool {
        if self.get(target.model).is_none() {
            log::warn!("highlight requested for unknown {:?}", target.model);
            return false;
        }
        self.remove_highlights();
        for model in &mut self.models {
            if model.id() == target.model {
                model.highlight = Some(HighlightSubset {
                    elements: BTreeSet::from([target.element]),
                    material,
                    remove_previous: true,
                });
            }
            model.visible = false;
        }
        self.generation += 1;
        true
    }

    /// Remove the highlight subset from every model and show every primary
    /// model again.
    pub fn clear_highlight(&mut self) {
        self.remove_highlights();
        for model in &mut self.models {
            model.visible = true;
        }
        self.generation += 1;
    }

    /// The highlighted element, if any.
    #[must_use]
    pub fn highlighted(&self) -> Option<ElementRef> {
        self.models.iter().find_map(|m| {
            m.highlight.as_ref().and_then(|h| {
                h.elements.iter().next().map(|&element| ElementRef {
                    model: m.id(),
                    element,
                })
            })
        })
    }

    /// Number of models carrying a highlight subset.
    #[must_use]
    pub fn active_highlights(&self) -> usize {
        self.models.iter().filter(|m| m.highlight.is_some()).count()
    }

    /// Whether every primary model is visible.
    #[must_use]
    pub fn all_visible(&self) -> bool {
        self.models.iter().all(Model::visible)
    }

    fn remove_highlights(&mut self) {
        for model in &mut self.models {
            model.highlight = None;
        }
    }
}
