use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scene::HighlightMaterial;

/// Property panel placement and highlight appearance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Selection", inline)]
#[serde(default)]
pub struct SelectionOptions {
    /// Fraction of the way from the hit point toward the controller at which
    /// the property panel is placed.
    #[schemars(title = "Panel Offset", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub panel_offset: f32,
    /// Uniform scale of the property panel.
    #[schemars(title = "Panel Scale", range(min = 0.05, max = 2.0), extend("step" = 0.05))]
    pub panel_scale: f32,
    /// Material of the highlighted element.
    #[schemars(skip)]
    pub highlight: HighlightMaterial,
    /// Opacity of the ghost copy left visible behind a highlight.
    #[schemars(title = "Ghost Opacity", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub ghost_opacity: f32,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            panel_offset: 0.2,
            panel_scale: 0.3,
            highlight: HighlightMaterial::default(),
            ghost_opacity: 0.3,
        }
    }
}
