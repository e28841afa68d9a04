use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ray picking parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Picking", inline)]
#[serde(default)]
pub struct PickingOptions {
    /// Hits farther than this (metres) are ignored.
    #[schemars(title = "Max Distance", range(min = 1.0, max = 10000.0))]
    pub max_distance: f32,
}

impl Default for PickingOptions {
    fn default() -> Self {
        Self {
            max_distance: 1000.0,
        }
    }
}
