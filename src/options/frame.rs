use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Frame timing parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Frame", inline)]
#[serde(default)]
pub struct FrameOptions {
    /// Largest elapsed time (seconds) a single update integrates. Longer
    /// gaps, e.g. after a stall, are clamped to this.
    #[schemars(title = "Max Frame Time", range(min = 0.005, max = 1.0), extend("step" = 0.005))]
    pub max_dt: f32,
    /// Frame-rate cap for hosts driving [`FrameClock`](crate::util::FrameClock)
    /// (0 = unlimited).
    #[schemars(skip)]
    pub target_fps: u32,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            max_dt: 0.1,
            target_fps: 0,
        }
    }
}
