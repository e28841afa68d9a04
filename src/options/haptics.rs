use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Haptics", inline)]
#[serde(default)]
/// Haptic pulse parameters for thumbstick locomotion.
pub struct HapticOptions {
    /// Whether pulses are requested at all.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Upper bound on pulse strength.
    #[schemars(title = "Max Strength", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub max_strength: f32,
    /// Pulse length in milliseconds.
    #[schemars(title = "Duration (ms)", range(min = 10, max = 500))]
    pub duration_ms: u64,
}

impl Default for HapticOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            max_strength: 0.75,
            duration_ms: 100,
        }
    }
}
