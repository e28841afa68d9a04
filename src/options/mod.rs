//! Centralized viewer options with TOML preset support.
//!
//! Every tunable of the per-frame core (device layout, locomotion curves,
//! haptics, selection presentation, picking range, frame clamping and the
//! event dispatch table) lives here. Options serialize to/from TOML so a
//! host can ship presets per headset.

mod bindings;
mod frame;
mod haptics;
mod input;
mod locomotion;
mod picking;
mod selection;

use std::path::Path;

pub use bindings::{BindingOptions, EventBinding};
pub use frame::FrameOptions;
pub use haptics::HapticOptions;
pub use input::{DeviceLayout, InputOptions};
pub use locomotion::LocomotionOptions;
pub use picking::PickingOptions;
use schemars::JsonSchema;
pub use selection::SelectionOptions;
use serde::{Deserialize, Serialize};

use crate::error::XrViewError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[locomotion]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Device layout.
    pub input: InputOptions,
    /// Thumbstick, glide, yaw and teleport parameters.
    pub locomotion: LocomotionOptions,
    /// Haptic pulse parameters.
    pub haptics: HapticOptions,
    /// Panel placement and highlight appearance.
    pub selection: SelectionOptions,
    /// Ray picking parameters.
    pub picking: PickingOptions,
    /// Frame timing parameters.
    pub frame: FrameOptions,
    /// Event dispatch table.
    #[schemars(skip)]
    pub bindings: BindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`XrViewError::Io`] if the file cannot be read and
    /// [`XrViewError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, XrViewError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`XrViewError::OptionsParse`] on malformed input.
    pub fn from_toml(content: &str) -> Result<Self, XrViewError> {
        toml::from_str(content)
            .map_err(|e| XrViewError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`XrViewError::OptionsParse`] if serialization fails and
    /// [`XrViewError::Io`] if the file or its parent cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), XrViewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| XrViewError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
