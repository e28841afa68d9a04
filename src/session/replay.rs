//! Recorded input traces and their replay.
//!
//! A trace is a JSON document holding the models of a scene (geometry plus
//! element properties) and a list of frames (head pose, input session and
//! discrete events). Replaying drives a fresh [`SessionContext`] through
//! every frame, waiting for property lookups between frames so the
//! outcome does not depend on thread timing.

use std::path::Path;
use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use super::context::SessionContext;
use super::frame::FrameInput;
use crate::error::XrViewError;
use crate::input::{ControllerEvent, InputSession, SourceId};
use crate::locomotion::HapticSink;
use crate::options::Options;
use crate::scene::{
    ElementId, ElementRef, ModelGeometry, ModelId, Pose,
};
use crate::selection::{
    ElementProperties, SelectionMode, StaticPropertyTable,
};

/// One element's recorded properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceProperty {
    /// Element id within its model.
    pub element: u32,
    /// Element name, if recorded.
    #[serde(default)]
    pub name: Option<String>,
}

/// One recorded model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceModel {
    /// Display name.
    pub name: String,
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Triangle vertex indices.
    pub triangles: Vec<[u32; 3]>,
    /// Owning element per triangle.
    pub elements: Vec<u32>,
    /// Element properties.
    #[serde(default)]
    pub properties: Vec<TraceProperty>,
}

fn default_dt() -> f32 {
    1.0 / 72.0
}

/// One recorded frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceFrame {
    /// Seconds since the previous frame.
    #[serde(default = "default_dt")]
    pub dt: f32,
    /// Head pose relative to the anchor.
    #[serde(default)]
    pub head: Pose,
    /// Input session; absent means no session this frame.
    #[serde(default)]
    pub session: Option<InputSession>,
    /// Discrete events.
    #[serde(default)]
    pub events: Vec<ControllerEvent>,
}

/// A recorded session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trace {
    /// Models, in load order.
    #[serde(default)]
    pub models: Vec<TraceModel>,
    /// Frames, in order.
    #[serde(default)]
    pub frames: Vec<TraceFrame>,
}

/// Outcome of a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    /// Frames that ran.
    pub frames: usize,
    /// Frames whose update failed and was skipped.
    pub skipped_frames: usize,
    /// Final anchor transform.
    pub anchor: Pose,
    /// Final selection mode.
    pub mode: SelectionMode,
    /// Final highlighted element.
    pub highlighted: Option<ElementRef>,
    /// Final panel text, empty if no panel is shown.
    pub panel_lines: Vec<String>,
    /// Haptic pulses requested across the replay.
    pub pulses: usize,
}

/// Haptic sink that accepts and counts every pulse.
#[derive(Debug, Default)]
struct CountingSink {
    issued: usize,
}

impl HapticSink for CountingSink {
    fn pulse(&mut self, source: SourceId, strength: f32, duration: Duration) -> bool {
        log::trace!("pulse {source:?} strength {strength:.2} for {duration:?}");
        self.issued += 1;
        true
    }
}

impl Trace {
    /// Parse a trace from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`XrViewError::TraceParse`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, XrViewError> {
        serde_json::from_str(json).map_err(|e| XrViewError::TraceParse(e.to_string()))
    }

    /// Load a trace from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`XrViewError::Io`] if the file cannot be read and
    /// [`XrViewError::TraceParse`] if it is not a valid trace.
    pub fn load(path: &Path) -> Result<Self, XrViewError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Validated geometry for every model, in load order.
    ///
    /// # Errors
    ///
    /// Returns [`XrViewError::InvalidGeometry`] naming the first bad model.
    pub fn geometries(&self) -> Result<Vec<ModelGeometry>, XrViewError> {
        self.models
            .iter()
            .map(|m| {
                ModelGeometry::new(
                    m.positions.iter().copied().map(Vec3::from).collect(),
                    m.triangles.clone(),
                    m.elements.iter().copied().map(ElementId).collect(),
                )
                .map_err(|e| match e {
                    XrViewError::InvalidGeometry(msg) => XrViewError::InvalidGeometry(
                        format!("model `{}`: {msg}", m.name),
                    ),
                    other => other,
                })
            })
            .collect()
    }

    /// Property table for the trace's models. Model ids follow load order.
    #[must_use]
    pub fn property_table(&self) -> StaticPropertyTable {
        self.models
            .iter()
            .enumerate()
            .flat_map(|(index, model)| {
                let id = ModelId(index as u32);
                model.properties.iter().map(move |p| ElementProperties {
                    element: ElementRef {
                        model: id,
                        element: ElementId(p.element),
                    },
                    express_id: p.element,
                    name: p.name.clone(),
                })
            })
            .collect()
    }

    /// Replay every frame through a fresh session.
    ///
    /// Between frames, an in-flight inspect request is given up to `settle`
    /// to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if a model's geometry is invalid or the session
    /// cannot start.
    pub fn replay(
        &self,
        options: Options,
        settle: Duration,
    ) -> Result<ReplaySummary, XrViewError> {
        let geometries = self.geometries()?;
        let mut session =
            SessionContext::new(options, Arc::new(self.property_table()))?;
        for (model, geometry) in self.models.iter().zip(geometries) {
            let _ = session.add_model(model.name.as_str(), geometry);
        }

        let mut sink = CountingSink::default();
        let mut skipped = 0;
        for frame in &self.frames {
            let input = FrameInput::new(frame.session.as_ref(), frame.head, frame.dt)
                .with_events(&frame.events);
            if session.run_frame(&input, &mut sink).is_none() {
                skipped += 1;
            }
            let _ = session.settle(settle);
        }

        let render = session.render_state();
        Ok(ReplaySummary {
            frames: self.frames.len(),
            skipped_frames: skipped,
            anchor: render.anchor,
            mode: render.mode,
            highlighted: session.models().highlighted(),
            panel_lines: render.panel.map(|p| p.lines).unwrap_or_default(),
            pulses: sink.issued,
        })
    }
}
