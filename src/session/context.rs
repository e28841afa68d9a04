use std::sync::Arc;

use glam::Vec3;
use web_time::Duration;

use crate::error::XrViewError;
use crate::input::InputPoller;
use crate::locomotion::LocomotionController;
use crate::options::Options;
use crate::picking::PickEngine;
use crate::scene::{ModelGeometry, ModelId, ModelSet, ViewerAnchor};
use crate::selection::{
    EventDispatch, PropertyResolver, PropertySource, ResponseOutcome,
    SelectionController,
};

/// Everything one viewing session owns.
///
/// Threaded explicitly through every frame update; nothing in the crate
/// keeps per-session state anywhere else.
#[derive(Debug)]
pub struct SessionContext {
    pub(super) options: Options,
    pub(super) anchor: ViewerAnchor,
    pub(super) models: ModelSet,
    pub(super) poller: InputPoller,
    pub(super) picker: PickEngine,
    pub(super) selection: SelectionController,
    pub(super) locomotion: LocomotionController,
    pub(super) dispatch: EventDispatch,
    pub(super) resolver: PropertyResolver,
    pub(super) frame_index: u64,
}

impl SessionContext {
    /// Start a session. The anchor starts at the teleport origin.
    ///
    /// # Errors
    ///
    /// Returns [`XrViewError::ThreadSpawn`] if the property resolver thread
    /// cannot be started.
    pub fn new(
        options: Options,
        properties: Arc<dyn PropertySource>,
    ) -> Result<Self, XrViewError> {
        let resolver = PropertyResolver::new(properties)?;
        Ok(Self {
            anchor: ViewerAnchor::new(Vec3::from(
                options.locomotion.teleport_origin,
            )),
            models: ModelSet::new(options.selection.ghost_opacity),
            poller: InputPoller::new(options.input.layout),
            picker: PickEngine::new(options.picking.max_distance),
            selection: SelectionController::new(options.selection.clone()),
            locomotion: LocomotionController::new(
                options.locomotion.clone(),
                options.haptics.clone(),
            ),
            dispatch: EventDispatch::new(options.bindings.clone()),
            resolver,
            frame_index: 0,
            options,
        })
    }

    /// Add a freshly loaded model.
    pub fn add_model(
        &mut self,
        name: impl Into<String>,
        geometry: ModelGeometry,
    ) -> ModelId {
        self.models.add(name, geometry)
    }

    /// Options the session was started with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The viewer anchor.
    #[must_use]
    pub fn anchor(&self) -> &ViewerAnchor {
        &self.anchor
    }

    /// Loaded models.
    #[must_use]
    pub fn models(&self) -> &ModelSet {
        &self.models
    }

    /// Selection state.
    #[must_use]
    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Locomotion state.
    #[must_use]
    pub fn locomotion(&self) -> &LocomotionController {
        &self.locomotion
    }

    /// Number of frames updated so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Apply every property response that has arrived.
    pub fn drain_responses(&mut self) -> Vec<ResponseOutcome> {
        let mut outcomes = Vec::new();
        while let Some(response) = self.resolver.try_recv() {
            outcomes.push(self.selection.apply_response(response));
        }
        outcomes
    }

    /// Wait up to `timeout` for the in-flight inspect request to finish.
    ///
    /// Returns `None` if nothing is pending or nothing arrived in time.
    /// Blocks; hosts call this outside the frame loop (e.g. in replays).
    pub fn settle(&mut self, timeout: Duration) -> Option<ResponseOutcome> {
        if !self.selection.has_pending() {
            return None;
        }
        let response = self.resolver.wait(timeout)?;
        Some(self.selection.apply_response(response))
    }
}
