//! The per-frame update.
//!
//! [`SessionContext::update`] is the whole frame: poll input, apply
//! arrived property responses, dispatch discrete events through the
//! selection table, integrate locomotion, and snapshot what the renderer
//! needs. It performs no I/O. [`SessionContext::run_frame`] wraps it for
//! the host loop: a panicking update is logged and skipped so the headset
//! view never freezes, and haptic pulses are handed to the host.

use std::panic::{catch_unwind, AssertUnwindSafe};

use super::context::SessionContext;
use super::render::{ModelRenderState, RenderState};
use crate::input::{ControllerEvent, Handedness, InputSession};
use crate::locomotion::{HapticFeedback, HapticPulse, HapticSink};
use crate::scene::Pose;
use crate::selection::{
    EventPayload, ResponseOutcome, SelectionAction, SelectionContext,
};
use crate::util::clamp_dt;

/// Everything the host supplies for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    /// Active input session, if any.
    pub session: Option<&'a InputSession>,
    /// Head pose relative to the viewer anchor.
    pub head: Pose,
    /// Discrete controller events since the last frame, in arrival order.
    pub events: &'a [ControllerEvent],
    /// Seconds since the previous frame (clamped before use).
    pub dt: f32,
}

impl<'a> FrameInput<'a> {
    /// Input for a frame with no events.
    #[must_use]
    pub fn new(session: Option<&'a InputSession>, head: Pose, dt: f32) -> Self {
        Self {
            session,
            head,
            events: &[],
            dt,
        }
    }

    /// Attach this frame's discrete events.
    #[must_use]
    pub fn with_events(mut self, events: &'a [ControllerEvent]) -> Self {
        self.events = events;
        self
    }
}

/// What one frame produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    /// Haptic pulses requested by locomotion.
    pub haptics: Vec<HapticPulse>,
    /// Selection actions run for this frame's events.
    pub actions: Vec<SelectionAction>,
    /// Property responses applied (or discarded) this frame.
    pub responses: Vec<ResponseOutcome>,
    /// Renderer snapshot.
    pub render: RenderState,
}

impl SessionContext {
    /// Advance the session by one frame.
    pub fn update(&mut self, input: &FrameInput<'_>) -> FrameOutput {
        let dt = clamp_dt(input.dt, self.options.frame.max_dt);
        self.frame_index += 1;

        let controllers = self.poller.poll(input.session);
        let responses = self.drain_responses();
        let actions: Vec<SelectionAction> = input
            .events
            .iter()
            .filter_map(|event| self.handle_event(input.session, event))
            .collect();
        let haptics = self.locomotion.update(
            &mut self.anchor,
            &controllers,
            &input.head,
            dt,
        );

        FrameOutput {
            haptics,
            actions,
            responses,
            render: self.render_state(),
        }
    }

    /// Run one frame for the host loop.
    ///
    /// Returns `None` if the update panicked; the session stays usable
    /// and the next frame runs normally.
    pub fn run_frame(
        &mut self,
        input: &FrameInput<'_>,
        sink: &mut dyn HapticSink,
    ) -> Option<FrameOutput> {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.update(input)));
        match outcome {
            Ok(output) => {
                let _ = HapticFeedback::dispatch(&output.haptics, sink);
                Some(output)
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_owned())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_default();
                log::error!(
                    "frame {} update failed, skipping: {reason}",
                    self.frame_index
                );
                None
            }
        }
    }

    /// Snapshot of what the renderer should draw.
    #[must_use]
    pub fn render_state(&self) -> RenderState {
        RenderState {
            anchor: self.anchor.pose(),
            models: self
                .models
                .iter()
                .map(|m| ModelRenderState {
                    id: m.id(),
                    visible: m.visible(),
                    ghost_opacity: m.ghost().opacity,
                    highlight: m.highlight().cloned(),
                })
                .collect(),
            panel: self.selection.panel().cloned(),
            mode: self.selection.mode(),
        }
    }

    /// Dispatch one discrete event. Events from unknown sources still run,
    /// with unknown handedness and the anchor as their position.
    fn handle_event(
        &mut self,
        session: Option<&InputSession>,
        event: &ControllerEvent,
    ) -> Option<SelectionAction> {
        let source = session.and_then(|s| s.source(event.source));
        let hand =
            Handedness::from_label(source.and_then(|s| s.handedness.as_deref()));
        let action = self.dispatch.action_for(event, hand)?;

        let controller_pose = source
            .and_then(|s| s.pose)
            .map(|local| self.anchor.world_pose(&local));
        let pick = if action.needs_pick() {
            controller_pose.and_then(|pose| self.picker.cast(&self.models, &pose))
        } else {
            None
        };
        let payload = EventPayload {
            event: *event,
            hand,
            pick,
            controller: controller_pose
                .map_or_else(|| self.anchor.position(), |p| p.position),
        };

        let mut ctx = SelectionContext {
            selection: &mut self.selection,
            models: &mut self.models,
            requester: &self.resolver,
        };
        self.dispatch.dispatch(&mut ctx, &payload)
    }
}
