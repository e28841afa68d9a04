//! Event dispatch table: (event kind, hand) to selection handler.
//!
//! Handlers are plain function pointers taking the selection context and
//! the event payload explicitly, so they can be driven without a live
//! input session.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::controller::SelectionController;
use super::resolver::PropertyRequester;
use crate::input::{ControllerEvent, Handedness};
use crate::options::BindingOptions;
use crate::picking::PickResult;
use crate::scene::ModelSet;

/// Which hand a binding row accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandFilter {
    /// Left-hand events only.
    Left,
    /// Right-hand events only.
    Right,
    /// Any hand, including unknown.
    Any,
}

impl HandFilter {
    /// Whether an event from `hand` passes the filter.
    #[must_use]
    pub fn matches(self, hand: Handedness) -> bool {
        match self {
            Self::Left => hand == Handedness::Left,
            Self::Right => hand == Handedness::Right,
            Self::Any => true,
        }
    }
}

/// Selection operations an event can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionAction {
    /// Pick and request the element's properties.
    Inspect,
    /// Pick and highlight the element (a miss clears).
    Highlight,
    /// Drop the highlight and return to idle.
    Clear,
    /// Remove the property panel.
    ClearDetails,
}

impl SelectionAction {
    /// Whether the action needs a pick from the issuing controller.
    #[must_use]
    pub fn needs_pick(self) -> bool {
        matches!(self, Self::Inspect | Self::Highlight)
    }
}

/// Everything a handler may touch.
pub struct SelectionContext<'a> {
    /// Selection state.
    pub selection: &'a mut SelectionController,
    /// Loaded models.
    pub models: &'a mut ModelSet,
    /// Where inspect requests go.
    pub requester: &'a dyn PropertyRequester,
}

/// One event with what the frame knew when it fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventPayload {
    /// The event.
    pub event: ControllerEvent,
    /// Hand of the issuing controller.
    pub hand: Handedness,
    /// Pick along the issuing controller's ray, if the action wanted one.
    pub pick: Option<PickResult>,
    /// Issuing controller's world position.
    pub controller: Vec3,
}

/// Handler signature.
pub type Handler = fn(&mut SelectionContext<'_>, &EventPayload);

fn on_inspect(ctx: &mut SelectionContext<'_>, payload: &EventPayload) {
    ctx.selection
        .inspect(ctx.requester, payload.pick, payload.controller);
}

fn on_highlight(ctx: &mut SelectionContext<'_>, payload: &EventPayload) {
    ctx.selection.highlight(ctx.models, payload.pick);
}

fn on_clear(ctx: &mut SelectionContext<'_>, _: &EventPayload) {
    ctx.selection.clear(ctx.models);
}

fn on_clear_details(ctx: &mut SelectionContext<'_>, _: &EventPayload) {
    ctx.selection.clear_details();
}

/// Table mapping events to handlers.
#[derive(Debug, Clone, Default)]
pub struct EventDispatch {
    bindings: BindingOptions,
}

impl EventDispatch {
    /// Build a table from binding options.
    #[must_use]
    pub fn new(bindings: BindingOptions) -> Self {
        Self { bindings }
    }

    /// Action bound to an event, if any.
    #[must_use]
    pub fn action_for(
        &self,
        event: &ControllerEvent,
        hand: Handedness,
    ) -> Option<SelectionAction> {
        self.bindings.lookup(event.kind, hand)
    }

    /// Handler implementing an action.
    #[must_use]
    pub fn handler(action: SelectionAction) -> Handler {
        match action {
            SelectionAction::Inspect => on_inspect,
            SelectionAction::Highlight => on_highlight,
            SelectionAction::Clear => on_clear,
            SelectionAction::ClearDetails => on_clear_details,
        }
    }

    /// Run the handler bound to `payload.event`. Returns the action run.
    pub fn dispatch(
        &self,
        ctx: &mut SelectionContext<'_>,
        payload: &EventPayload,
    ) -> Option<SelectionAction> {
        let action = self.action_for(&payload.event, payload.hand)?;
        Self::handler(action)(ctx, payload);
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{EventKind, SourceId};
    use crate::scene::{ElementId, ElementRef, ModelGeometry};
    use crate::selection::SelectionMode;

    struct Ignore;

    impl PropertyRequester for Ignore {
        fn request(&self, _: u64, _: ElementRef) {}
    }

    fn payload(kind: EventKind, hand: Handedness, pick: Option<PickResult>) -> EventPayload {
        EventPayload {
            event: ControllerEvent::new(SourceId(0), kind),
            hand,
            pick,
            controller: Vec3::ZERO,
        }
    }

    #[test]
    fn select_then_squeeze_runs_highlight_and_clear() {
        let mut models = ModelSet::default();
        let a = models.add(
            "a",
            ModelGeometry::new(
                vec![Vec3::ZERO, Vec3::X, Vec3::Y],
                vec![[0, 1, 2]],
                vec![ElementId(3)],
            )
            .unwrap(),
        );
        let pick = PickResult {
            element: ElementRef {
                model: a,
                element: ElementId(3),
            },
            point: Vec3::ZERO,
            distance: 1.0,
            face: 0,
        };
        let mut selection = SelectionController::default();
        let mut ctx = SelectionContext {
            selection: &mut selection,
            models: &mut models,
            requester: &Ignore,
        };
        let table = EventDispatch::default();

        let ran = table.dispatch(
            &mut ctx,
            &payload(EventKind::SelectStart, Handedness::Left, Some(pick)),
        );
        assert_eq!(ran, Some(SelectionAction::Highlight));
        assert_eq!(ctx.selection.mode(), SelectionMode::Highlighting);

        let ran = table.dispatch(
            &mut ctx,
            &payload(EventKind::SqueezeStart, Handedness::Left, None),
        );
        assert_eq!(ran, Some(SelectionAction::Clear));
        assert_eq!(ctx.selection.mode(), SelectionMode::Idle);
        assert!(ctx.models.all_visible());
    }

    #[test]
    fn unbound_events_do_nothing() {
        let mut models = ModelSet::default();
        let mut selection = SelectionController::default();
        let mut ctx = SelectionContext {
            selection: &mut selection,
            models: &mut models,
            requester: &Ignore,
        };
        let table = EventDispatch::default();
        let ran = table.dispatch(
            &mut ctx,
            &payload(EventKind::SelectEnd, Handedness::Right, None),
        );
        assert_eq!(ran, None);
    }

    #[test]
    fn only_pick_actions_need_a_pick() {
        assert!(SelectionAction::Inspect.needs_pick());
        assert!(SelectionAction::Highlight.needs_pick());
        assert!(!SelectionAction::Clear.needs_pick());
        assert!(!SelectionAction::ClearDetails.needs_pick());
    }
}
