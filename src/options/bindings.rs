use serde::{Deserialize, Serialize};

use crate::input::{EventKind, Handedness};
use crate::selection::{HandFilter, SelectionAction};

/// One row of the event dispatch table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventBinding {
    /// Event that triggers the action.
    pub event: EventKind,
    /// Which hand the event must come from.
    pub hand: HandFilter,
    /// Selection action to run.
    pub action: SelectionAction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Configurable mapping from controller events to selection actions.
pub struct BindingOptions {
    /// Dispatch rows. Hand-specific rows win over `any` rows.
    pub events: Vec<EventBinding>,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            events: vec![
                EventBinding {
                    event: EventKind::SelectStart,
                    hand: HandFilter::Right,
                    action: SelectionAction::Inspect,
                },
                EventBinding {
                    event: EventKind::SelectStart,
                    hand: HandFilter::Left,
                    action: SelectionAction::Highlight,
                },
                EventBinding {
                    event: EventKind::SqueezeStart,
                    hand: HandFilter::Left,
                    action: SelectionAction::Clear,
                },
                EventBinding {
                    event: EventKind::SqueezeStart,
                    hand: HandFilter::Right,
                    action: SelectionAction::ClearDetails,
                },
            ],
        }
    }
}

impl BindingOptions {
    /// Action bound to `event` from `hand`, if any.
    ///
    /// Unknown hands only match `any` rows.
    #[must_use]
    pub fn lookup(
        &self,
        event: EventKind,
        hand: Handedness,
    ) -> Option<SelectionAction> {
        let exact = self.events.iter().find(|b| {
            b.event == event && b.hand != HandFilter::Any && b.hand.matches(hand)
        });
        exact
            .or_else(|| {
                self.events
                    .iter()
                    .find(|b| b.event == event && b.hand == HandFilter::Any)
            })
            .map(|b| b.action)
    }
}
