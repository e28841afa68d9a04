//! Selection state machine.
//!
//! Converts discrete pick/clear events into one of three presentation
//! modes and owns the floating property panel. Every inspect request and
//! every cancellation bumps a generation counter; a property response is
//! only applied if it carries the current generation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::panel::PropertyPanel;
use super::resolver::{PropertyError, PropertyRequester, PropertyResponse};
use crate::options::SelectionOptions;
use crate::picking::PickResult;
use crate::scene::ModelSet;

/// Presentation mode. Exactly one is active.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Nothing selected.
    #[default]
    Idle,
    /// A property panel was requested or is shown.
    Inspecting,
    /// One element is highlighted and primary models are hidden.
    Highlighting,
}

/// What happened to a property response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// The panel now shows the response.
    Applied,
    /// Lookup failed; the previous panel was kept.
    Failed,
    /// A newer pick or a cancellation superseded the request.
    Stale,
}

/// The pick an in-flight inspect request belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingInspect {
    generation: u64,
    hit: PickResult,
    controller: Vec3,
}

/// Selection state: mode, panel, in-flight inspect request.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    options: SelectionOptions,
    mode: SelectionMode,
    panel: Option<PropertyPanel>,
    generation: u64,
    pending: Option<PendingInspect>,
    last_failure: Option<PropertyError>,
}

impl SelectionController {
    /// Create an idle controller.
    #[must_use]
    pub fn new(options: SelectionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Panel currently shown, if any.
    #[must_use]
    pub fn panel(&self) -> Option<&PropertyPanel> {
        self.panel.as_ref()
    }

    /// Current request generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether an inspect request is awaiting its response.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Most recent property failure, cleared by the next successful panel.
    #[must_use]
    pub fn last_failure(&self) -> Option<&PropertyError> {
        self.last_failure.as_ref()
    }

    /// Request properties for the picked element.
    ///
    /// A miss leaves everything as it is. A hit supersedes any in-flight
    /// request. Inspecting while highlighting keeps the highlight mode.
    pub fn inspect(
        &mut self,
        requester: &dyn PropertyRequester,
        pick: Option<PickResult>,
        controller: Vec3,
    ) {
        let Some(hit) = pick else {
            return;
        };
        self.generation += 1;
        self.pending = Some(PendingInspect {
            generation: self.generation,
            hit,
            controller,
        });
        requester.request(self.generation, hit.element);
        if self.mode != SelectionMode::Highlighting {
            self.mode = SelectionMode::Inspecting;
        }
        log::debug!(
            "inspect {:?} (generation {})",
            hit.element,
            self.generation
        );
    }

    /// Highlight the picked element, or drop the highlight on a miss.
    pub fn highlight(&mut self, models: &mut ModelSet, pick: Option<PickResult>) {
        match pick {
            Some(hit) => {
                if models.highlight(hit.element, self.options.highlight) {
                    self.cancel_pending();
                    self.mode = SelectionMode::Highlighting;
                }
            }
            None if self.mode == SelectionMode::Highlighting => {
                models.clear_highlight();
                self.mode = SelectionMode::Idle;
            }
            None => {}
        }
    }

    /// Drop the highlight and the panel, restore visibility, cancel any
    /// in-flight request and return to idle.
    pub fn clear(&mut self, models: &mut ModelSet) {
        models.clear_highlight();
        self.panel = None;
        self.cancel_pending();
        self.mode = SelectionMode::Idle;
    }

    /// Remove the panel without changing mode.
    pub fn clear_details(&mut self) {
        self.panel = None;
        self.cancel_pending();
    }

    /// Apply a finished lookup if it belongs to the current request.
    pub fn apply_response(&mut self, response: PropertyResponse) -> ResponseOutcome {
        let pending = match self.pending {
            Some(p) if p.generation == response.generation => p,
            _ => {
                log::debug!(
                    "discarding stale properties for {:?} (generation {}, \
                     current {})",
                    response.element,
                    response.generation,
                    self.generation
                );
                return ResponseOutcome::Stale;
            }
        };
        self.pending = None;
        match response.result {
            Ok(properties) => {
                self.panel = Some(PropertyPanel::place(
                    &properties,
                    pending.hit.point,
                    pending.controller,
                    self.options.panel_offset,
                    self.options.panel_scale,
                ));
                self.last_failure = None;
                ResponseOutcome::Applied
            }
            Err(e) => {
                log::warn!("property lookup failed: {e}");
                self.last_failure = Some(e);
                ResponseOutcome::Failed
            }
        }
    }

    fn cancel_pending(&mut self) {
        if self.pending.take().is_some() {
            self.generation += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::scene::{
        ElementId, ElementRef, ModelGeometry, ModelId,
    };
    use crate::selection::ElementProperties;

    /// Records requests instead of resolving them.
    #[derive(Default)]
    struct Requests(RefCell<Vec<(u64, ElementRef)>>);

    impl PropertyRequester for Requests {
        fn request(&self, generation: u64, element: ElementRef) {
            self.0.borrow_mut().push((generation, element));
        }
    }

    fn models() -> (ModelSet, ModelId, ModelId) {
        let tri = |e| {
            ModelGeometry::new(
                vec![Vec3::ZERO, Vec3::X, Vec3::Y],
                vec![[0, 1, 2]],
                vec![ElementId(e)],
            )
            .unwrap()
        };
        let mut set = ModelSet::default();
        let a = set.add("a", tri(1));
        let b = set.add("b", tri(2));
        (set, a, b)
    }

    fn hit(model: ModelId, element: u32, z: f32) -> PickResult {
        PickResult {
            element: ElementRef {
                model,
                element: ElementId(element),
            },
            point: Vec3::new(0.0, 0.0, z),
            distance: -z,
            face: 0,
        }
    }

    fn answer(generation: u64, pick: &PickResult, name: &str) -> PropertyResponse {
        PropertyResponse {
            generation,
            element: pick.element,
            result: Ok(ElementProperties {
                element: pick.element,
                express_id: pick.element.element.0,
                name: Some(name.into()),
            }),
        }
    }

    #[test]
    fn second_highlight_replaces_first() {
        let (mut set, a, b) = models();
        let mut sel = SelectionController::default();
        sel.highlight(&mut set, Some(hit(a, 1, -5.0)));
        sel.highlight(&mut set, Some(hit(b, 2, -5.0)));
        assert_eq!(sel.mode(), SelectionMode::Highlighting);
        assert_eq!(set.active_highlights(), 1);
        assert_eq!(
            set.highlighted(),
            Some(ElementRef {
                model: b,
                element: ElementId(2)
            })
        );
    }

    #[test]
    fn clear_while_highlighting_restores_everything() {
        let (mut set, a, _) = models();
        let mut sel = SelectionController::default();
        sel.highlight(&mut set, Some(hit(a, 1, -5.0)));
        assert!(!set.all_visible());
        sel.clear(&mut set);
        assert_eq!(sel.mode(), SelectionMode::Idle);
        assert!(set.all_visible());
        assert_eq!(set.active_highlights(), 0);
    }

    #[test]
    fn highlight_miss_clears_only_when_highlighting() {
        let (mut set, a, _) = models();
        let mut sel = SelectionController::default();
        let req = Requests::default();
        sel.inspect(&req, Some(hit(a, 1, -5.0)), Vec3::ZERO);
        sel.highlight(&mut set, None);
        assert_eq!(sel.mode(), SelectionMode::Inspecting);

        sel.highlight(&mut set, Some(hit(a, 1, -5.0)));
        sel.highlight(&mut set, None);
        assert_eq!(sel.mode(), SelectionMode::Idle);
        assert!(set.all_visible());
    }

    #[test]
    fn inspect_places_panel_on_response() {
        let (_, a, _) = models();
        let mut sel = SelectionController::default();
        let req = Requests::default();
        let pick = hit(a, 1, -5.0);
        sel.inspect(&req, Some(pick), Vec3::ZERO);
        assert_eq!(sel.mode(), SelectionMode::Inspecting);
        let (generation, element) = req.0.borrow()[0];
        assert_eq!(element, pick.element);

        let outcome = sel.apply_response(answer(generation, &pick, "Slab"));
        assert_eq!(outcome, ResponseOutcome::Applied);
        let panel = sel.panel().unwrap();
        assert_eq!(panel.lines[1], "Name: Slab");
        assert!((panel.position - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-5);
        assert!(!sel.has_pending());
    }

    #[test]
    fn last_pick_wins() {
        let (_, a, b) = models();
        let mut sel = SelectionController::default();
        let req = Requests::default();
        let first = hit(a, 1, -5.0);
        let second = hit(b, 2, -3.0);
        sel.inspect(&req, Some(first), Vec3::ZERO);
        sel.inspect(&req, Some(second), Vec3::ZERO);
        let gens: Vec<u64> = req.0.borrow().iter().map(|r| r.0).collect();

        // The older answer arrives last and must not win.
        assert_eq!(
            sel.apply_response(answer(gens[1], &second, "New")),
            ResponseOutcome::Applied
        );
        assert_eq!(
            sel.apply_response(answer(gens[0], &first, "Old")),
            ResponseOutcome::Stale
        );
        assert_eq!(sel.panel().unwrap().lines[1], "Name: New");
    }

    #[test]
    fn cancellation_discards_in_flight_answer() {
        let (mut set, a, _) = models();
        let mut sel = SelectionController::default();
        let req = Requests::default();
        let pick = hit(a, 1, -5.0);
        sel.inspect(&req, Some(pick), Vec3::ZERO);
        let generation = req.0.borrow()[0].0;
        sel.clear(&mut set);
        assert_eq!(
            sel.apply_response(answer(generation, &pick, "Late")),
            ResponseOutcome::Stale
        );
        assert!(sel.panel().is_none());
    }

    #[test]
    fn highlight_supersedes_in_flight_inspect() {
        let (mut set, a, _) = models();
        let mut sel = SelectionController::default();
        let req = Requests::default();
        let pick = hit(a, 1, -5.0);
        sel.inspect(&req, Some(pick), Vec3::ZERO);
        let generation = req.0.borrow()[0].0;
        sel.highlight(&mut set, Some(pick));
        assert_eq!(sel.mode(), SelectionMode::Highlighting);
        assert!(!sel.has_pending());
        assert_eq!(
            sel.apply_response(answer(generation, &pick, "Late")),
            ResponseOutcome::Stale
        );
        assert!(sel.panel().is_none());
    }

    #[test]
    fn clear_removes_panel() {
        let (mut set, a, _) = models();
        let mut sel = SelectionController::default();
        let req = Requests::default();
        let pick = hit(a, 1, -5.0);
        sel.inspect(&req, Some(pick), Vec3::ZERO);
        let _ = sel.apply_response(answer(sel.generation(), &pick, "Door"));
        assert!(sel.panel().is_some());
        sel.clear(&mut set);
        assert_eq!(sel.mode(), SelectionMode::Idle);
        assert!(sel.panel().is_none());
    }

    #[test]
    fn failure_keeps_previous_panel() {
        let (_, a, _) = models();
        let mut sel = SelectionController::default();
        let req = Requests::default();
        let pick = hit(a, 1, -5.0);
        sel.inspect(&req, Some(pick), Vec3::ZERO);
        let _ = sel.apply_response(answer(sel.generation(), &pick, "Kept"));

        sel.inspect(&req, Some(pick), Vec3::ZERO);
        let failed = PropertyResponse {
            generation: sel.generation(),
            element: pick.element,
            result: Err(PropertyError::NotFound(pick.element)),
        };
        assert_eq!(sel.apply_response(failed), ResponseOutcome::Failed);
        assert_eq!(sel.panel().unwrap().lines[1], "Name: Kept");
        assert_eq!(
            sel.last_failure(),
            Some(&PropertyError::NotFound(pick.element))
        );
    }

    #[test]
    fn clear_details_keeps_mode() {
        let (mut set, a, _) = models();
        let mut sel = SelectionController::default();
        let req = Requests::default();
        let pick = hit(a, 1, -5.0);
        sel.highlight(&mut set, Some(pick));
        sel.inspect(&req, Some(pick), Vec3::ZERO);
        let _ = sel.apply_response(answer(sel.generation(), &pick, "Beam"));
        assert_eq!(sel.mode(), SelectionMode::Highlighting);
        sel.clear_details();
        assert!(sel.panel().is_none());
        assert_eq!(sel.mode(), SelectionMode::Highlighting);
        assert_eq!(set.active_highlights(), 1);
    }

    #[test]
    fn inspect_miss_is_a_no_op() {
        let mut sel = SelectionController::default();
        let req = Requests::default();
        sel.inspect(&req, None, Vec3::ZERO);
        assert_eq!(sel.mode(), SelectionMode::Idle);
        assert!(req.0.borrow().is_empty());
    }
}
