//! Per-frame input polling with one-frame history.
//!
//! The `InputPoller` owns the only piece of cross-frame input state: the
//! previous snapshot of every physical source. Each poll produces fresh
//! snapshots and pairs them with the prior frame's for edge detection.

use rustc_hash::FxHashMap;
use web_time::Instant;

use super::event::Handedness;
use super::snapshot::{ButtonName, ControllerSnapshot};
use super::source::{InputSession, SourceId};
use crate::options::DeviceLayout;

/// One controller's current snapshot paired with last frame's.
#[derive(Debug, Clone)]
pub struct PolledController {
    /// This frame's snapshot.
    pub current: ControllerSnapshot,
    /// Last frame's snapshot for the same source, or `None` on first
    /// contact.
    pub previous: Option<ControllerSnapshot>,
    /// Whether the device has a haptic actuator.
    pub has_haptics: bool,
}

impl PolledController {
    /// Source identity.
    #[must_use]
    pub fn source(&self) -> SourceId {
        self.current.source
    }

    /// Hand the controller is held in.
    #[must_use]
    pub fn handedness(&self) -> Handedness {
        self.current.handedness
    }

    /// Whether a button's value differs from last frame.
    ///
    /// Always `false` on first contact.
    #[must_use]
    pub fn changed(&self, name: ButtonName) -> bool {
        self.previous
            .as_ref()
            .is_some_and(|prev| prev.button(name) != self.current.button(name))
    }

    /// Whether a button is fully pressed this frame.
    #[must_use]
    pub fn held(&self, name: ButtonName) -> bool {
        self.current.button(name) >= 1.0
    }

    /// Whether a button reached fully pressed this frame, having been below
    /// it last frame.
    ///
    /// Fires once per physical press; holding the button does not re-fire.
    #[must_use]
    pub fn pressed(&self, name: ButtonName) -> bool {
        self.previous.as_ref().is_some_and(|prev| {
            prev.button(name) < 1.0 && self.current.button(name) >= 1.0
        })
    }
}

/// Reads the input session once per frame.
#[derive(Debug, Default)]
pub struct InputPoller {
    layout: DeviceLayout,
    previous: FxHashMap<SourceId, ControllerSnapshot>,
}

impl InputPoller {
    /// Create a poller resolving devices through `layout`.
    #[must_use]
    pub fn new(layout: DeviceLayout) -> Self {
        Self {
            layout,
            previous: FxHashMap::default(),
        }
    }

    /// Poll every source that carries a gamepad.
    ///
    /// A missing session or an empty source list yields an empty result.
    /// Sources without a device are skipped. History for sources not seen
    /// this frame is dropped, so a source that reappears starts over.
    pub fn poll(
        &mut self,
        session: Option<&InputSession>,
    ) -> Vec<PolledController> {
        let Some(session) = session else {
            self.previous.clear();
            return Vec::new();
        };

        let now = Instant::now();
        let mut polled = Vec::with_capacity(session.sources.len());
        let mut history = FxHashMap::default();

        for source in &session.sources {
            let Some(gamepad) = &source.gamepad else {
                continue;
            };
            let handedness = Handedness::from_label(source.handedness.as_deref());
            let current = ControllerSnapshot::capture(
                source.id,
                handedness,
                gamepad,
                &self.layout,
                now,
            );
            let previous = self.previous.remove(&source.id);
            let _ = history.insert(source.id, current.clone());
            polled.push(PolledController {
                current,
                previous,
                has_haptics: gamepad.has_haptics,
            });
        }

        self.previous = history;
        log::trace!("polled {} controller(s)", polled.len());
        polled
    }

    /// Number of sources with retained history.
    #[must_use]
    pub fn tracked_sources(&self) -> usize {
        self.previous.len()
    }
}
