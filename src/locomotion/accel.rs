//! Per-axis acceleration factors for thumbstick locomotion.
//!
//! Each (source, stick axis) pair owns one scalar factor in
//! `floor..=cap`. Holding an axis past the dead-zone ramps the factor
//! multiplicatively every frame; letting it fall under the reset epsilon
//! snaps it back to the floor. Between the epsilon and the dead-zone the
//! factor is held, so brief dips do not throw away a built-up ramp.

use rustc_hash::FxHashMap;

use crate::input::{SourceId, StickAxis};
use crate::options::LocomotionOptions;

/// Ramp law shared by every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelCurve {
    /// Magnitude below which an axis contributes no motion.
    pub dead_zone: f32,
    /// Magnitude below which the factor resets to `floor`.
    pub reset_epsilon: f32,
    /// Starting and reset factor.
    pub floor: f32,
    /// Per-frame multiplier while held.
    pub ramp: f32,
    /// Upper bound.
    pub cap: f32,
}

impl AccelCurve {
    /// Curve described by locomotion options.
    #[must_use]
    pub fn from_options(options: &LocomotionOptions) -> Self {
        Self {
            dead_zone: options.dead_zone,
            reset_epsilon: options.reset_epsilon,
            floor: options.accel_floor,
            ramp: options.accel_ramp,
            cap: options.accel_cap,
        }
    }
}

impl Default for AccelCurve {
    fn default() -> Self {
        Self::from_options(&LocomotionOptions::default())
    }
}

/// One axis's acceleration state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAccelState {
    /// Current speed factor.
    pub factor: f32,
}

impl AxisAccelState {
    fn at_floor(curve: &AccelCurve) -> Self {
        Self {
            factor: curve.floor,
        }
    }

    /// Feed this frame's axis value through the curve.
    ///
    /// Returns the factor to scale displacement by, or `None` when the axis
    /// is inside the dead-zone and contributes nothing.
    pub fn advance(&mut self, curve: &AccelCurve, value: f32) -> Option<f32> {
        let magnitude = value.abs();
        if magnitude > curve.dead_zone {
            self.factor = (self.factor * curve.ramp).min(curve.cap);
            Some(self.factor)
        } else {
            if magnitude < curve.reset_epsilon {
                self.factor = curve.floor;
            }
            None
        }
    }
}

/// Acceleration state for every axis seen this session, keyed by device
/// identity.
#[derive(Debug, Clone, Default)]
pub struct AccelTable {
    curve: AccelCurve,
    states: FxHashMap<(SourceId, StickAxis), AxisAccelState>,
}

impl AccelTable {
    /// Create an empty table using `curve`.
    #[must_use]
    pub fn new(curve: AccelCurve) -> Self {
        Self {
            curve,
            states: FxHashMap::default(),
        }
    }

    /// The ramp law in use.
    #[must_use]
    pub fn curve(&self) -> &AccelCurve {
        &self.curve
    }

    /// Advance one axis, creating its state at the floor on first use.
    pub fn advance(
        &mut self,
        source: SourceId,
        axis: StickAxis,
        value: f32,
    ) -> Option<f32> {
        let curve = self.curve;
        self.states
            .entry((source, axis))
            .or_insert_with(|| AxisAccelState::at_floor(&curve))
            .advance(&curve, value)
    }

    /// Current factor for an axis (the floor if never seen).
    #[must_use]
    pub fn factor(&self, source: SourceId, axis: StickAxis) -> f32 {
        self.states
            .get(&(source, axis))
            .map_or(self.curve.floor, |s| s.factor)
    }

    /// Drop every axis state belonging to `source`.
    pub fn reset_source(&mut self, source: SourceId) {
        self.states.retain(|(s, _), _| *s != source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: SourceId = SourceId(1);

    #[test]
    fn factor_strictly_increases_until_cap() {
        let mut table = AccelTable::default();
        let mut last = table.factor(SRC, StickAxis::X);
        let mut frames = 0;
        while last < 1.0 {
            let f = table.advance(SRC, StickAxis::X, 0.5).unwrap();
            assert!(f > last, "frame {frames}: {f} <= {last}");
            last = f;
            frames += 1;
            assert!(frames < 4000, "never reached the cap");
        }
        assert_eq!(last, 1.0);
        for _ in 0..10 {
            assert_eq!(table.advance(SRC, StickAxis::X, 0.5), Some(1.0));
        }
    }

    #[test]
    fn release_below_epsilon_resets_to_floor() {
        let mut table = AccelTable::default();
        for _ in 0..500 {
            let _ = table.advance(SRC, StickAxis::Y, -0.9);
        }
        assert!(table.factor(SRC, StickAxis::Y) > 0.025);
        assert_eq!(table.advance(SRC, StickAxis::Y, 0.01), None);
        assert_eq!(table.factor(SRC, StickAxis::Y), 0.025);
    }

    #[test]
    fn dip_inside_dead_zone_holds_factor() {
        let mut table = AccelTable::default();
        for _ in 0..100 {
            let _ = table.advance(SRC, StickAxis::X, 0.8);
        }
        let held = table.factor(SRC, StickAxis::X);
        assert_eq!(table.advance(SRC, StickAxis::X, 0.1), None);
        assert_eq!(table.factor(SRC, StickAxis::X), held);
    }

    #[test]
    fn axes_and_sources_are_independent() {
        let mut table = AccelTable::default();
        for _ in 0..50 {
            let _ = table.advance(SRC, StickAxis::X, 1.0);
            let _ = table.advance(SourceId(2), StickAxis::X, 1.0);
        }
        assert_eq!(table.factor(SRC, StickAxis::Y), 0.025);
        table.reset_source(SRC);
        assert_eq!(table.factor(SRC, StickAxis::X), 0.025);
        assert!(table.factor(SourceId(2), StickAxis::X) > 0.025);
    }
}
