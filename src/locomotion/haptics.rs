//! Maps stick deflection to haptic pulse requests.

use web_time::Duration;

use crate::input::{PolledController, SourceId};
use crate::options::HapticOptions;

/// A pulse to send to one controller's actuator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HapticPulse {
    /// Target controller.
    pub source: SourceId,
    /// Strength in `0.0..=1.0`.
    pub strength: f32,
    /// Pulse length.
    pub duration: Duration,
}

/// Host capability that drives haptic actuators.
pub trait HapticSink {
    /// Fire a pulse. Returns whether the host actually issued it.
    fn pulse(
        &mut self,
        source: SourceId,
        strength: f32,
        duration: Duration,
    ) -> bool;
}

/// Sink for hosts without haptics; declines every pulse.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl HapticSink for NoHaptics {
    fn pulse(&mut self, _: SourceId, _: f32, _: Duration) -> bool {
        false
    }
}

/// Turns stick magnitude into pulse requests.
#[derive(Debug, Clone, PartialEq)]
pub struct HapticFeedback {
    options: HapticOptions,
}

impl HapticFeedback {
    /// Create a mapper from haptic options.
    #[must_use]
    pub fn new(options: HapticOptions) -> Self {
        Self { options }
    }

    /// Pulse for a controller whose stick is past the dead-zone.
    ///
    /// Strength is the summed absolute stick deflection, capped. Devices
    /// without an actuator get nothing.
    #[must_use]
    pub fn pulse_for(&self, controller: &PolledController) -> Option<HapticPulse> {
        if !self.options.enabled {
            return None;
        }
        if !controller.has_haptics {
            log::trace!("{:?} has no haptic actuator", controller.source());
            return None;
        }
        Some(HapticPulse {
            source: controller.source(),
            strength: controller
                .current
                .stick_magnitude()
                .min(self.options.max_strength),
            duration: Duration::from_millis(self.options.duration_ms),
        })
    }

    /// Hand pulses to the host. Returns how many were issued.
    pub fn dispatch(pulses: &[HapticPulse], sink: &mut dyn HapticSink) -> usize {
        pulses
            .iter()
            .filter(|p| {
                let issued = sink.pulse(p.source, p.strength, p.duration);
                if !issued {
                    log::trace!("haptic pulse on {:?} declined", p.source);
                }
                issued
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use web_time::Instant;

    use super::*;
    use crate::input::{ControllerSnapshot, GamepadState, Handedness};
    use crate::options::DeviceLayout;

    fn controller(axes: &[f32], has_haptics: bool) -> PolledController {
        let pad = GamepadState {
            buttons: vec![],
            axes: axes.to_vec(),
            has_haptics,
        };
        PolledController {
            current: ControllerSnapshot::capture(
                SourceId(4),
                Handedness::Right,
                &pad,
                &DeviceLayout::default(),
                Instant::now(),
            ),
            previous: None,
            has_haptics,
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<(SourceId, f32, Duration)>);

    impl HapticSink for Recorder {
        fn pulse(&mut self, s: SourceId, strength: f32, d: Duration) -> bool {
            self.0.push((s, strength, d));
            true
        }
    }

    #[test]
    fn strength_is_capped_sum_of_axes() {
        let fb = HapticFeedback::new(HapticOptions::default());
        let soft = fb.pulse_for(&controller(&[0.0, 0.0, 0.3, -0.2], true));
        assert!((soft.unwrap().strength - 0.5).abs() < 1e-6);
        let hard = fb.pulse_for(&controller(&[0.0, 0.0, 0.9, 0.9], true));
        assert_eq!(hard.unwrap().strength, 0.75);
        assert_eq!(hard.unwrap().duration, Duration::from_millis(100));
    }

    #[test]
    fn missing_actuator_is_skipped() {
        let fb = HapticFeedback::new(HapticOptions::default());
        assert!(fb.pulse_for(&controller(&[0.0, 0.0, 0.9, 0.0], false)).is_none());
    }

    #[test]
    fn dispatch_counts_issued_pulses() {
        let pulse = HapticPulse {
            source: SourceId(1),
            strength: 0.3,
            duration: Duration::from_millis(100),
        };
        let mut rec = Recorder::default();
        assert_eq!(HapticFeedback::dispatch(&[pulse, pulse], &mut rec), 2);
        assert_eq!(rec.0.len(), 2);
        assert_eq!(HapticFeedback::dispatch(&[pulse], &mut NoHaptics), 0);
    }
}
