use web_time::{Duration, Instant};

use crate::options::FrameOptions;

/// Clamp a raw frame delta into `0.0..=max_dt`. Non-finite deltas become
/// zero so a bad timestamp never moves the viewer.
#[must_use]
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, max_dt)
    } else {
        0.0
    }
}

/// Frame clock for hosts without their own timing: clamped deltas, a
/// smoothed FPS and optional frame limiting.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Largest delta handed out
    max_dt: f32,
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameClock {
    /// Create a clock from frame options, starting now.
    #[must_use]
    pub fn new(options: &FrameOptions) -> Self {
        Self::starting_at(options, Instant::now())
    }

    /// Create a clock whose first frame starts at `start`.
    #[must_use]
    pub fn starting_at(options: &FrameOptions, start: Instant) -> Self {
        let min_frame_duration = if options.target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(options.target_fps))
        } else {
            Duration::ZERO
        };

        Self {
            target_fps: options.target_fps,
            min_frame_duration,
            max_dt: options.max_dt,
            last_frame: start,
            smoothed_fps: 72.0, // typical headset refresh
            smoothing: 0.05,
        }
    }

    /// Whether enough time has passed since the last tick to run a frame.
    #[must_use]
    pub fn should_render(&self) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        self.last_frame.elapsed() >= self.min_frame_duration
    }

    /// Start a frame now. Returns the clamped delta in seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Start a frame at `now`. Returns the clamped delta in seconds.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        clamp_dt(frame_time, self.max_dt)
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}
