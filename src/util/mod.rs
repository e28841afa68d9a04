//! Shared utilities.

/// Frame timing and delta clamping.
pub mod frame_clock;

pub use frame_clock::{clamp_dt, FrameClock};
