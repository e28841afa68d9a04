//! Per-session state and the frame loop entry points.
//!
//! A [`SessionContext`] owns the input history, the viewer anchor, the
//! loaded models, selection and locomotion state, and the property
//! resolver thread. Hosts call [`SessionContext::run_frame`] once per
//! display refresh and draw the returned [`RenderState`].

mod context;
mod frame;
mod render;
/// Recorded input traces.
pub mod replay;

pub use context::SessionContext;
pub use frame::{FrameInput, FrameOutput};
pub use render::{ModelRenderState, RenderState};
pub use replay::{ReplaySummary, Trace, TraceFrame, TraceModel, TraceProperty};
