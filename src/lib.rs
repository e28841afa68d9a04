// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Controller input, ray picking, selection and locomotion core for
//! head-mounted model viewers.
//!
//! The crate covers what happens between "the headset delivered this
//! frame's input" and "the renderer draws": reading hand controllers,
//! picking building elements with a controller ray, switching between
//! inspect, highlight and idle presentation, and moving the viewer
//! through the scene with thumbsticks, buttons and haptic feedback.
//!
//! # Key entry points
//!
//! - [`session::SessionContext`] - per-session state; call
//!   [`run_frame`](session::SessionContext::run_frame) once per refresh
//! - [`options::Options`] - runtime configuration (device layout,
//!   locomotion curves, haptics, bindings)
//! - [`picking::PickEngine`] - first-hit ray picking over loaded models
//! - [`selection::PropertySource`] - the seam the host implements to
//!   supply element properties
//!
//! # Architecture
//!
//! Each frame runs `InputPoller -> {PickEngine -> SelectionController}`
//! and `{LocomotionController -> HapticFeedback}` on the caller's thread.
//! Property lookups for inspected elements run on a background
//! [`selection::PropertyResolver`] thread and come back through a
//! lock-free triple buffer, tagged with the generation they were issued
//! under so a late answer for a superseded pick is dropped.

pub mod error;
pub mod input;
pub mod locomotion;
pub mod options;
pub mod picking;
pub mod scene;
pub mod selection;
pub mod session;
pub mod util;

pub use error::XrViewError;
pub use options::Options;
pub use session::{FrameInput, FrameOutput, RenderState, SessionContext};
