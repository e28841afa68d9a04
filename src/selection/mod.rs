//! Selection: the inspect/highlight/idle state machine, the event dispatch
//! table driving it, the floating property panel, and background property
//! resolution.

/// Selection state machine.
pub mod controller;
/// Event-to-handler dispatch.
pub mod dispatch;
/// Property panel placement.
pub mod panel;
/// Background property lookups.
pub mod resolver;

pub use controller::{ResponseOutcome, SelectionController, SelectionMode};
pub use dispatch::{
    EventDispatch, EventPayload, HandFilter, Handler, SelectionAction,
    SelectionContext,
};
pub use panel::PropertyPanel;
pub use resolver::{
    ElementProperties, PropertyError, PropertyRequester, PropertyResolver,
    PropertyResponse, PropertySource, StaticPropertyTable,
};
