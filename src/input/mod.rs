//! Pointer input pipeline
//!
//! Native host events are normalized into verbs, expanded into samples,
//! mapped into surface and world coordinates and run through the pointer
//! controller, which emits scene events.

pub mod controller;
pub mod coords;
pub mod host;
pub mod manager;
pub mod native;
pub mod normalizer;
pub mod state;

#[cfg(feature = "desktop")]
pub mod desktop;
#[cfg(feature = "web")]
pub mod web;


pub use controller::PointerController;
pub use coords::{CoordTarget, CoordinateMapper, ResolvedCoords, ResolvedPointer};
pub use host::{ElementId, HeadlessHost, InputHost, PointerEventsSupport};
pub use manager::{EventOutcome, InputManager};
pub use native::{InteractionType, NativeEvent, PointerKey, PointerSample, TouchPoint, Verb};
pub use normalizer::{Normalized, Normalizer};
pub use state::{ClickCounter, PointerState, PointerStateStore};
