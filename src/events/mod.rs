//! Scene-aware pointer events for Orbit
//!
//! The event system provides:
//! - Event names, targets and the payload handed to listeners
//! - A listener registry keyed by target and event name
//! - Hit testing and ancestry queries over the scene tree
//! - A dispatcher delivering to single targets, ancestor spans or the surface

pub mod dispatcher;
pub mod emitter;
pub mod event;
pub mod hit_testing;

pub use dispatcher::{DispatchStats, EventDispatcher};
pub use emitter::{EventListeners, ListenerId};
pub use event::{EventName, EventPropagation, EventTarget, PointerEvent, PropagationPhase, UnknownEventName};
pub use hit_testing::{HitTestStats, HitTester};
