//! Native event normalization
//!
//! Picks the event family an element listens to, folds native type strings
//! into [`Verb`]s, and drops the emulated mouse events touch devices fire
//! after a touch.

use std::collections::HashMap;

use super::host::{ElementId, InputHost, PointerEventsSupport};
use super::native::{NativeEvent, Verb};

/// Standard Pointer Events family
pub const POINTER_EVENTS: [&str; 6] = [
    "pointerdown",
    "pointerup",
    "pointermove",
    "pointerout",
    "pointercancel",
    "dblclick",
];

/// Vendor-prefixed Pointer Events family
pub const PREFIXED_POINTER_EVENTS: [&str; 6] = [
    "MSPointerDown",
    "MSPointerUp",
    "MSPointerMove",
    "MSPointerOut",
    "MSPointerCancel",
    "dblclick",
];

/// Fallback mouse and touch families
pub const MOUSE_AND_TOUCH_EVENTS: [&str; 9] = [
    "mousedown",
    "mouseup",
    "mousemove",
    "mouseout",
    "touchstart",
    "touchend",
    "touchmove",
    "touchcancel",
    "dblclick",
];

/// Default window after `touchstart` in which `mousedown` is treated as
/// emulated
pub const DEFAULT_EMULATION_WINDOW_MS: f64 = 600.0;

/// Fold a native event type into a verb. Case-insensitive substring match,
/// first match wins.
pub fn normalize_type(kind: &str) -> Option<Verb> {
    let kind = kind.to_ascii_lowercase();

    if kind.contains("down") || kind.contains("start") {
        Some(Verb::Down)
    } else if kind.contains("up") || kind.contains("end") {
        Some(Verb::Up)
    } else if kind.contains("move") {
        Some(Verb::Move)
    } else if kind.contains("out") {
        Some(Verb::Out)
    } else if kind.contains("cancel") {
        Some(Verb::Cancel)
    } else if kind.contains("dblclick") {
        Some(Verb::DoubleClick)
    } else {
        None
    }
}

/// The event family for a host
pub fn event_family(support: PointerEventsSupport) -> &'static [&'static str] {
    match support {
        PointerEventsSupport::Standard => &POINTER_EVENTS,
        PointerEventsSupport::Prefixed => &PREFIXED_POINTER_EVENTS,
        PointerEventsSupport::Unsupported => &MOUSE_AND_TOUCH_EVENTS,
    }
}

/// What the host should do with a native event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Normalized {
    /// The verb to forward, `None` when the event is dropped
    pub verb: Option<Verb>,
    /// Whether the host should suppress the native default action
    pub prevent_default: bool,
}

/// Per-element subscription record
#[derive(Debug, Clone)]
struct Registration {
    event_types: &'static [&'static str],
    last_touch_start: Option<f64>,
}

/// Element registry plus the normalization rules
#[derive(Debug, Clone)]
pub struct Normalizer {
    registrations: HashMap<ElementId, Registration>,
    emulation_window_ms: f64,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::with_emulation_window(DEFAULT_EMULATION_WINDOW_MS)
    }

    pub fn with_emulation_window(emulation_window_ms: f64) -> Self {
        Self {
            registrations: HashMap::new(),
            emulation_window_ms,
        }
    }

    /// Subscribe `element` to the host's event family. No-op while the
    /// element is already registered; returns whether it subscribed.
    pub fn add_listeners<H: InputHost + ?Sized>(&mut self, element: ElementId, host: &mut H) -> bool {
        if self.registrations.contains_key(&element) {
            return false;
        }

        let event_types = event_family(host.pointer_events_support());
        host.subscribe(element, event_types);
        self.registrations.insert(
            element,
            Registration {
                event_types,
                last_touch_start: None,
            },
        );

        log::debug!("normalizer: subscribed {} to {:?}", element, event_types);
        true
    }

    /// Unsubscribe `element`. No-op if it was never registered; returns
    /// whether anything was removed.
    pub fn remove_listeners<H: InputHost + ?Sized>(&mut self, element: ElementId, host: &mut H) -> bool {
        let Some(registration) = self.registrations.remove(&element) else {
            return false;
        };

        host.unsubscribe(element, registration.event_types);
        log::debug!("normalizer: unsubscribed {}", element);
        true
    }

    pub fn is_registered(&self, element: ElementId) -> bool {
        self.registrations.contains_key(&element)
    }

    /// Normalize one native event delivered for `element`
    ///
    /// Events for unregistered elements, or of types the element did not
    /// subscribe to, are dropped.
    pub fn normalize(&mut self, element: ElementId, event: &NativeEvent) -> Normalized {
        let window = self.emulation_window_ms;
        let Some(registration) = self.registrations.get_mut(&element) else {
            return Normalized::default();
        };

        if !registration
            .event_types
            .iter()
            .any(|event_type| event.is(event_type))
        {
            return Normalized::default();
        }

        let mut prevent_default = false;

        if event.is("touchend") {
            prevent_default = true;
        } else if event.is("touchstart") {
            registration.last_touch_start = Some(event.time_stamp);
        } else if event.is("mousedown") {
            if let Some(touched_at) = registration.last_touch_start {
                if event.time_stamp - touched_at < window {
                    log::debug!(
                        "normalizer: dropped emulated mousedown {}ms after touchstart",
                        event.time_stamp - touched_at
                    );
                    return Normalized {
                        verb: None,
                        prevent_default: true,
                    };
                }
            }
        }

        let verb = normalize_type(&event.kind);
        log::trace!("normalizer: {} on {} -> {:?}", event.kind, element, verb);
        Normalized {
            verb,
            prevent_default,
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
