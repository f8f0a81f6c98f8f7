//! Raw host input and the samples derived from it

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Device family an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    Mouse,
    Touch,
    Pointer,
}

impl InteractionType {
    /// Classify a native event type string. `dblclick` counts as mouse.
    pub fn from_event_kind(kind: &str) -> Self {
        let kind = kind.to_ascii_lowercase();
        if kind.starts_with("touch") {
            InteractionType::Touch
        } else if kind.contains("pointer") {
            InteractionType::Pointer
        } else {
            InteractionType::Mouse
        }
    }
}

/// Canonical interaction verbs every native event type folds into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Down,
    Up,
    Move,
    Out,
    Cancel,
    /// Passed through from the host's native double-click
    DoubleClick,
}

/// One changed touch point of a native touch event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Host touch identifier, stable for the lifetime of the contact
    pub identifier: u64,
    pub page_x: f32,
    pub page_y: f32,
}

impl TouchPoint {
    pub fn new(identifier: u64, page_x: f32, page_y: f32) -> Self {
        Self {
            identifier,
            page_x,
            page_y,
        }
    }
}

/// A native input event as delivered by the host binding
#[derive(Debug, Clone, PartialEq)]
pub struct NativeEvent {
    /// Host event type, e.g. `mousedown`, `touchend`, `MSPointerMove`
    pub kind: String,
    /// Host timestamp in milliseconds
    pub time_stamp: f64,
    /// Page-space position (mouse and pointer events)
    pub page_x: f32,
    pub page_y: f32,
    /// Host pointer id (pointer events)
    pub pointer_id: Option<u64>,
    /// Changed touch points (touch events), in host order
    pub changed_touches: Vec<TouchPoint>,
}

impl NativeEvent {
    /// A mouse-family event (also used for `dblclick`)
    pub fn mouse(kind: impl Into<String>, page_x: f32, page_y: f32, time_stamp: f64) -> Self {
        Self {
            kind: kind.into(),
            time_stamp,
            page_x,
            page_y,
            pointer_id: None,
            changed_touches: Vec::new(),
        }
    }

    /// A pointer-family event
    pub fn pointer(
        kind: impl Into<String>,
        pointer_id: u64,
        page_x: f32,
        page_y: f32,
        time_stamp: f64,
    ) -> Self {
        Self {
            pointer_id: Some(pointer_id),
            ..Self::mouse(kind, page_x, page_y, time_stamp)
        }
    }

    /// A touch-family event carrying its changed touches
    pub fn touch(kind: impl Into<String>, changed_touches: Vec<TouchPoint>, time_stamp: f64) -> Self {
        Self {
            changed_touches,
            ..Self::mouse(kind, 0.0, 0.0, time_stamp)
        }
    }

    pub fn interaction_type(&self) -> InteractionType {
        InteractionType::from_event_kind(&self.kind)
    }

    /// Case-insensitive comparison of the event type
    pub fn is(&self, kind: &str) -> bool {
        self.kind.eq_ignore_ascii_case(kind)
    }
}

/// Identity of a pointer stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKey {
    /// Every input folded into one ambient stream
    Primary,
    /// The system mouse
    Mouse,
    /// A Pointer Events stream by `pointerId`
    Pointer(u64),
    /// A touch contact by identifier
    Touch(u64),
}

/// One instantaneous pointer reading
#[derive(Debug, Clone, PartialEq)]
pub struct PointerSample {
    /// Page-space position
    pub page: Point,
    pub interaction: InteractionType,
    /// The native event type this sample came from
    pub kind: String,
    pub pointer_id: Option<u64>,
    /// The touch point this sample was expanded from
    pub touch: Option<TouchPoint>,
    pub time_stamp: f64,
}

impl PointerSample {
    pub fn new(page: Point, interaction: InteractionType, kind: impl Into<String>) -> Self {
        Self {
            page,
            interaction,
            kind: kind.into(),
            pointer_id: None,
            touch: None,
            time_stamp: 0.0,
        }
    }

    /// Expand a native event into its samples: one per changed touch for
    /// touch events, exactly one otherwise
    pub fn from_native(event: &NativeEvent) -> Vec<PointerSample> {
        let interaction = event.interaction_type();

        if interaction == InteractionType::Touch {
            return event
                .changed_touches
                .iter()
                .map(|touch| PointerSample {
                    page: Point::new(touch.page_x, touch.page_y),
                    interaction,
                    kind: event.kind.clone(),
                    pointer_id: Some(touch.identifier),
                    touch: Some(*touch),
                    time_stamp: event.time_stamp,
                })
                .collect();
        }

        vec![PointerSample {
            page: Point::new(event.page_x, event.page_y),
            interaction,
            kind: event.kind.clone(),
            pointer_id: event.pointer_id,
            touch: None,
            time_stamp: event.time_stamp,
        }]
    }

    /// The stream this sample belongs to
    pub fn key(&self, track_identity: bool) -> PointerKey {
        if !track_identity {
            return PointerKey::Primary;
        }
        match self.interaction {
            InteractionType::Mouse => PointerKey::Mouse,
            InteractionType::Pointer => PointerKey::Pointer(self.pointer_id.unwrap_or(0)),
            InteractionType::Touch => PointerKey::Touch(self.pointer_id.unwrap_or(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_type_classification() {
        assert_eq!(InteractionType::from_event_kind("touchstart"), InteractionType::Touch);
        assert_eq!(InteractionType::from_event_kind("pointermove"), InteractionType::Pointer);
        assert_eq!(InteractionType::from_event_kind("MSPointerDown"), InteractionType::Pointer);
        assert_eq!(InteractionType::from_event_kind("mouseup"), InteractionType::Mouse);
        assert_eq!(InteractionType::from_event_kind("dblclick"), InteractionType::Mouse);
    }

    #[test]
    fn test_touch_event_expands_per_changed_touch_in_order() {
        let event = NativeEvent::touch(
            "touchmove",
            vec![TouchPoint::new(7, 1.0, 2.0), TouchPoint::new(3, 5.0, 6.0)],
            12.0,
        );
        let samples = PointerSample::from_native(&event);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].page, Point::new(1.0, 2.0));
        assert_eq!(samples[0].key(true), PointerKey::Touch(7));
        assert_eq!(samples[1].key(true), PointerKey::Touch(3));
        assert_eq!(samples[1].time_stamp, 12.0);
    }

    #[test]
    fn test_mouse_and_pointer_events_yield_one_sample() {
        let samples = PointerSample::from_native(&NativeEvent::mouse("mousemove", 4.0, 5.0, 0.0));
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].key(true), PointerKey::Mouse);

        let samples = PointerSample::from_native(&NativeEvent::pointer("pointerdown", 9, 4.0, 5.0, 0.0));
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].key(true), PointerKey::Pointer(9));
        assert_eq!(samples[0].key(false), PointerKey::Primary);
    }
}
