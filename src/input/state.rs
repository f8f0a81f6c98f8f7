//! Per-pointer interaction state

use std::collections::HashMap;

use crate::events::event::EventTarget;
use crate::scene::NodeId;

use super::native::{InteractionType, PointerKey};

/// Hover, press and surface-entry state of one pointer stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerState {
    front_object: Option<NodeId>,
    pressed_object: Option<EventTarget>,
    entered_surface: bool,
}

impl PointerState {
    /// Node currently under the pointer; `None` means bare surface or scene
    pub fn front_object(&self) -> Option<NodeId> {
        self.front_object
    }

    pub fn set_front_object(&mut self, object: Option<NodeId>) {
        self.front_object = object;
    }

    /// Target of the most recent unreleased press
    pub fn pressed_object(&self) -> Option<EventTarget> {
        self.pressed_object
    }

    pub fn press_pointer(&mut self, object: EventTarget) {
        self.pressed_object = Some(object);
    }

    /// Clear the press, returning what was pressed
    pub fn release_pointer(&mut self) -> Option<EventTarget> {
        self.pressed_object.take()
    }

    pub fn has_entered_surface(&self) -> bool {
        self.entered_surface
    }

    pub fn enter_surface(&mut self) {
        self.entered_surface = true;
    }

    pub fn leave_surface(&mut self) {
        self.entered_surface = false;
    }
}

/// Consecutive-click counters of one interaction type
#[derive(Debug, Clone, Default)]
pub struct ClickCounter {
    counts: HashMap<EventTarget, u32>,
    last_click_at: Option<f64>,
}

impl ClickCounter {
    /// Count a click on `object` at `time_stamp` and return its new count.
    /// Other objects' counters reset. With a `window_ms`, a click arriving
    /// later than that after the previous one starts a new sequence.
    pub fn register_click(&mut self, object: EventTarget, time_stamp: f64, window_ms: Option<f64>) -> u32 {
        let expired = match (window_ms, self.last_click_at) {
            (Some(window), Some(last)) => time_stamp - last > window,
            _ => false,
        };

        let previous = if expired {
            0
        } else {
            self.counts.get(&object).copied().unwrap_or(0)
        };

        self.counts.clear();
        self.counts.insert(object, previous + 1);
        self.last_click_at = Some(time_stamp);
        previous + 1
    }

    pub fn click_count(&self, object: EventTarget) -> u32 {
        self.counts.get(&object).copied().unwrap_or(0)
    }

    pub fn clear_clicks(&mut self, object: EventTarget) {
        self.counts.remove(&object);
    }
}

/// Hosts report `dblclick` as a mouse event even when clicks came through
/// pointer events, so cursor devices count together
fn click_stream(interaction: InteractionType) -> InteractionType {
    match interaction {
        InteractionType::Pointer => InteractionType::Mouse,
        other => other,
    }
}

/// All pointer streams of one surface
#[derive(Debug, Clone, Default)]
pub struct PointerStateStore {
    pointers: HashMap<PointerKey, PointerState>,
    clicks: HashMap<InteractionType, ClickCounter>,
}

impl PointerStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of a stream, if it has been seen
    pub fn state(&self, key: PointerKey) -> Option<&PointerState> {
        self.pointers.get(&key)
    }

    /// State of a stream, created on first use
    pub fn state_mut(&mut self, key: PointerKey) -> &mut PointerState {
        self.pointers.entry(key).or_default()
    }

    /// Forget a stream entirely
    pub fn remove(&mut self, key: PointerKey) -> Option<PointerState> {
        self.pointers.remove(&key)
    }

    /// Number of tracked streams
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// Click counters shared by every stream of an interaction type
    pub fn clicks(&self, interaction: InteractionType) -> Option<&ClickCounter> {
        self.clicks.get(&click_stream(interaction))
    }

    pub fn clicks_mut(&mut self, interaction: InteractionType) -> &mut ClickCounter {
        self.clicks.entry(click_stream(interaction)).or_default()
    }

    /// Drop all state
    pub fn clear(&mut self) {
        self.pointers.clear();
        self.clicks.clear();
    }
}
