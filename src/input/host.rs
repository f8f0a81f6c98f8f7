//! Host binding layer
//!
//! The host is whatever owns the real input devices: a browser document, a
//! native window, or a test harness. It subscribes to event types on
//! elements and answers the geometry queries coordinate mapping needs.

use std::collections::HashMap;
use std::fmt;

use crate::geometry::{Point, Rect, Size};

/// Identity of a host element that receives input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Which Pointer Events API the host exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventsSupport {
    /// `pointerdown`, `pointerup`, ...
    Standard,
    /// `MSPointerDown`, `MSPointerUp`, ...
    Prefixed,
    /// No Pointer Events; mouse and touch families only
    Unsupported,
}

/// Services the pointer pipeline needs from its host
pub trait InputHost {
    /// Pointer Events availability, used to pick the event family
    fn pointer_events_support(&self) -> PointerEventsSupport;

    /// Start delivering the given event types for `element`
    fn subscribe(&mut self, element: ElementId, event_types: &[&'static str]);

    /// Stop delivering the given event types for `element`
    fn unsubscribe(&mut self, element: ElementId, event_types: &[&'static str]);

    /// Current page scroll offsets
    fn scroll_offset(&self) -> Point;

    /// Element bounds in viewport space
    fn bounding_rect(&self, element: ElementId) -> Rect;

    /// Element size as laid out on the page (CSS size)
    fn display_size(&self, element: ElementId) -> Size;
}

/// In-memory host with fixed geometry
///
/// Suits tests and embedders whose windowing layer already reports
/// element-relative positions (bounding rect at the origin, no scroll).
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    support: PointerEventsSupport,
    scroll: Point,
    bounds: HashMap<ElementId, Rect>,
    subscriptions: HashMap<ElementId, Vec<&'static str>>,
}

impl HeadlessHost {
    pub fn new(support: PointerEventsSupport) -> Self {
        Self {
            support,
            scroll: Point::zero(),
            bounds: HashMap::new(),
            subscriptions: HashMap::new(),
        }
    }

    /// Place an element on the page; its display size is the rect's size
    pub fn with_element(mut self, element: ElementId, bounds: Rect) -> Self {
        self.set_bounds(element, bounds);
        self
    }

    pub fn set_bounds(&mut self, element: ElementId, bounds: Rect) {
        self.bounds.insert(element, bounds);
    }

    pub fn set_scroll(&mut self, scroll: Point) {
        self.scroll = scroll;
    }

    pub fn set_support(&mut self, support: PointerEventsSupport) {
        self.support = support;
    }

    /// Event types currently subscribed on `element`
    pub fn subscriptions(&self, element: ElementId) -> &[&'static str] {
        self.subscriptions
            .get(&element)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(PointerEventsSupport::Unsupported)
    }
}

impl InputHost for HeadlessHost {
    fn pointer_events_support(&self) -> PointerEventsSupport {
        self.support
    }

    fn subscribe(&mut self, element: ElementId, event_types: &[&'static str]) {
        let subscribed = self.subscriptions.entry(element).or_default();
        for event_type in event_types {
            if !subscribed.contains(event_type) {
                subscribed.push(*event_type);
            }
        }
    }

    fn unsubscribe(&mut self, element: ElementId, event_types: &[&'static str]) {
        if let Some(subscribed) = self.subscriptions.get_mut(&element) {
            subscribed.retain(|event_type| !event_types.contains(event_type));
            if subscribed.is_empty() {
                self.subscriptions.remove(&element);
            }
        }
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }

    fn bounding_rect(&self, element: ElementId) -> Rect {
        self.bounds.get(&element).copied().unwrap_or_else(Rect::zero)
    }

    fn display_size(&self, element: ElementId) -> Size {
        self.bounds
            .get(&element)
            .map(|rect| rect.size)
            .unwrap_or_else(Size::zero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_subscriptions_are_deduplicated() {
        let mut host = HeadlessHost::default();
        let element = ElementId(1);

        host.subscribe(element, &["mousedown", "mouseup"]);
        host.subscribe(element, &["mousedown"]);
        assert_eq!(host.subscriptions(element), &["mousedown", "mouseup"]);

        host.unsubscribe(element, &["mousedown", "mouseup"]);
        assert!(host.subscriptions(element).is_empty());
    }

    #[test]
    fn test_headless_geometry() {
        let element = ElementId(3);
        let host = HeadlessHost::default().with_element(element, Rect::new(60.0, 30.0, 300.0, 150.0));

        assert_eq!(host.bounding_rect(element).left(), 60.0);
        assert_eq!(host.display_size(element), Size::new(300.0, 150.0));
        assert_eq!(host.display_size(ElementId(4)), Size::zero());
    }
}
