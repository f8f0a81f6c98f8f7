//! Pointer event payloads

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::input::coords::ResolvedCoords;
use crate::input::native::PointerSample;
use crate::scene::NodeId;

/// Names of the events the pointer layer emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventName {
    /// Pointer pressed
    Down,
    /// Pointer released
    Up,
    /// Pointer moved
    Move,
    /// Pointer moved while pressed
    DownMove,
    /// Pointer entered a node (or the surface)
    Enter,
    /// Pointer left a node (or the surface)
    Leave,
    /// Press and release on the same target or inside it
    Click,
    /// Two clicks on the same target
    #[serde(rename = "dblclick")]
    DoubleClick,
}

impl EventName {
    /// Every event name, in declaration order
    pub const ALL: [EventName; 8] = [
        EventName::Down,
        EventName::Up,
        EventName::Move,
        EventName::DownMove,
        EventName::Enter,
        EventName::Leave,
        EventName::Click,
        EventName::DoubleClick,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::Down => "down",
            EventName::Up => "up",
            EventName::Move => "move",
            EventName::DownMove => "downmove",
            EventName::Enter => "enter",
            EventName::Leave => "leave",
            EventName::Click => "click",
            EventName::DoubleClick => "dblclick",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown event name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown pointer event name: {0}")]
pub struct UnknownEventName(pub String);

impl FromStr for EventName {
    type Err = UnknownEventName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownEventName(s.to_string()))
    }
}

/// Where an event is delivered: a scene node or the bare surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The drawing surface itself, outside any node
    Surface,
    /// A node of the surface's scene
    Node(NodeId),
}

impl EventTarget {
    /// `Some(node)` maps to that node, `None` to the surface
    pub fn from_node(node: Option<NodeId>) -> Self {
        node.map_or(EventTarget::Surface, EventTarget::Node)
    }

    pub fn node(&self) -> Option<NodeId> {
        match self {
            EventTarget::Surface => None,
            EventTarget::Node(id) => Some(*id),
        }
    }
}

impl From<NodeId> for EventTarget {
    fn from(id: NodeId) -> Self {
        EventTarget::Node(id)
    }
}

impl fmt::Display for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTarget::Surface => f.write_str("surface"),
            EventTarget::Node(id) => write!(f, "{}", id),
        }
    }
}

/// Specifies the event propagation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationPhase {
    /// Event is at the node it was emitted on
    Target,

    /// Event is traveling up from target to its ancestors
    Bubbling,
}

/// Controls how an event propagates up the scene tree
#[derive(Debug, Clone)]
pub struct EventPropagation {
    /// Whether the event should continue propagating
    pub stopped: bool,

    /// The current propagation phase
    pub phase: PropagationPhase,

    /// The target whose listeners are currently running
    pub current_target: EventTarget,
}

impl EventPropagation {
    /// Create a new event propagation
    pub fn new(target: EventTarget) -> Self {
        Self {
            stopped: false,
            phase: PropagationPhase::Target,
            current_target: target,
        }
    }

    /// Stop event propagation
    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    /// Check if propagation is stopped
    pub fn is_propagation_stopped(&self) -> bool {
        self.stopped
    }
}

/// A pointer event as seen by listeners
#[derive(Debug, Clone)]
pub struct PointerEvent {
    /// Which event this is
    pub name: EventName,

    /// The raw pointer reading that caused it
    pub sample: PointerSample,

    /// Coordinates of the reading in every space; `coords.target` is
    /// relative to `target`
    pub coords: ResolvedCoords,

    /// The node (or surface) the event was emitted on
    pub target: EventTarget,

    /// Propagation control
    pub propagation: EventPropagation,
}

impl PointerEvent {
    pub fn new(
        name: EventName,
        sample: PointerSample,
        coords: ResolvedCoords,
        target: EventTarget,
    ) -> Self {
        Self {
            name,
            sample,
            coords,
            target,
            propagation: EventPropagation::new(target),
        }
    }

    /// The target whose listeners are currently running
    pub fn current_target(&self) -> EventTarget {
        self.propagation.current_target
    }

    /// Stop this event from bubbling further
    pub fn stop_propagation(&mut self) {
        self.propagation.stop_propagation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_name_round_trips_through_str() {
        for name in EventName::ALL {
            assert_eq!(name.as_str().parse::<EventName>(), Ok(name));
        }
        assert_eq!("DblClick".parse::<EventName>(), Ok(EventName::DoubleClick));
        assert!("hover".parse::<EventName>().is_err());
    }

    #[test]
    fn test_event_name_serde_matches_wire_names() {
        let json = serde_json::to_string(&EventName::DoubleClick).unwrap();
        assert_eq!(json, "\"dblclick\"");
        let name: EventName = serde_json::from_str("\"downmove\"").unwrap();
        assert_eq!(name, EventName::DownMove);
    }

    #[test]
    fn test_event_target_from_node() {
        let id = NodeId::from_raw(4);
        assert_eq!(EventTarget::from_node(Some(id)), EventTarget::Node(id));
        assert_eq!(EventTarget::from_node(None), EventTarget::Surface);
        assert_eq!(EventTarget::Node(id).node(), Some(id));
        assert_eq!(EventTarget::Surface.to_string(), "surface");
    }
}
