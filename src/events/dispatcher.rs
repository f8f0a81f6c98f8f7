//! Event dispatcher for pointer events
//!
//! Delivers events to a single target with bubbling, to a bounded span of an
//! ancestor chain, or to the bare surface. Chains are computed before any
//! listener runs, so listeners observe a consistent tree snapshot.

use crate::input::coords::{CoordTarget, CoordinateMapper, ResolvedPointer};
use crate::scene::{NodeId, SceneGraph};
use crate::surface::Surface;

use super::event::{EventName, EventTarget, PointerEvent, PropagationPhase};
use super::hit_testing::ancestor_chain;

/// Delivery counters
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchStats {
    /// Events created and emitted
    pub events_emitted: u64,
    /// Targets visited, bubbling steps included
    pub targets_visited: u64,
    /// Listener invocations
    pub listeners_run: u64,
}

/// Emits pointer events onto a surface's listeners
#[derive(Debug, Default)]
pub struct EventDispatcher {
    mapper: CoordinateMapper,
    stats: DispatchStats,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Deliver to `target` and let it bubble; the surface target gets a
    /// plain surface delivery
    pub fn emit_for_target<S: SceneGraph>(
        &mut self,
        name: EventName,
        pointer: &ResolvedPointer,
        surface: &Surface<S>,
        target: EventTarget,
    ) {
        match target {
            EventTarget::Surface => self.emit_for_canvas(name, pointer, surface),
            EventTarget::Node(node) => self.emit_from_object(name, pointer, surface, node),
        }
    }

    /// Deliver to every node from `from` up to but excluding `to`. Each node
    /// receives its own non-bubbling event. With `to` unset, or not an
    /// ancestor of `from`, the span runs to the root inclusive.
    pub fn emit_between_objects<S: SceneGraph>(
        &mut self,
        name: EventName,
        pointer: &ResolvedPointer,
        surface: &Surface<S>,
        from: NodeId,
        to: Option<NodeId>,
    ) {
        let span = match surface.scene() {
            Some(scene) => ancestor_chain(scene, from, to),
            None => vec![from],
        };
        self.emit_for_span(name, pointer, surface, &span);
    }

    /// Deliver a non-bubbling event to each node of a span computed earlier
    pub fn emit_for_span<S: SceneGraph>(
        &mut self,
        name: EventName,
        pointer: &ResolvedPointer,
        surface: &Surface<S>,
        span: &[NodeId],
    ) {
        log::trace!("dispatch: {} on span {:?}", name, span);
        for node in span {
            let target = EventTarget::Node(*node);
            let mut event = self.create_event(name, pointer, surface, target);
            self.deliver(surface, &mut event);
        }
    }

    /// Deliver to `object` and bubble through its whole ancestor chain
    pub fn emit_from_object<S: SceneGraph>(
        &mut self,
        name: EventName,
        pointer: &ResolvedPointer,
        surface: &Surface<S>,
        object: NodeId,
    ) {
        let chain = match surface.scene() {
            Some(scene) => ancestor_chain(scene, object, None),
            None => vec![object],
        };

        log::trace!("dispatch: {} from {} bubbling through {:?}", name, object, chain);
        let mut event = self.create_event(name, pointer, surface, EventTarget::Node(object));
        for (depth, node) in chain.into_iter().enumerate() {
            event.propagation.current_target = EventTarget::Node(node);
            if depth > 0 {
                event.propagation.phase = PropagationPhase::Bubbling;
            }
            self.deliver(surface, &mut event);
            if event.propagation.is_propagation_stopped() {
                break;
            }
        }
    }

    /// Deliver to the surface only
    pub fn emit_for_canvas<S: SceneGraph>(&mut self, name: EventName, pointer: &ResolvedPointer, surface: &Surface<S>) {
        log::trace!("dispatch: {} on surface {}", name, surface.element());
        let mut event = self.create_event(name, pointer, surface, EventTarget::Surface);
        self.deliver(surface, &mut event);
    }

    fn create_event<S: SceneGraph>(
        &mut self,
        name: EventName,
        pointer: &ResolvedPointer,
        surface: &Surface<S>,
        target: EventTarget,
    ) -> PointerEvent {
        let coord_target = match target {
            EventTarget::Surface => CoordTarget::Surface,
            EventTarget::Node(node) => CoordTarget::Node(node),
        };

        let mut coords = pointer.coords;
        coords.target = self.mapper.target_coords(surface, &coords, coord_target);

        self.stats.events_emitted += 1;
        PointerEvent::new(name, pointer.sample.clone(), coords, target)
    }

    fn deliver<S: SceneGraph>(&mut self, surface: &Surface<S>, event: &mut PointerEvent) {
        self.stats.targets_visited += 1;
        self.stats.listeners_run += surface.listeners().deliver(event) as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rect, Size};
    use crate::input::coords::ResolvedCoords;
    use crate::input::host::ElementId;
    use crate::input::native::{InteractionType, PointerSample};
    use crate::scene::{Scene, Shape};
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<(EventName, EventTarget, EventTarget)>>>;

    /// root -> a -> b -> c
    fn fixture() -> (Surface, [NodeId; 4], Log) {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.add_child(root, Shape::Rect(Rect::new(0.0, 0.0, 100.0, 100.0))).unwrap();
        let b = scene.add_child(a, Shape::Rect(Rect::new(0.0, 0.0, 50.0, 50.0))).unwrap();
        let c = scene.add_child(b, Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0))).unwrap();
        let surface = Surface::with_scene(ElementId(1), Size::new(100.0, 100.0), scene);

        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let targets = [
            EventTarget::Surface,
            EventTarget::Node(root),
            EventTarget::Node(a),
            EventTarget::Node(b),
            EventTarget::Node(c),
        ];
        for target in targets {
            for name in EventName::ALL {
                let log = log.clone();
                surface.on(target, name, move |event| {
                    log.lock()
                        .unwrap()
                        .push((event.name, event.target, event.current_target()));
                });
            }
        }
        (surface, [root, a, b, c], log)
    }

    fn pointer() -> ResolvedPointer {
        ResolvedPointer {
            sample: PointerSample::new(Point::new(1.0, 1.0), InteractionType::Mouse, "mousemove"),
            coords: ResolvedCoords {
                element: Point::new(1.0, 1.0),
                surface: Point::new(1.0, 1.0),
                world: Some(Point::new(-49.0, -49.0)),
                target: None,
            },
        }
    }

    fn visited(log: &Log) -> Vec<EventTarget> {
        log.lock().unwrap().iter().map(|(_, _, current)| *current).collect()
    }

    #[test]
    fn test_emit_from_object_bubbles_to_root() {
        let (surface, [root, a, b, c], log) = fixture();
        let mut dispatcher = EventDispatcher::new();

        dispatcher.emit_from_object(EventName::Enter, &pointer(), &surface, c);
        assert_eq!(
            visited(&log),
            vec![
                EventTarget::Node(c),
                EventTarget::Node(b),
                EventTarget::Node(a),
                EventTarget::Node(root)
            ]
        );
        // One event, its target kept while bubbling
        assert!(log.lock().unwrap().iter().all(|(_, target, _)| *target == EventTarget::Node(c)));
        assert_eq!(dispatcher.stats().events_emitted, 1);
    }

    #[test]
    fn test_emit_between_objects_excludes_upper_bound() {
        let (surface, [_, a, b, c], log) = fixture();
        let mut dispatcher = EventDispatcher::new();

        dispatcher.emit_between_objects(EventName::Leave, &pointer(), &surface, c, Some(a));
        assert_eq!(visited(&log), vec![EventTarget::Node(c), EventTarget::Node(b)]);
        // Each span node is its own target
        assert!(log.lock().unwrap().iter().all(|(_, target, current)| target == current));
        assert_eq!(dispatcher.stats().events_emitted, 2);
    }

    #[test]
    fn test_emit_for_target_surface_and_canvas() {
        let (surface, _, log) = fixture();
        let mut dispatcher = EventDispatcher::new();

        dispatcher.emit_for_target(EventName::Down, &pointer(), &surface, EventTarget::Surface);
        dispatcher.emit_for_canvas(EventName::Leave, &pointer(), &surface);
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                (EventName::Down, EventTarget::Surface, EventTarget::Surface),
                (EventName::Leave, EventTarget::Surface, EventTarget::Surface)
            ]
        );
    }

    #[test]
    fn test_stop_propagation_halts_bubbling() {
        let (surface, [_, a, b, c], log) = fixture();
        surface.on(b, EventName::Click, |event| event.stop_propagation());
        let mut dispatcher = EventDispatcher::new();

        dispatcher.emit_for_target(EventName::Click, &pointer(), &surface, EventTarget::Node(c));
        let seen = visited(&log);
        assert!(seen.contains(&EventTarget::Node(b)));
        assert!(!seen.contains(&EventTarget::Node(a)));
    }

    #[test]
    fn test_target_coordinates_are_local_to_target() {
        let (surface, [_, _, b, _], _) = fixture();
        let local = Arc::new(Mutex::new(None));
        let sink = local.clone();
        surface.on(b, EventName::Move, move |event| {
            *sink.lock().unwrap() = event.coords.target;
        });

        EventDispatcher::new().emit_for_target(EventName::Move, &pointer(), &surface, EventTarget::Node(b));
        assert_eq!(*local.lock().unwrap(), Some(Point::new(-49.0, -49.0)));
    }
}
