//! End-to-end pointer scenarios through the public API

use orbit_pointer::prelude::*;
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<(EventName, EventTarget)>>>;

struct Fixture {
    manager: InputManager<HeadlessHost>,
    surface: Surface,
    log: Log,
    button: NodeId,
    label: NodeId,
}

/// A 400x200 backing store shown at 200x100 CSS pixels, placed at (50, 20)
/// on the page. A button fills the top-left quarter of the world, with a
/// label inside it.
fn fixture(support: PointerEventsSupport) -> Fixture {
    let mut scene = Scene::new();
    let root = scene.root();
    let button = scene
        .add_child(root, Shape::Rect(Rect::new(-200.0, -100.0, 200.0, 100.0)))
        .unwrap();
    let label = scene
        .add_child_with_transform(
            button,
            Shape::Rect(Rect::new(0.0, 0.0, 40.0, 20.0)),
            Transform::translation(-180.0, -80.0),
        )
        .unwrap();

    let element = ElementId(42);
    let surface = Surface::with_scene(element, Size::new(400.0, 200.0), scene);
    let host = HeadlessHost::new(support).with_element(element, Rect::new(50.0, 20.0, 200.0, 100.0));

    let log: Log = Arc::new(Mutex::new(Vec::new()));
    for target in [EventTarget::Surface, EventTarget::Node(button), EventTarget::Node(label)] {
        for name in EventName::ALL {
            let log = log.clone();
            surface.on(target, name, move |event| {
                log.lock().unwrap().push((event.name, event.current_target()));
            });
        }
    }

    let mut manager = InputManager::new(host);
    assert!(manager.enable_for_surface(&surface));

    Fixture {
        manager,
        surface,
        log,
        button,
        label,
    }
}

impl Fixture {
    fn send(&mut self, event: NativeEvent) -> EventOutcome {
        self.manager.handle_native_event(&self.surface, &event)
    }

    fn names_for(&self, target: EventTarget) -> Vec<EventName> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, current)| *current == target)
            .map(|(name, _)| *name)
            .collect()
    }

    fn clear(&self) {
        self.log.lock().unwrap().clear();
    }
}

#[test]
fn test_scaled_surface_hits_label() {
    let mut f = fixture(PointerEventsSupport::Unsupported);

    // Page (65, 35) -> element (15, 15) -> surface (30, 30) -> world (-170, -70)
    f.send(NativeEvent::mouse("mousemove", 65.0, 35.0, 0.0));

    assert_eq!(f.names_for(EventTarget::Node(f.label)), vec![EventName::Enter, EventName::Move]);
    assert_eq!(f.names_for(EventTarget::Node(f.button)), vec![EventName::Enter, EventName::Move]);
    assert_eq!(
        f.manager
            .pointer_state(f.surface.element(), PointerKey::Mouse)
            .unwrap()
            .front_object(),
        Some(f.label)
    );
}

#[test]
fn test_event_payload_carries_local_coordinates() {
    let mut f = fixture(PointerEventsSupport::Unsupported);
    let local = Arc::new(Mutex::new(None));
    let sink = local.clone();
    f.surface.on(f.label, EventName::Down, move |event| {
        *sink.lock().unwrap() = event.coords.target;
    });

    f.send(NativeEvent::mouse("mousedown", 65.0, 35.0, 0.0));
    let local = local.lock().unwrap().unwrap();
    assert!((local.x - 10.0).abs() < 1e-3);
    assert!((local.y - 10.0).abs() < 1e-3);
}

#[test]
fn test_emulated_mousedown_after_touch_is_suppressed() {
    let mut f = fixture(PointerEventsSupport::Unsupported);

    let start = f.send(NativeEvent::touch("touchstart", vec![TouchPoint::new(1, 65.0, 35.0)], 0.0));
    assert!(start.dispatched.is_some());
    let end = f.send(NativeEvent::touch("touchend", vec![TouchPoint::new(1, 65.0, 35.0)], 20.0));
    assert!(end.prevent_default);
    f.clear();

    let emulated = f.send(NativeEvent::mouse("mousedown", 65.0, 35.0, 50.0));
    assert_eq!(emulated.dispatched, None);
    assert!(emulated.prevent_default);
    assert!(f.names_for(EventTarget::Node(f.label)).is_empty());

    let real = f.send(NativeEvent::mouse("mousedown", 65.0, 35.0, 1000.0));
    assert!(real.dispatched.is_some());
    assert!(f.names_for(EventTarget::Node(f.label)).contains(&EventName::Down));
}

#[test]
fn test_events_outside_the_family_are_ignored() {
    let mut f = fixture(PointerEventsSupport::Standard);

    let outcome = f.send(NativeEvent::mouse("mousedown", 65.0, 35.0, 0.0));
    assert_eq!(outcome, EventOutcome::default());
    assert!(f.log.lock().unwrap().is_empty());

    let outcome = f.send(NativeEvent::pointer("pointerdown", 1, 65.0, 35.0, 10.0));
    assert!(outcome.dispatched.is_some());
    assert!(f.names_for(EventTarget::Node(f.label)).contains(&EventName::Down));
}

#[test]
fn test_pointer_drag_across_objects() {
    let mut f = fixture(PointerEventsSupport::Standard);

    f.send(NativeEvent::pointer("pointerdown", 1, 65.0, 35.0, 0.0));
    // Into the button body, then out of the button entirely
    f.send(NativeEvent::pointer("pointermove", 1, 120.0, 60.0, 10.0));
    f.send(NativeEvent::pointer("pointermove", 1, 200.0, 100.0, 20.0));
    f.send(NativeEvent::pointer("pointerup", 1, 200.0, 100.0, 30.0));

    let label = f.names_for(EventTarget::Node(f.label));
    assert_eq!(
        label,
        vec![EventName::Enter, EventName::Down, EventName::Leave]
    );

    let button = f.names_for(EventTarget::Node(f.button));
    assert!(button.contains(&EventName::DownMove));
    assert!(button.contains(&EventName::Leave));
    // Released away from the pressed label
    assert!(!button.contains(&EventName::Click));
}

#[test]
fn test_disable_stops_dispatch() {
    let mut f = fixture(PointerEventsSupport::Unsupported);
    assert!(f.manager.disable_for_surface(&f.surface));

    let outcome = f.send(NativeEvent::mouse("mousemove", 65.0, 35.0, 0.0));
    assert_eq!(outcome, EventOutcome::default());
    assert!(f.log.lock().unwrap().is_empty());
}

#[test]
fn test_config_from_json_drives_manager() {
    let config = PointerConfig::from_json_str(r#"{ "emulate_touch_double_click": false }"#).unwrap();
    let element = ElementId(1);
    let host = HeadlessHost::default().with_element(element, Rect::new(0.0, 0.0, 10.0, 10.0));
    let manager = InputManager::with_config(host, config);
    assert!(!manager.config().emulate_touch_double_click);
    assert!(orbit_pointer::init().is_ok());
}
