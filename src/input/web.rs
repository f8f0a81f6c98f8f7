//! Browser input host over web-sys

use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, MouseEvent, PointerEvent, TouchEvent, Window};

use crate::geometry::{Point, Rect, Size};

use super::host::{ElementId, InputHost, PointerEventsSupport};
use super::manager::EventOutcome;
use super::native::{NativeEvent, TouchPoint};

type Handler = Rc<dyn Fn(ElementId, &NativeEvent) -> EventOutcome>;
type Listener = Closure<dyn FnMut(Event)>;

/// [`InputHost`] backed by the DOM
///
/// Each subscribed event type gets its own DOM listener. Listeners convert
/// the DOM event, pass it to the handler and call `preventDefault` when the
/// handler asks for it. The handler usually forwards to an
/// [`InputManager`](super::manager::InputManager) kept behind a `RefCell`.
pub struct WebHost {
    window: Window,
    support: PointerEventsSupport,
    elements: HashMap<ElementId, Element>,
    listeners: HashMap<ElementId, Vec<(&'static str, Listener)>>,
    handler: Handler,
    next_id: u64,
}

impl WebHost {
    pub fn new(handler: impl Fn(ElementId, &NativeEvent) -> EventOutcome + 'static) -> crate::Result<Self> {
        let window = web_sys::window().ok_or_else(|| crate::Error::Platform("No global window".into()))?;
        let support = detect_pointer_events(&window);
        log::debug!("web: pointer events support {:?}", support);

        Ok(Self {
            window,
            support,
            elements: HashMap::new(),
            listeners: HashMap::new(),
            handler: Rc::new(handler),
            next_id: 1,
        })
    }

    /// Make a DOM element addressable by the pipeline
    pub fn register_element(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, element);
        id
    }

    /// Forget an element, detaching any listeners left on it
    pub fn unregister_element(&mut self, id: ElementId) -> Option<Element> {
        if let Some(listeners) = self.listeners.remove(&id) {
            if let Some(element) = self.elements.get(&id) {
                for (event_type, listener) in listeners {
                    detach(element, event_type, &listener);
                }
            }
        }
        self.elements.remove(&id)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }
}

impl std::fmt::Debug for WebHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebHost")
            .field("support", &self.support)
            .field("elements", &self.elements.len())
            .finish()
    }
}

impl InputHost for WebHost {
    fn pointer_events_support(&self) -> PointerEventsSupport {
        self.support
    }

    fn subscribe(&mut self, element: ElementId, event_types: &[&'static str]) {
        let Some(target) = self.elements.get(&element) else {
            log::warn!("web: subscribe on unknown {}", element);
            return;
        };

        let attached = self.listeners.entry(element).or_default();
        for event_type in event_types {
            if attached.iter().any(|(attached_type, _)| attached_type == event_type) {
                continue;
            }

            let handler = self.handler.clone();
            let listener: Listener = Closure::new(move |event: Event| {
                let native = native_from_dom(&event);
                if handler(element, &native).prevent_default {
                    event.prevent_default();
                }
            });

            if let Err(err) =
                target.add_event_listener_with_callback(event_type, listener.as_ref().unchecked_ref())
            {
                log::error!("web: failed to listen for {} on {}: {:?}", event_type, element, err);
                continue;
            }
            attached.push((*event_type, listener));
        }
    }

    fn unsubscribe(&mut self, element: ElementId, event_types: &[&'static str]) {
        let (Some(target), Some(attached)) = (self.elements.get(&element), self.listeners.get_mut(&element)) else {
            return;
        };

        attached.retain(|(event_type, listener)| {
            if event_types.contains(event_type) {
                detach(target, event_type, listener);
                false
            } else {
                true
            }
        });
    }

    fn scroll_offset(&self) -> Point {
        let x = self.window.page_x_offset().unwrap_or(0.0);
        let y = self.window.page_y_offset().unwrap_or(0.0);
        Point::new(x as f32, y as f32)
    }

    fn bounding_rect(&self, element: ElementId) -> Rect {
        match self.elements.get(&element) {
            Some(target) => {
                let rect = target.get_bounding_client_rect();
                Rect::new(rect.x() as f32, rect.y() as f32, rect.width() as f32, rect.height() as f32)
            }
            None => Rect::zero(),
        }
    }

    fn display_size(&self, element: ElementId) -> Size {
        match self.elements.get(&element) {
            Some(target) => Size::new(target.client_width() as f32, target.client_height() as f32),
            None => Size::zero(),
        }
    }
}

fn detach(target: &Element, event_type: &str, listener: &Listener) {
    if let Err(err) = target.remove_event_listener_with_callback(event_type, listener.as_ref().unchecked_ref()) {
        log::warn!("web: failed to remove {} listener: {:?}", event_type, err);
    }
}

fn detect_pointer_events(window: &Window) -> PointerEventsSupport {
    let has = |name: &str| js_sys::Reflect::has(window, &JsValue::from_str(name)).unwrap_or(false);

    if has("PointerEvent") {
        PointerEventsSupport::Standard
    } else if has("MSPointerEvent") {
        PointerEventsSupport::Prefixed
    } else {
        PointerEventsSupport::Unsupported
    }
}

/// Convert a DOM event into a [`NativeEvent`], expanding `changedTouches`
pub fn native_from_dom(event: &Event) -> NativeEvent {
    let kind = event.type_();
    let time_stamp = event.time_stamp();

    if let Some(touch_event) = event.dyn_ref::<TouchEvent>() {
        let list = touch_event.changed_touches();
        let touches = (0..list.length())
            .filter_map(|index| list.item(index))
            .map(|touch| TouchPoint::new(touch.identifier() as u64, touch.page_x() as f32, touch.page_y() as f32))
            .collect();
        return NativeEvent::touch(kind, touches, time_stamp);
    }

    if let Some(pointer_event) = event.dyn_ref::<PointerEvent>() {
        return NativeEvent::pointer(
            kind,
            pointer_event.pointer_id() as u64,
            pointer_event.page_x() as f32,
            pointer_event.page_y() as f32,
            time_stamp,
        );
    }

    match event.dyn_ref::<MouseEvent>() {
        Some(mouse_event) => NativeEvent::mouse(kind, mouse_event.page_x() as f32, mouse_event.page_y() as f32, time_stamp),
        None => NativeEvent::mouse(kind, 0.0, 0.0, time_stamp),
    }
}
