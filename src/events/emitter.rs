//! Listener registry for pointer events

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::event::{EventName, EventTarget, PointerEvent};

/// Type for event listener callbacks
type EventCallback = Arc<dyn Fn(&mut PointerEvent) + Send + Sync>;

/// Handle returned by [`EventListeners::on`], used to remove the listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listeners keyed by target and event name
///
/// Cloning shares the underlying registry. Listeners may register or remove
/// other listeners while running: delivery works on a snapshot of the list.
#[derive(Clone, Default)]
pub struct EventListeners {
    /// Listeners grouped by target and event name, in registration order
    handlers: Arc<RwLock<HashMap<(EventTarget, EventName), Vec<(ListenerId, EventCallback)>>>>,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListeners")
            .field("handlers", &"[EventHandlers]")
            .finish()
    }
}

impl EventListeners {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `name` on `target`
    pub fn on(
        &self,
        target: EventTarget,
        name: EventName,
        listener: impl Fn(&mut PointerEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);

        handlers
            .entry((target, name))
            .or_default()
            .push((id, Arc::new(listener)));

        log::debug!("listener {:?} registered for {} on {}", id, name, target);
        id
    }

    /// Remove one listener. Returns whether it was registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let mut removed = false;

        handlers.retain(|_, list| {
            let before = list.len();
            list.retain(|(listener_id, _)| *listener_id != id);
            removed |= list.len() != before;
            !list.is_empty()
        });
        removed
    }

    /// Remove every listener attached to `target`
    pub fn clear_target(&self, target: EventTarget) {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers.retain(|(listener_target, _), _| *listener_target != target);
    }

    /// Remove all listeners
    pub fn clear(&self) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Whether anything listens for `name` on `target`
    pub fn has_listeners(&self, target: EventTarget, name: EventName) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(target, name))
            .is_some_and(|list| !list.is_empty())
    }

    /// Run the listeners of the event's current target. Stops early once a
    /// listener stops propagation. Returns how many listeners ran.
    pub fn deliver(&self, event: &mut PointerEvent) -> usize {
        let key = (event.current_target(), event.name);
        let snapshot: Vec<EventCallback> = {
            let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
            match handlers.get(&key) {
                Some(list) => list.iter().map(|(_, callback)| callback.clone()).collect(),
                None => return 0,
            }
        };

        let mut ran = 0;
        for callback in snapshot {
            callback(event);
            ran += 1;
            if event.propagation.is_propagation_stopped() {
                break;
            }
        }
        ran
    }
}
