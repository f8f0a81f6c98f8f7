//! Pointer controller: the state machine turning verbs into scene events
//!
//! Every sample is resolved to surface and world coordinates, hit-tested for
//! its front object, checked against the pointer's stored state and turned
//! into `down`/`up`/`move`/`downmove`/`enter`/`leave`/`click`/`dblclick`
//! emissions. Samples of one native event run one after another, each to
//! completion.

use crate::config::PointerConfig;
use crate::events::dispatcher::EventDispatcher;
use crate::events::event::{EventName, EventTarget};
use crate::events::hit_testing::{ancestor_chain, find_shared_ancestor, is_ancestor_of, HitTester};
use crate::scene::{NodeId, SceneGraph};
use crate::surface::Surface;

use super::coords::{CoordTarget, CoordinateMapper, ResolvedPointer};
use super::host::InputHost;
use super::native::{InteractionType, NativeEvent, PointerKey, PointerSample, Verb};
use super::state::PointerStateStore;

/// Drives hit testing, pointer state and emission for one surface
#[derive(Debug, Default)]
pub struct PointerController {
    config: PointerConfig,
    states: PointerStateStore,
    hit_tester: HitTester,
    mapper: CoordinateMapper,
    dispatcher: EventDispatcher,
}

impl PointerController {
    pub fn new(config: PointerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PointerConfig {
        &self.config
    }

    /// Stored pointer state
    pub fn states(&self) -> &PointerStateStore {
        &self.states
    }

    pub fn hit_tester(&self) -> &HitTester {
        &self.hit_tester
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// Forget every pointer stream
    pub fn reset(&mut self) {
        self.states.clear();
    }

    /// Handle one normalized native event
    pub fn dispatch<S, H>(&mut self, verb: Verb, event: &NativeEvent, surface: &Surface<S>, host: &H)
    where
        S: SceneGraph,
        H: InputHost + ?Sized,
    {
        for sample in PointerSample::from_native(event) {
            let key = sample.key(self.config.track_pointer_identity);
            let coords = self.mapper.resolve(&sample, surface, host, CoordTarget::World);
            let pointer = ResolvedPointer { sample, coords };

            log::trace!(
                "controller: {:?} for {:?} at surface {}",
                verb,
                key,
                pointer.coords.surface
            );

            match verb {
                Verb::Down => self.handle_down(key, &pointer, surface),
                Verb::Up => self.handle_up(key, &pointer, surface),
                Verb::Move => self.handle_move(key, &pointer, surface),
                Verb::Out => self.handle_out(key, &pointer, surface),
                Verb::Cancel => self.handle_cancel(key, &pointer, surface),
                Verb::DoubleClick => self.handle_double_click(&pointer, surface, None),
            }
        }
    }

    fn find_front_object<S: SceneGraph>(&mut self, pointer: &ResolvedPointer, surface: &Surface<S>) -> Option<NodeId> {
        let point = pointer.coords.surface;
        self.hit_tester.find_front_object_in_surface(surface, point.x, point.y)
    }

    /// The front object, or the scene root standing in for "nothing", or the
    /// bare surface when there is no scene at all
    fn front_or_scene<S: SceneGraph>(front: Option<NodeId>, surface: &Surface<S>) -> EventTarget {
        EventTarget::from_node(front.or_else(|| surface.scene_root()))
    }

    fn handle_down<S: SceneGraph>(&mut self, key: PointerKey, pointer: &ResolvedPointer, surface: &Surface<S>) {
        let front = self.find_front_object(pointer, surface);
        let target = Self::front_or_scene(front, surface);

        let state = self.states.state_mut(key);
        let previous = state.front_object();
        state.press_pointer(target);

        if previous.is_none() || front != previous {
            self.update_front_object(key, front, pointer, surface);
        }

        self.dispatcher.emit_for_target(EventName::Down, pointer, surface, target);
    }

    fn handle_up<S: SceneGraph>(&mut self, key: PointerKey, pointer: &ResolvedPointer, surface: &Surface<S>) {
        let front = self.find_front_object(pointer, surface);
        let target = Self::front_or_scene(front, surface);
        let is_touch = pointer.sample.interaction == InteractionType::Touch;

        let state = self.states.state_mut(key);
        let pressed = state.release_pointer();
        let should_click = match (pressed, front) {
            (Some(pressed), _) if pressed == target => true,
            (Some(EventTarget::Node(pressed)), Some(front)) => surface
                .scene()
                .is_some_and(|scene| is_ancestor_of(scene, pressed, front)),
            _ => false,
        };

        self.dispatcher.emit_for_target(EventName::Up, pointer, surface, target);

        if is_touch {
            // A lifted finger hovers nothing
            let state = self.states.state_mut(key);
            let previous = state.front_object();
            state.set_front_object(None);
            state.leave_surface();

            let left = Self::front_or_scene(previous, surface);
            self.dispatcher.emit_for_target(EventName::Leave, pointer, surface, left);
        }

        if let (true, Some(pressed)) = (should_click, pressed) {
            self.dispatcher.emit_for_target(EventName::Click, pointer, surface, pressed);

            let count = self.states.clicks_mut(pointer.sample.interaction).register_click(
                pressed,
                pointer.sample.time_stamp,
                self.config.double_click_window_ms,
            );

            // Touch hosts fire no native dblclick
            if is_touch && self.config.emulate_touch_double_click && count >= self.config.double_click_count {
                self.handle_double_click(pointer, surface, Some(pressed));
            }
        }

        let released_outside = matches!(key, PointerKey::Pointer(_))
            && self.states.state(key).is_some_and(|state| !state.has_entered_surface());
        if is_touch || released_outside {
            self.states.remove(key);
        }
    }

    fn handle_move<S: SceneGraph>(&mut self, key: PointerKey, pointer: &ResolvedPointer, surface: &Surface<S>) {
        let front = self.find_front_object(pointer, surface);
        let target = Self::front_or_scene(front, surface);

        if front != self.states.state_mut(key).front_object() {
            self.update_front_object(key, front, pointer, surface);
        }

        self.dispatcher.emit_for_target(EventName::Move, pointer, surface, target);

        if self.states.state_mut(key).pressed_object().is_some() {
            self.dispatcher.emit_for_target(EventName::DownMove, pointer, surface, target);
        }
    }

    fn handle_out<S: SceneGraph>(&mut self, key: PointerKey, pointer: &ResolvedPointer, surface: &Surface<S>) {
        self.update_front_object(key, None, pointer, surface);
        let state = self.states.state_mut(key);
        state.leave_surface();
        let pressed = state.pressed_object().is_some();
        self.dispatcher.emit_for_canvas(EventName::Leave, pointer, surface);

        // A released Pointer Events stream ends once it leaves the surface
        if matches!(key, PointerKey::Pointer(_)) && !pressed {
            self.states.remove(key);
        }
    }

    fn handle_cancel<S: SceneGraph>(&mut self, key: PointerKey, pointer: &ResolvedPointer, surface: &Surface<S>) {
        self.states.state_mut(key).release_pointer();
        self.handle_out(key, pointer, surface);

        if pointer.sample.interaction == InteractionType::Touch {
            self.states.remove(key);
        }
    }

    fn handle_double_click<S: SceneGraph>(
        &mut self,
        pointer: &ResolvedPointer,
        surface: &Surface<S>,
        object: Option<EventTarget>,
    ) {
        let target = match object {
            Some(target) => target,
            None => {
                let front = self.find_front_object(pointer, surface);
                Self::front_or_scene(front, surface)
            }
        };

        let clicks = self.states.clicks_mut(pointer.sample.interaction);
        if clicks.click_count(target) >= self.config.double_click_count {
            clicks.clear_clicks(target);
            self.dispatcher.emit_for_target(EventName::DoubleClick, pointer, surface, target);
        }
    }

    /// Move the stored front object to `next`, emitting the enter/leave
    /// sequence the tree transition implies
    fn update_front_object<S: SceneGraph>(
        &mut self,
        key: PointerKey,
        next: Option<NodeId>,
        pointer: &ResolvedPointer,
        surface: &Surface<S>,
    ) {
        let state = self.states.state_mut(key);
        let previous = state.front_object();
        let entered = state.has_entered_surface();
        state.set_front_object(next);

        if previous.is_some() && previous == next {
            return;
        }
        log::debug!("controller: front object of {:?} {:?} -> {:?}", key, previous, next);

        let root = surface.scene_root();
        let scene = surface.scene();
        let is_ancestor = |a: NodeId, b: NodeId| scene.is_some_and(|scene| is_ancestor_of(scene, a, b));

        match (previous, next) {
            (Some(previous), Some(next)) if is_ancestor(previous, next) => {
                self.dispatcher
                    .emit_between_objects(EventName::Enter, pointer, surface, next, Some(previous));
            }
            (Some(previous), Some(next)) if is_ancestor(next, previous) => {
                self.dispatcher
                    .emit_between_objects(EventName::Leave, pointer, surface, previous, Some(next));
            }
            (Some(previous), Some(next)) => {
                // Both spans are fixed before any listener runs
                let (leaving, entering) = match scene {
                    Some(scene) => {
                        let shared = find_shared_ancestor(scene, previous, next).or(root);
                        (ancestor_chain(scene, previous, shared), ancestor_chain(scene, next, shared))
                    }
                    None => (vec![previous], vec![next]),
                };
                self.dispatcher
                    .emit_for_span(EventName::Leave, pointer, surface, &leaving);
                self.dispatcher
                    .emit_for_span(EventName::Enter, pointer, surface, &entering);
            }
            (Some(previous), None) => {
                self.dispatcher
                    .emit_between_objects(EventName::Leave, pointer, surface, previous, root);
            }
            (None, next) if entered => {
                if let Some(next) = next {
                    self.dispatcher
                        .emit_between_objects(EventName::Enter, pointer, surface, next, root);
                }
            }
            (None, next) => {
                self.states.state_mut(key).enter_surface();
                match next {
                    Some(next) => self.dispatcher.emit_from_object(EventName::Enter, pointer, surface, next),
                    None => self.dispatcher.emit_for_canvas(EventName::Enter, pointer, surface),
                }
            }
        }
    }
}
