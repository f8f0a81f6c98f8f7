//! Input manager wiring host, normalizer and per-surface controllers
//!
//! The manager owns the host binding. Surfaces stay with the caller and are
//! passed in on every native event, so a scene can be edited between events
//! without the manager holding a borrow.

use std::collections::HashMap;
use std::path::Path;

use crate::config::PointerConfig;
use crate::scene::SceneGraph;
use crate::surface::Surface;

use super::controller::PointerController;
use super::host::{ElementId, InputHost};
use super::native::{NativeEvent, PointerKey, Verb};
use super::normalizer::Normalizer;
use super::state::PointerState;

/// What happened to one native event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// Verb forwarded to the controller, `None` when the event was dropped
    pub dispatched: Option<Verb>,
    /// Whether the host should suppress the native default action
    pub prevent_default: bool,
}

/// Routes native events from a host to the controllers of enabled surfaces
#[derive(Debug)]
pub struct InputManager<H: InputHost> {
    host: H,
    config: PointerConfig,
    normalizer: Normalizer,
    controllers: HashMap<ElementId, PointerController>,
}

impl<H: InputHost> InputManager<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, PointerConfig::default())
    }

    pub fn with_config(host: H, config: PointerConfig) -> Self {
        Self {
            host,
            normalizer: Normalizer::with_emulation_window(config.mouse_emulation_window_ms),
            config,
            controllers: HashMap::new(),
        }
    }

    /// Build a manager from a JSON configuration file
    pub fn with_config_file(host: H, path: impl AsRef<Path>) -> crate::Result<Self> {
        let config = PointerConfig::from_file(path)?;
        Ok(Self::with_config(host, config))
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &PointerConfig {
        &self.config
    }

    /// Start listening for input on `surface`. Returns `false` if it was
    /// already enabled.
    pub fn enable_for_surface<S: SceneGraph>(&mut self, surface: &Surface<S>) -> bool {
        let element = surface.element();
        if !self.normalizer.add_listeners(element, &mut self.host) {
            return false;
        }

        self.controllers
            .insert(element, PointerController::new(self.config.clone()));
        log::info!("input: enabled pointer input for {}", element);
        true
    }

    /// Stop listening on `surface` and drop its pointer state. Returns
    /// `false` if it was not enabled.
    pub fn disable_for_surface<S: SceneGraph>(&mut self, surface: &Surface<S>) -> bool {
        let element = surface.element();
        if !self.normalizer.remove_listeners(element, &mut self.host) {
            return false;
        }

        self.controllers.remove(&element);
        log::info!("input: disabled pointer input for {}", element);
        true
    }

    pub fn is_enabled(&self, element: ElementId) -> bool {
        self.normalizer.is_registered(element)
    }

    /// Feed one native event delivered on `surface`'s element
    pub fn handle_native_event<S: SceneGraph>(&mut self, surface: &Surface<S>, event: &NativeEvent) -> EventOutcome {
        let element = surface.element();
        let normalized = self.normalizer.normalize(element, event);

        let outcome = EventOutcome {
            dispatched: normalized.verb,
            prevent_default: normalized.prevent_default,
        };

        let Some(verb) = normalized.verb else {
            return outcome;
        };

        match self.controllers.get_mut(&element) {
            Some(controller) => controller.dispatch(verb, event, surface, &self.host),
            None => {
                log::warn!("input: {} registered without a controller", element);
                return EventOutcome::default();
            }
        }

        outcome
    }

    /// Controller of an enabled surface
    pub fn controller(&self, element: ElementId) -> Option<&PointerController> {
        self.controllers.get(&element)
    }

    /// Stored state of one pointer stream on an enabled surface
    pub fn pointer_state(&self, element: ElementId, key: PointerKey) -> Option<&PointerState> {
        self.controllers.get(&element)?.states().state(key)
    }
}
