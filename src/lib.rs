// Core module of the Orbit pointer layer
pub mod config;
pub mod events;
pub mod geometry;
pub mod input;
pub mod scene;
pub mod surface;

/// Version of the Orbit pointer layer
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export of common types for convenience
pub mod prelude {
    pub use crate::config::PointerConfig;
    pub use crate::events::{
        EventListeners, EventName, EventTarget, ListenerId, PointerEvent, PropagationPhase,
    };
    pub use crate::geometry::{Point, Rect, Size, Transform};
    pub use crate::input::{
        ElementId, EventOutcome, HeadlessHost, InputHost, InputManager, NativeEvent, PointerKey,
        PointerEventsSupport, TouchPoint,
    };
    pub use crate::scene::{Camera, NodeId, Scene, SceneGraph, Shape};
    pub use crate::surface::Surface;
}

/// Initialize the pointer layer. Installs no logger; that is up to the
/// application.
pub fn init() -> Result<()> {
    log::info!("orbit-pointer {} initialized", VERSION);
    Ok(())
}

/// Errors that can occur in the Orbit pointer layer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Scene error: {0}")]
    Scene(#[from] scene::SceneError),

    #[error("Platform error: {0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, Error>;
