//! Drawing surface hosting a scene

use crate::events::emitter::{EventListeners, ListenerId};
use crate::events::event::{EventName, EventTarget, PointerEvent};
use crate::geometry::{Point, Size};
use crate::input::host::ElementId;
use crate::scene::{Camera, NodeId, Scene, SceneGraph};

/// A drawing surface: the host element, its backing-store size, the camera
/// looking at the world, and the interactive scene
///
/// Display size and on-page placement belong to the host element and are
/// queried through [`crate::input::host::InputHost`].
#[derive(Debug)]
pub struct Surface<S: SceneGraph = Scene> {
    element: ElementId,
    pixel_size: Size,
    camera: Option<Camera>,
    scene: Option<S>,
    listeners: EventListeners,
}

impl<S: SceneGraph> Surface<S> {
    /// Create a surface with no camera and no scene attached
    pub fn new(element: ElementId, pixel_size: Size) -> Self {
        Self {
            element,
            pixel_size,
            camera: None,
            scene: None,
            listeners: EventListeners::new(),
        }
    }

    /// Create a surface with an identity camera over `scene`
    pub fn with_scene(element: ElementId, pixel_size: Size, scene: S) -> Self {
        let mut surface = Self::new(element, pixel_size);
        surface.camera = Some(Camera::default());
        surface.scene = Some(scene);
        surface
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Size of the backing store in device pixels
    pub fn pixel_size(&self) -> Size {
        self.pixel_size
    }

    pub fn set_pixel_size(&mut self, size: Size) {
        self.pixel_size = size;
    }

    /// Offset from the top-left pixel to the camera origin
    pub fn centre_offset(&self) -> Point {
        Camera::centre_offset(self.pixel_size)
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    pub fn scene(&self) -> Option<&S> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut S> {
        self.scene.as_mut()
    }

    pub fn set_scene(&mut self, scene: S) {
        self.scene = Some(scene);
    }

    /// Detach the scene, returning it
    pub fn take_scene(&mut self) -> Option<S> {
        self.scene.take()
    }

    /// Root of the attached scene, if any
    pub fn scene_root(&self) -> Option<NodeId> {
        self.scene.as_ref().map(SceneGraph::root)
    }

    /// Listener registry for this surface and its scene's nodes
    pub fn listeners(&self) -> &EventListeners {
        &self.listeners
    }

    /// Listen for `name` on `target`
    pub fn on(
        &self,
        target: impl Into<EventTarget>,
        name: EventName,
        listener: impl Fn(&mut PointerEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        self.listeners.on(target.into(), name, listener)
    }

    /// Remove a listener registered with [`Surface::on`]
    pub fn off(&self, id: ListenerId) -> bool {
        self.listeners.off(id)
    }
}
