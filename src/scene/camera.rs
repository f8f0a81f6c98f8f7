//! Camera looking at the world frame of a scene

use crate::geometry::{Point, Size, Transform};

/// 2D camera over the world
///
/// The camera sits at `position` in world space, rotated by `rotation`
/// radians and magnified by `zoom`. The view transform maps world space to
/// camera space, where the origin is the centre of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Point of the world shown at the centre of the surface
    pub position: Point,

    /// Rotation in radians
    pub rotation: f32,

    /// Magnification factor, 1.0 means one world unit per surface pixel
    pub zoom: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(position: Point, rotation: f32, zoom: f32) -> Self {
        Self {
            position,
            rotation,
            zoom,
        }
    }

    /// Build the world-to-camera transform
    pub fn view_transform(&self) -> Transform {
        Transform::scale(self.zoom, self.zoom)
            .then(&Transform::rotation(-self.rotation))
            .then(&Transform::translation(-self.position.x, -self.position.y))
    }

    /// Camera-to-world transform, `None` for a degenerate zoom
    pub fn inverse_view_transform(&self) -> Option<Transform> {
        self.view_transform().inverse()
    }

    /// Map a surface-centred point into world space
    pub fn to_world(&self, centred: Point) -> Option<Point> {
        self.inverse_view_transform().map(|inv| inv.apply(centred))
    }

    /// Map a world point into surface-centred camera space
    pub fn to_view(&self, world: Point) -> Point {
        self.view_transform().apply(world)
    }

    /// Move the camera by a world-space offset
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.position.x += dx;
        self.position.y += dy;
    }

    /// Set the zoom, ignoring non-positive values
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom > 0.0 {
            self.zoom = zoom;
        }
    }

    /// Half of the surface size: the offset between the surface's top-left
    /// origin and the camera origin
    pub fn centre_offset(surface_pixels: Size) -> Point {
        Point::new(surface_pixels.width / 2.0, surface_pixels.height / 2.0)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Point::zero(), 0.0, 1.0)
    }
}
