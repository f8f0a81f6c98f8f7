//! Coordinate mapping for pointer samples
//!
//! A sample travels through four spaces: page/viewport, element-local,
//! surface pixels, world, and finally the local space of a target node.
//! Every step accepts the previous step's result so callers can reuse it;
//! passing `None` recomputes it.

use crate::geometry::Point;
use crate::scene::{NodeId, SceneGraph};
use crate::surface::Surface;

use super::host::InputHost;
use super::native::PointerSample;

/// Coordinate space a caller wants target coordinates in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordTarget {
    /// Surface pixels
    Surface,
    /// World space
    World,
    /// Local space of a scene node
    Node(NodeId),
}

/// A sample resolved into every space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedCoords {
    /// Relative to the element's top-left corner, in CSS pixels
    pub element: Point,
    /// Backing-store pixels
    pub surface: Point,
    /// World space; `None` without a usable camera
    pub world: Option<Point>,
    /// Relative to the requested target; `None` when it cannot be derived
    pub target: Option<Point>,
}

/// A sample plus its resolved coordinates, the unit the dispatcher emits
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPointer {
    pub sample: PointerSample,
    pub coords: ResolvedCoords,
}

/// Maps samples between coordinate spaces
#[derive(Debug, Default, Clone, Copy)]
pub struct CoordinateMapper;

impl CoordinateMapper {
    pub fn new() -> Self {
        Self
    }

    /// Page position to element-local position: remove page scroll, then the
    /// element's rounded viewport offset
    pub fn viewport_to_element<S, H>(&self, sample: &PointerSample, surface: &Surface<S>, host: &H) -> Point
    where
        S: SceneGraph,
        H: InputHost + ?Sized,
    {
        let scroll = host.scroll_offset();
        let rect = host.bounding_rect(surface.element()).rounded();
        Point::new(
            sample.page.x - scroll.x - rect.left(),
            sample.page.y - scroll.y - rect.top(),
        )
    }

    /// Element-local position to backing-store pixels, compensating for CSS
    /// scaling of the surface
    pub fn element_to_surface<S, H>(
        &self,
        sample: &PointerSample,
        surface: &Surface<S>,
        host: &H,
        element: Option<Point>,
    ) -> Point
    where
        S: SceneGraph,
        H: InputHost + ?Sized,
    {
        let element = element.unwrap_or_else(|| self.viewport_to_element(sample, surface, host));
        let display = host.display_size(surface.element());
        let pixels = surface.pixel_size();

        let scale_x = if display.width > 0.0 { pixels.width / display.width } else { 1.0 };
        let scale_y = if display.height > 0.0 { pixels.height / display.height } else { 1.0 };
        Point::new(element.x * scale_x, element.y * scale_y)
    }

    /// Surface pixels to world space through the inverse camera transform.
    /// `None` without a camera or with a degenerate one.
    pub fn surface_to_world<S: SceneGraph>(&self, surface: &Surface<S>, surface_point: Point) -> Option<Point> {
        let camera = surface.camera()?;
        camera.to_world(surface_point - surface.centre_offset())
    }

    /// World space to a node's local space through the inverse of its full
    /// transform chain
    pub fn world_to_target<G: SceneGraph + ?Sized>(&self, scene: &G, target: NodeId, world: Point) -> Option<Point> {
        scene.world_to_local(target, world)
    }

    /// Resolve every layer at once
    pub fn resolve<S, H>(
        &self,
        sample: &PointerSample,
        surface: &Surface<S>,
        host: &H,
        target: CoordTarget,
    ) -> ResolvedCoords
    where
        S: SceneGraph,
        H: InputHost + ?Sized,
    {
        let element = self.viewport_to_element(sample, surface, host);
        let surface_point = self.element_to_surface(sample, surface, host, Some(element));
        let world = self.surface_to_world(surface, surface_point);

        let mut coords = ResolvedCoords {
            element,
            surface: surface_point,
            world,
            target: None,
        };
        coords.target = self.target_coords(surface, &coords, target);
        coords
    }

    /// Target-space position for already resolved coordinates
    pub fn target_coords<S: SceneGraph>(
        &self,
        surface: &Surface<S>,
        coords: &ResolvedCoords,
        target: CoordTarget,
    ) -> Option<Point> {
        match target {
            CoordTarget::Surface => Some(coords.surface),
            CoordTarget::World => coords.world,
            CoordTarget::Node(node) => {
                let scene = surface.scene()?;
                self.world_to_target(scene, node, coords.world?)
            }
        }
    }
}
