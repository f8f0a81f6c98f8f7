//! Scene graph contract consumed by the pointer pipeline
//!
//! The pointer layer only reads structure: paint-ordered children, parent
//! back-references and a transform-aware containment test. `arena::Scene` is
//! the stock implementation; any other retained tree can plug in by
//! implementing [`SceneGraph`].

pub mod arena;
pub mod camera;

pub use arena::{Scene, SceneError, SceneNode, Shape};
pub use camera::Camera;

use std::fmt;

use crate::geometry::{Point, Transform};

/// Opaque handle to a node in a scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Build a handle from a raw index. Only meaningful to the graph that
    /// issued it.
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Read-only capabilities the pointer subsystem needs from a scene graph
pub trait SceneGraph {
    /// The scene root. It is never returned by hit testing itself; "no
    /// front object" stands for it.
    fn root(&self) -> NodeId;

    /// Children in paint order: index 0 is drawn first (bottom-most).
    /// Unknown handles yield an empty slice.
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Parent back-reference, `None` at the root or for unknown handles
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Whether `point`, given in world space, lies inside the node's own
    /// region once the node's full transform chain is taken into account
    fn contains_point(&self, node: NodeId, point: Point) -> bool;

    /// Full local-to-world transform: the node's own transform composed with
    /// every ancestor's
    fn world_transform(&self, node: NodeId) -> Transform;

    /// Map a world-space point into the node's local space
    fn world_to_local(&self, node: NodeId, point: Point) -> Option<Point> {
        self.world_transform(node).inverse().map(|inv| inv.apply(point))
    }
}
