//! Arena-backed scene graph
//!
//! Nodes live in a slot vector indexed by [`NodeId`]. Parents own their
//! children through ordered id lists; children point back at their parent by
//! index only. Handles of removed nodes are never reissued, so a stale handle
//! simply stops resolving.

use crate::geometry::{Point, Rect, Transform};

use super::{NodeId, SceneGraph};

/// Result type for scene mutations
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised by scene mutations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The handle does not resolve to a live node
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Attaching `node` under `parent` would make a node its own ancestor
    #[error("Attaching {node} under {parent} would create a cycle")]
    Cycle { node: NodeId, parent: NodeId },

    /// The scene root cannot be moved or removed
    #[error("The scene root cannot be moved or removed")]
    RootImmutable,
}

/// Geometry a node occupies in its local space
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Occupies nothing itself; its region is the union of its children
    Group,
    /// Axis-aligned rectangle in local coordinates
    Rect(Rect),
    /// Circle centred on the local origin
    Circle { radius: f32 },
}

impl Shape {
    fn contains_local(&self, point: Point) -> bool {
        match self {
            Shape::Group => false,
            Shape::Rect(rect) => rect.contains_point(point),
            Shape::Circle { radius } => point.distance_to(Point::zero()) <= *radius,
        }
    }
}

/// A drawable node
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Optional label, handy in logs and tests
    pub name: Option<String>,
    /// Own geometry
    pub shape: Shape,
    /// Transform relative to the parent
    pub transform: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    fn new(shape: Shape, transform: Transform, parent: Option<NodeId>) -> Self {
        Self {
            name: None,
            shape,
            transform,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Retained scene tree rooted at a group node
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Option<SceneNode>>,
}

impl Scene {
    /// Create a scene holding only its root group
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(SceneNode::new(Shape::Group, Transform::identity(), None))],
        }
    }

    /// Look up a live node
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> SceneResult<&mut SceneNode> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(SceneError::NodeNotFound(id))
    }

    /// Whether the handle resolves to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Append a child on top of `parent`'s existing children
    pub fn add_child(&mut self, parent: NodeId, shape: Shape) -> SceneResult<NodeId> {
        self.add_child_with_transform(parent, shape, Transform::identity())
    }

    /// Append a child with an explicit local transform
    pub fn add_child_with_transform(
        &mut self,
        parent: NodeId,
        shape: Shape,
        transform: Transform,
    ) -> SceneResult<NodeId> {
        if !self.contains(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(SceneNode::new(shape, transform, Some(parent))));
        self.node_mut(parent)?.children.push(id);

        log::trace!("scene: added {} under {}", id, parent);
        Ok(id)
    }

    /// Give a node a label
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> SceneResult<()> {
        self.node_mut(id)?.name = Some(name.into());
        Ok(())
    }

    /// Replace a node's local transform
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> SceneResult<()> {
        self.node_mut(id)?.transform = transform;
        Ok(())
    }

    /// Move `node` (and its subtree) to the top of `new_parent`'s children
    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId) -> SceneResult<()> {
        if node == self.root() {
            return Err(SceneError::RootImmutable);
        }
        if !self.contains(node) {
            return Err(SceneError::NodeNotFound(node));
        }
        if !self.contains(new_parent) {
            return Err(SceneError::NodeNotFound(new_parent));
        }

        // Refuse to hang a node beneath itself
        let mut cursor = Some(new_parent);
        while let Some(current) = cursor {
            if current == node {
                return Err(SceneError::Cycle {
                    node,
                    parent: new_parent,
                });
            }
            cursor = self.parent(current);
        }

        self.detach(node)?;
        self.node_mut(node)?.parent = Some(new_parent);
        self.node_mut(new_parent)?.children.push(node);
        Ok(())
    }

    /// Remove a node together with its whole subtree
    pub fn remove(&mut self, node: NodeId) -> SceneResult<()> {
        if node == self.root() {
            return Err(SceneError::RootImmutable);
        }
        if !self.contains(node) {
            return Err(SceneError::NodeNotFound(node));
        }

        self.detach(node)?;

        let mut pending = vec![node];
        while let Some(id) = pending.pop() {
            if let Some(removed) = self.nodes.get_mut(id.0).and_then(Option::take) {
                pending.extend(removed.children);
            }
        }
        Ok(())
    }

    fn detach(&mut self, node: NodeId) -> SceneResult<()> {
        if let Some(parent) = self.node_mut(node)?.parent.take() {
            self.node_mut(parent)?.children.retain(|child| *child != node);
        }
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph for Scene {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(SceneNode::children).unwrap_or(&[])
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(SceneNode::parent)
    }

    fn contains_point(&self, node: NodeId, point: Point) -> bool {
        let Some(scene_node) = self.node(node) else {
            return false;
        };

        match scene_node.shape {
            Shape::Group => scene_node
                .children
                .iter()
                .any(|child| self.contains_point(*child, point)),
            ref shape => self
                .world_to_local(node, point)
                .is_some_and(|local| shape.contains_local(local)),
        }
    }

    fn world_transform(&self, node: NodeId) -> Transform {
        let mut transform = match self.node(node) {
            Some(scene_node) => scene_node.transform,
            None => return Transform::identity(),
        };

        let mut cursor = self.parent(node);
        while let Some(ancestor) = cursor {
            if let Some(ancestor_node) = self.node(ancestor) {
                transform = ancestor_node.transform.then(&transform);
            }
            cursor = self.parent(ancestor);
        }
        transform
    }
}
