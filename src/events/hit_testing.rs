//! Hit testing over the scene tree
//!
//! Picking walks siblings from the top-most (last drawn) to the bottom-most
//! and descends into the first node that contains the point, so children win
//! over their parent's own body. Ancestry helpers answer the tree questions
//! enter/leave computation needs.

use crate::geometry::Point;
use crate::scene::{NodeId, SceneGraph};
use crate::surface::Surface;

/// Hit testing engine for determining the front object under a point
#[derive(Debug)]
pub struct HitTester {
    /// Performance statistics
    pub stats: HitTestStats,
}

/// Performance statistics for hit testing
#[derive(Debug, Default, Clone)]
pub struct HitTestStats {
    /// Number of hit tests performed
    pub hit_tests: u64,
    /// Time spent in hit testing (microseconds, at least 1 per test)
    pub hit_test_time_us: u64,
    /// Number of nodes tested in the last hit test
    pub nodes_tested: u32,
    /// Number of hit tests that found a node
    pub hits_found: u64,
}

impl HitTester {
    /// Create a new hit tester
    pub fn new() -> Self {
        Self {
            stats: HitTestStats::default(),
        }
    }

    /// Find the top-most node under `point` (world space) among `nodes` and
    /// their descendants
    pub fn find_front_object<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &S,
        point: Point,
        nodes: &[NodeId],
    ) -> Option<NodeId> {
        let start_time = std::time::Instant::now();
        self.stats.nodes_tested = 0;

        let found = self.find_front_recursive(scene, point, nodes);

        let elapsed = start_time.elapsed();
        self.stats.hit_tests += 1;
        let elapsed_us = std::cmp::max(1, elapsed.as_micros() as u64);
        self.stats.hit_test_time_us += elapsed_us;
        if found.is_some() {
            self.stats.hits_found += 1;
        }

        found
    }

    fn find_front_recursive<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &S,
        point: Point,
        nodes: &[NodeId],
    ) -> Option<NodeId> {
        for node in nodes.iter().rev() {
            self.stats.nodes_tested += 1;

            if !scene.contains_point(*node, point) {
                continue;
            }

            let children = scene.children(*node);
            if !children.is_empty() {
                if let Some(child) = self.find_front_recursive(scene, point, children) {
                    return Some(child);
                }
            }
            return Some(*node);
        }
        None
    }

    /// Find the front object under a surface-space point. Yields `None` when
    /// the surface has no camera or no scene.
    pub fn find_front_object_in_surface<S: SceneGraph>(
        &mut self,
        surface: &Surface<S>,
        x: f32,
        y: f32,
    ) -> Option<NodeId> {
        let (camera, scene) = (surface.camera()?, surface.scene()?);

        let centred = Point::new(x, y) - surface.centre_offset();
        let world = camera.to_world(centred)?;
        self.find_front_object(scene, world, scene.children(scene.root()))
    }

    /// Reset hit testing statistics
    pub fn reset_stats(&mut self) {
        self.stats = HitTestStats::default();
    }

    /// Get hit testing statistics
    pub fn get_stats(&self) -> &HitTestStats {
        &self.stats
    }
}

impl Default for HitTester {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HitTestStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Hit Test Stats: {} tests, {}μs total time, {} nodes tested, {} hits found",
            self.hit_tests, self.hit_test_time_us, self.nodes_tested, self.hits_found
        )
    }
}

/// Whether `candidate` is a strict ancestor of `node`
pub fn is_ancestor_of<S: SceneGraph + ?Sized>(scene: &S, candidate: NodeId, node: NodeId) -> bool {
    if candidate == node {
        return false;
    }

    let mut cursor = scene.parent(node);
    while let Some(current) = cursor {
        if current == candidate {
            return true;
        }
        cursor = scene.parent(current);
    }
    false
}

/// `[node, parent, grandparent, ...]` up to the root, or up to but excluding
/// `stop` when it lies on the way
pub fn ancestor_chain<S: SceneGraph + ?Sized>(
    scene: &S,
    node: NodeId,
    stop: Option<NodeId>,
) -> Vec<NodeId> {
    let mut chain = Vec::new();
    let mut cursor = Some(node);

    while let Some(current) = cursor {
        if Some(current) == stop {
            break;
        }
        chain.push(current);
        cursor = scene.parent(current);
    }
    chain
}

/// Innermost node both `a` and `b` descend from (a node counts as its own
/// descendant here). `None` when they live in disjoint trees.
pub fn find_shared_ancestor<S: SceneGraph + ?Sized>(
    scene: &S,
    a: NodeId,
    b: NodeId,
) -> Option<NodeId> {
    let chain_a = ancestor_chain(scene, a, None);
    let chain_b = ancestor_chain(scene, b, None);

    chain_a
        .iter()
        .rev()
        .zip(chain_b.iter().rev())
        .take_while(|(x, y)| x == y)
        .last()
        .map(|(shared, _)| *shared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Size, Transform};
    use crate::scene::{Camera, Scene, Shape};
    use crate::surface::Surface;
    use crate::input::host::ElementId;
    use rand::Rng;

    /// root -> [a (0..200 square) -> [b (50..150 square)], c (100..300 square)]
    fn create_test_scene() -> (Scene, NodeId, NodeId, NodeId) {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene
            .add_child(root, Shape::Rect(Rect::new(0.0, 0.0, 200.0, 200.0)))
            .unwrap();
        let b = scene
            .add_child(a, Shape::Rect(Rect::new(50.0, 50.0, 100.0, 100.0)))
            .unwrap();
        let c = scene
            .add_child(root, Shape::Rect(Rect::new(100.0, 100.0, 200.0, 200.0)))
            .unwrap();
        (scene, a, b, c)
    }

    fn random_tree(size: usize) -> Scene {
        let mut rng = rand::thread_rng();
        let mut scene = Scene::new();
        let mut ids = vec![scene.root()];
        for _ in 0..size {
            let parent = ids[rng.gen_range(0..ids.len())];
            ids.push(scene.add_child(parent, Shape::Group).unwrap());
        }
        scene
    }

    #[test]
    fn test_hit_tester_creation() {
        let hit_tester = HitTester::new();
        assert_eq!(hit_tester.stats.hit_tests, 0);
        assert_eq!(hit_tester.stats.nodes_tested, 0);
    }

    #[test]
    fn test_top_most_sibling_wins() {
        let (scene, _, _, c) = create_test_scene();
        let mut hit_tester = HitTester::new();
        // Inside a, b and c: c is drawn last
        let hit = hit_tester.find_front_object(&scene, Point::new(120.0, 120.0), scene.children(scene.root()));
        assert_eq!(hit, Some(c));
    }

    #[test]
    fn test_child_preferred_over_parent() {
        let (scene, a, b, _) = create_test_scene();
        let mut hit_tester = HitTester::new();

        let hit = hit_tester.find_front_object(&scene, Point::new(60.0, 60.0), scene.children(scene.root()));
        assert_eq!(hit, Some(b));

        // Parent body acts as fallback outside its children
        let hit = hit_tester.find_front_object(&scene, Point::new(10.0, 10.0), scene.children(scene.root()));
        assert_eq!(hit, Some(a));
    }

    #[test]
    fn test_hit_test_miss() {
        let (scene, ..) = create_test_scene();
        let mut hit_tester = HitTester::new();
        let hit = hit_tester.find_front_object(&scene, Point::new(500.0, 500.0), scene.children(scene.root()));
        assert_eq!(hit, None);
        assert_eq!(hit_tester.stats.hits_found, 0);
    }

    #[test]
    fn test_group_without_own_body_returns_child() {
        let mut scene = Scene::new();
        let root = scene.root();
        let group = scene.add_child(root, Shape::Group).unwrap();
        let dot = scene
            .add_child_with_transform(group, Shape::Circle { radius: 2.0 }, Transform::translation(10.0, 10.0))
            .unwrap();
        let mut hit_tester = HitTester::new();

        assert_eq!(
            hit_tester.find_front_object(&scene, Point::new(11.0, 10.0), scene.children(root)),
            Some(dot)
        );
        assert_eq!(
            hit_tester.find_front_object(&scene, Point::new(0.0, 0.0), scene.children(root)),
            None
        );
    }

    #[test]
    fn test_find_front_object_in_surface_maps_through_camera() {
        let (scene, _, b, _) = create_test_scene();
        let mut surface = Surface::new(ElementId(1), Size::new(200.0, 100.0));
        let mut hit_tester = HitTester::new();

        // No camera or scene yet
        assert_eq!(hit_tester.find_front_object_in_surface(&surface, 100.0, 50.0), None);

        surface.set_scene(scene);
        assert_eq!(hit_tester.find_front_object_in_surface(&surface, 100.0, 50.0), None);

        // Centre of the surface looks at world (60, 60), inside b only
        surface.set_camera(Camera::new(Point::new(60.0, 60.0), 0.0, 1.0));
        assert_eq!(hit_tester.find_front_object_in_surface(&surface, 100.0, 50.0), Some(b));
    }

    #[test]
    fn test_hit_test_statistics() {
        let (scene, ..) = create_test_scene();
        let mut hit_tester = HitTester::new();
        hit_tester.find_front_object(&scene, Point::new(60.0, 60.0), scene.children(scene.root()));

        assert_eq!(hit_tester.stats.hit_tests, 1);
        assert!(hit_tester.stats.nodes_tested > 0);
        assert!(hit_tester.stats.hit_test_time_us > 0);
        assert_eq!(hit_tester.stats.hits_found, 1);

        let stats_str = format!("{}", hit_tester.stats);
        assert!(stats_str.contains("1 tests"));
        assert!(stats_str.contains("1 hits found"));

        hit_tester.reset_stats();
        assert_eq!(hit_tester.get_stats().hit_tests, 0);
    }

    #[test]
    fn test_ancestry_helpers() {
        let (scene, a, b, c) = create_test_scene();
        let root = scene.root();

        assert!(is_ancestor_of(&scene, a, b));
        assert!(is_ancestor_of(&scene, root, b));
        assert!(!is_ancestor_of(&scene, b, a));
        assert!(!is_ancestor_of(&scene, c, b));
        assert!(!is_ancestor_of(&scene, a, a));

        assert_eq!(ancestor_chain(&scene, b, None), vec![b, a, root]);
        assert_eq!(ancestor_chain(&scene, b, Some(a)), vec![b]);
        assert_eq!(ancestor_chain(&scene, b, Some(root)), vec![b, a]);

        assert_eq!(find_shared_ancestor(&scene, b, c), Some(root));
        assert_eq!(find_shared_ancestor(&scene, b, a), Some(a));
        assert_eq!(find_shared_ancestor(&scene, b, b), Some(b));
    }

    #[test]
    fn test_shared_ancestor_of_disjoint_nodes_is_none() {
        let (mut scene, a, b, _) = create_test_scene();
        let orphan = NodeId::from_raw(999);
        assert_eq!(find_shared_ancestor(&scene, b, orphan), None);

        scene.remove(a).unwrap();
        // b is stale now and resolves to nothing
        assert_eq!(ancestor_chain(&scene, b, None), vec![b]);
    }

    #[test]
    fn test_ancestry_properties_on_random_trees() {
        for _ in 0..20 {
            let scene = random_tree(40);
            let ids: Vec<NodeId> = (0..=40).map(NodeId::from_raw).collect();

            for &x in &ids {
                assert!(!is_ancestor_of(&scene, x, x));
                let chain = ancestor_chain(&scene, x, None);
                assert_eq!(chain.last(), Some(&scene.root()));

                // Transitive along the parent chain
                for (i, &lower) in chain.iter().enumerate() {
                    for &upper in &chain[i + 1..] {
                        assert!(is_ancestor_of(&scene, upper, lower));
                        assert!(!is_ancestor_of(&scene, lower, upper));
                    }
                }
            }

            for &x in &ids {
                for &y in &ids {
                    let shared = find_shared_ancestor(&scene, x, y).unwrap();
                    assert!(shared == x || is_ancestor_of(&scene, shared, x));
                    assert!(shared == y || is_ancestor_of(&scene, shared, y));
                }
            }
        }
    }
}
