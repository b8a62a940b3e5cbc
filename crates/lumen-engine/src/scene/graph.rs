use std::fmt;

use crate::device::{GraphicsDevice, RenderEncoder};
use crate::frame::FrameSlot;
use crate::math::{Mat4, MathError, Vec3};

use super::camera::ViewSource;
use super::{Node, SceneError, Vertex};

/// Handle to a node stored in a [`Scene`].
///
/// Ids are generational: once a node is destroyed its id stops resolving, even if the
/// storage slot is reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

struct Slot<B> {
    generation: u32,
    node: Option<Node<B>>,
}

/// A node tree hanging off a fixed root, plus the projection shared by every node.
///
/// The scene owns all nodes. A node's children are owned through the tree; its parent
/// link is a plain id that is never followed for lifetime purposes.
pub struct Scene<B> {
    slots: Vec<Slot<B>>,
    free: Vec<u32>,
    root: NodeId,
    projection: Mat4,
}

impl<B> Scene<B> {
    /// Creates a scene whose root is a group node named `root_name`.
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = NodeId {
            index: 0,
            generation: 0,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node::group(root_name)),
            }],
            free: Vec::new(),
            root,
            projection: Mat4::IDENTITY,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Replaces the projection used by the next update. Non-finite matrices are rejected.
    pub fn set_projection(&mut self, projection: Mat4) -> Result<(), MathError> {
        if !projection.is_finite() {
            log::error!("rejected projection: {}", MathError::NonFinite);
            return Err(MathError::NonFinite);
        }
        self.projection = projection;
        Ok(())
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Always `false`: the root is never removed.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<B>> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<B>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    fn get(&self, id: NodeId) -> Result<&Node<B>, SceneError> {
        self.node(id).ok_or(SceneError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node<B>, SceneError> {
        self.node_mut(id).ok_or(SceneError::UnknownNode(id))
    }

    /// Takes ownership of a detached node. Attach it with [`Scene::add_child`].
    ///
    /// Fails only when every 32-bit index is already in use.
    pub fn insert(&mut self, mut node: Node<B>) -> Result<NodeId, SceneError> {
        node.parent = None;
        node.children.clear();

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return Ok(NodeId {
                index,
                generation: slot.generation,
            });
        }

        let index = next_index(self.slots.len())?;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        Ok(NodeId {
            index,
            generation: 0,
        })
    }

    /// Builds a drawable node and attaches it under `parent`.
    pub fn create_node<D>(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        vertices: &[Vertex],
        device: &D,
    ) -> Result<NodeId, SceneError>
    where
        D: GraphicsDevice<Buffer = B>,
    {
        self.get(parent)?;
        let id = self.insert(Node::new(name, vertices, device)?)?;
        self.add_child(parent, id)?;
        Ok(id)
    }

    /// `true` if `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.ancestors_of(id).any(|a| a == self.root)
    }

    /// `id` itself followed by each ancestor up to the topmost one.
    fn ancestors_of(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).map(|_| id), move |&cur| {
            self.node(cur).and_then(Node::parent)
        })
    }

    /// Makes `child` the last child of `parent`, detaching it from any previous parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.get(parent)?;
        self.get(child)?;
        if child == self.root {
            return Err(SceneError::RootNode);
        }
        if self.ancestors_of(parent).any(|a| a == child) {
            return Err(SceneError::Cycle { parent, child });
        }

        self.remove_from_parent(child);

        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Detaches `child` from its parent. No-op for detached nodes, unknown ids, or a
    /// link the parent does not acknowledge.
    pub fn remove_from_parent(&mut self, child: NodeId) {
        let Some(parent) = self.node(child).and_then(Node::parent) else {
            return;
        };

        let removed = match self.node_mut(parent) {
            Some(p) => match p.children.iter().position(|&c| c == child) {
                Some(pos) => {
                    p.children.remove(pos);
                    true
                }
                None => false,
            },
            None => false,
        };

        if !removed {
            log::debug!("node {child} has a stale parent link to {parent}; ignored");
            return;
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
    }

    /// Detaches `id` and drops it together with its whole subtree.
    pub fn destroy(&mut self, id: NodeId) -> Result<(), SceneError> {
        if id == self.root {
            return Err(SceneError::RootNode);
        }
        self.get(id)?;
        self.remove_from_parent(id);

        let mut pending = vec![id];
        let mut dropped = 0usize;
        while let Some(cur) = pending.pop() {
            let slot = &mut self.slots[cur.index as usize];
            if let Some(node) = slot.node.take() {
                pending.extend(node.children.iter().copied());
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(cur.index);
                dropped += 1;
            }
        }

        log::debug!("destroyed node {id} and {} descendant(s)", dropped - 1);
        Ok(())
    }

    /// World matrix of `id`: its own model matrix composed with every ancestor's.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        self.node(id)?;
        Some(
            self.ancestors_of(id)
                .filter_map(|a| self.node(a))
                .fold(Mat4::IDENTITY, |acc, n| n.model_matrix() * acc),
        )
    }

    /// World-space origin of `id`.
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        let p = self.world_matrix(id)?.cols[3];
        Some(Vec3::new(p.x, p.y, p.z))
    }

    /// Writes every attached node's uniforms for `slot`.
    ///
    /// `projection * view` is computed once here and shared by the whole traversal;
    /// each node then writes `view_projection * parent_world * model`.
    pub fn update_uniform_buffers<D, V>(&mut self, device: &D, slot: &FrameSlot, view: &V)
    where
        D: GraphicsDevice<Buffer = B>,
        V: ViewSource + ?Sized,
    {
        let view_projection = self.projection * view.view_matrix();

        // Depth first, children in order: each entry carries its parent's world matrix.
        let mut pending = vec![(self.root, Mat4::IDENTITY)];
        while let Some((id, parent_world)) = pending.pop() {
            let Some(node) = self.node_mut(id) else { continue };

            let world = parent_world * node.model_matrix();
            node.write_uniforms(device, slot, world, view_projection);
            pending.extend(node.children.iter().rev().map(|&child| (child, world)));
        }
    }

    /// Records draws for every attached node, depth first, reading `slot`'s uniforms.
    ///
    /// Nodes not updated for this slot are skipped with a warning.
    pub fn render<E>(&self, encoder: &mut E, slot: &FrameSlot) -> usize
    where
        E: RenderEncoder<B> + ?Sized,
    {
        let mut drawn = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            if node.encode(encoder, slot) {
                drawn += 1;
            }
            stack.extend(node.children.iter().rev().copied());
        }
        drawn
    }
}

fn next_index(len: usize) -> Result<u32, SceneError> {
    u32::try_from(len).map_err(|_| SceneError::TooManyNodes { count: len })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameCoordinator;
    use crate::math::{self, Quaternion, Y_AXIS};
    use crate::testing::{Event, Log, RecordingDevice, RecordingEncoder, RecordingFence, TestBuffer};
    use approx::assert_abs_diff_eq;

    fn tri() -> [Vertex; 3] {
        let c = [0.2, 0.4, 0.6, 1.0];
        [
            Vertex::new([0.0, 0.0, 0.0], c),
            Vertex::new([1.0, 0.0, 0.0], c),
            Vertex::new([0.0, 1.0, 0.0], c),
        ]
    }

    struct Fixture {
        log: Log,
        device: RecordingDevice,
        frames: FrameCoordinator<RecordingFence>,
        scene: Scene<TestBuffer>,
    }

    impl Fixture {
        fn new() -> Self {
            let log = Log::default();
            let frames = FrameCoordinator::from_fn(|i| RecordingFence::new(i, log.clone()));
            Self {
                device: RecordingDevice::new(&log),
                log,
                frames,
                scene: Scene::new("root"),
            }
        }

        fn add(&mut self, parent: NodeId, name: &str) -> NodeId {
            self.scene.create_node(parent, name, &tri(), &self.device).unwrap()
        }
    }

    // ── structure ─────────────────────────────────────────────────────────

    #[test]
    fn new_scene_has_only_the_root() {
        let scene: Scene<TestBuffer> = Scene::new("root");
        let root = scene.node(scene.root()).unwrap();
        assert_eq!(root.name(), "root");
        assert!(!root.has_geometry());
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.projection(), Mat4::IDENTITY);
    }

    #[test]
    fn add_child_links_both_directions() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let a = f.add(root, "a");

        assert_eq!(f.scene.node(a).unwrap().parent(), Some(root));
        assert_eq!(f.scene.node(root).unwrap().children(), &[a]);
        assert!(f.scene.is_attached(a));
    }

    #[test]
    fn remove_from_parent_clears_both_links_and_is_idempotent() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let a = f.add(root, "a");

        f.scene.remove_from_parent(a);
        assert_eq!(f.scene.node(a).unwrap().parent(), None);
        assert!(f.scene.node(root).unwrap().children().is_empty());
        assert!(!f.scene.is_attached(a));

        f.scene.remove_from_parent(a);
        assert_eq!(f.scene.node(a).unwrap().parent(), None);
        assert!(f.scene.node(root).unwrap().children().is_empty());
    }

    #[test]
    fn removing_the_root_is_a_no_op() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let a = f.add(root, "a");
        f.scene.remove_from_parent(root);
        assert_eq!(f.scene.node(root).unwrap().children(), &[a]);
    }

    #[test]
    fn reparenting_detaches_from_the_old_parent() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let a = f.add(root, "a");
        let b = f.add(root, "b");
        let c = f.add(a, "c");

        f.scene.add_child(b, c).unwrap();

        assert!(f.scene.node(a).unwrap().children().is_empty());
        assert_eq!(f.scene.node(b).unwrap().children(), &[c]);
        assert_eq!(f.scene.node(c).unwrap().parent(), Some(b));
    }

    #[test]
    fn add_child_rejects_cycles_root_and_unknown_ids() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let a = f.add(root, "a");
        let b = f.add(a, "b");

        assert_eq!(f.scene.add_child(b, a), Err(SceneError::Cycle { parent: b, child: a }));
        assert_eq!(f.scene.add_child(a, a), Err(SceneError::Cycle { parent: a, child: a }));
        assert_eq!(f.scene.add_child(a, root), Err(SceneError::RootNode));

        f.scene.destroy(b).unwrap();
        assert_eq!(f.scene.add_child(a, b), Err(SceneError::UnknownNode(b)));
        assert_eq!(f.scene.node(a).unwrap().parent(), Some(root));
    }

    #[test]
    fn destroy_drops_the_subtree_and_invalidates_ids() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let a = f.add(root, "a");
        let b = f.add(a, "b");
        let c = f.add(b, "c");
        let keep = f.add(root, "keep");

        f.scene.destroy(a).unwrap();

        assert!(!f.scene.contains(a) && !f.scene.contains(b) && !f.scene.contains(c));
        assert_eq!(f.scene.node(root).unwrap().children(), &[keep]);
        assert_eq!(f.scene.len(), 2);
        assert_eq!(f.scene.destroy(root), Err(SceneError::RootNode));

        // Reused storage does not revive old ids.
        let d = f.add(root, "d");
        assert!(f.scene.contains(d));
        assert!(!f.scene.contains(a) && !f.scene.contains(b) && !f.scene.contains(c));
    }

    #[test]
    fn failed_creation_leaves_the_scene_untouched() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let err = f.scene.create_node(root, "empty", &[], &f.device);
        assert!(matches!(err, Err(SceneError::EmptyGeometry { .. })));
        assert_eq!(f.scene.len(), 1);
        assert!(f.scene.node(root).unwrap().children().is_empty());
    }

    #[test]
    fn world_matrix_composes_ancestors() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let a = f.add(root, "a");
        let b = f.add(a, "b");
        f.scene.node_mut(a).unwrap().set_position(Vec3::new(1.0, 0.0, 0.0));
        f.scene.node_mut(a).unwrap().set_scale(Vec3::splat(2.0));
        f.scene.node_mut(b).unwrap().set_position(Vec3::new(0.0, 3.0, 0.0));

        assert_abs_diff_eq!(f.scene.world_position(b).unwrap(), Vec3::new(1.0, 6.0, 0.0));
    }

    #[test]
    fn set_projection_rejects_non_finite() {
        let mut scene: Scene<TestBuffer> = Scene::new("root");
        let mut bad = Mat4::IDENTITY;
        bad.cols[0].x = f32::INFINITY;
        assert_eq!(scene.set_projection(bad), Err(MathError::NonFinite));
        assert_eq!(scene.projection(), Mat4::IDENTITY);
    }

    // ── uniform updates ───────────────────────────────────────────────────

    #[test]
    fn child_slot_receives_projection_times_model() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let projection = math::perspective_fov(60.0, 1.0, 0.1, 100.0);
        f.scene.set_projection(projection).unwrap();
        let child = f.add(root, "child");
        f.scene.node_mut(child).unwrap().set_position(Vec3::new(0.0, 0.0, -5.0));
        f.log.take();

        let slot = f.frames.begin_frame().unwrap();
        f.scene.update_uniform_buffers(&f.device, &slot, &Mat4::IDENTITY);

        let writes = f.log.take_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, "child uniforms[0]");
        assert_abs_diff_eq!(writes[0].1, projection * math::translation(0.0, 0.0, -5.0));

        // A second update within the same frame overwrites slot 0 only.
        let view = math::translation(0.0, -1.0, 0.0);
        f.scene.update_uniform_buffers(&f.device, &slot, &view);

        let writes = f.log.take_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, "child uniforms[0]");
        assert_abs_diff_eq!(writes[0].1, projection * view * math::translation(0.0, 0.0, -5.0));
        assert_eq!(f.scene.node(child).unwrap().uniform_buffer_index(), Some(0));
    }

    #[test]
    fn children_inherit_parent_world_matrix() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let parent = f.add(root, "parent");
        let child = f.add(parent, "child");
        {
            let p = f.scene.node_mut(parent).unwrap();
            p.set_position(Vec3::new(2.0, 0.0, 0.0));
            p.rotate_by(90.0, Y_AXIS).unwrap();
        }
        f.scene.node_mut(child).unwrap().set_position(Vec3::new(0.0, 0.0, 1.0));
        f.log.take();

        let slot = f.frames.begin_frame().unwrap();
        f.scene.update_uniform_buffers(&f.device, &slot, &Mat4::IDENTITY);

        let writes = f.log.take_writes();
        let parent_world = math::translation(2.0, 0.0, 0.0) * Quaternion::rotation(90.0, Y_AXIS).unwrap().to_mat4();
        assert_eq!(writes[0].0, "parent uniforms[0]");
        assert_abs_diff_eq!(writes[0].1, parent_world);
        assert_eq!(writes[1].0, "child uniforms[0]");
        assert_abs_diff_eq!(writes[1].1, parent_world * math::translation(0.0, 0.0, 1.0));
        // +z rotated a quarter turn about y lands on +x.
        assert_abs_diff_eq!(f.scene.world_position(child).unwrap(), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn detached_nodes_are_not_updated() {
        let mut f = Fixture::new();
        let loose = f.scene.insert(Node::new("loose", &tri(), &f.device).unwrap()).unwrap();
        f.log.take();

        let slot = f.frames.begin_frame().unwrap();
        f.scene.update_uniform_buffers(&f.device, &slot, &Mat4::IDENTITY);

        assert!(f.log.take_writes().is_empty());
        assert_eq!(f.scene.node(loose).unwrap().uniform_buffer_index(), None);
    }

    #[test]
    fn non_finite_mvp_is_not_uploaded_or_drawn() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let a = f.add(root, "a");
        f.scene.node_mut(a).unwrap().set_position(Vec3::new(f32::NAN, 0.0, 0.0));
        f.log.take();

        let slot = f.frames.begin_frame().unwrap();
        f.scene.update_uniform_buffers(&f.device, &slot, &Mat4::IDENTITY);
        assert!(f.log.take_writes().is_empty());

        let drawn = f.scene.render(&mut RecordingEncoder::new(&f.log), &slot);
        assert_eq!(drawn, 0);
    }

    // ── frame ring ────────────────────────────────────────────────────────

    #[test]
    fn slot_reuse_waits_for_previous_submission_before_writing() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        f.add(root, "n");
        f.log.take();

        for submission in 100..104 {
            let slot = f.frames.begin_frame().unwrap();
            f.scene.update_uniform_buffers(&f.device, &slot, &Mat4::IDENTITY);
            f.frames.end_frame(slot, submission).unwrap();
        }

        let ordered: Vec<String> = f
            .log
            .take()
            .into_iter()
            .map(|e| match e {
                Event::Wait { slot, retired } => format!("wait {slot} {retired:?}"),
                Event::WriteUniforms { buffer, .. } => format!("write {buffer}"),
                Event::Arm { slot, submission } => format!("arm {slot} {submission}"),
                other => format!("{other:?}"),
            })
            .collect();

        assert_eq!(
            ordered,
            vec![
                "wait 0 None",
                "write n uniforms[0]",
                "arm 0 100",
                "wait 1 None",
                "write n uniforms[1]",
                "arm 1 101",
                "wait 2 None",
                "write n uniforms[2]",
                "arm 2 102",
                "wait 0 Some(100)",
                "write n uniforms[0]",
                "arm 0 103",
            ]
        );
    }

    // ── render ────────────────────────────────────────────────────────────

    #[test]
    fn render_binds_the_slot_just_written() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        f.add(root, "n");

        let first = f.frames.begin_frame().unwrap();
        f.frames.end_frame(first, 0).unwrap();

        let slot = f.frames.begin_frame().unwrap();
        f.scene.update_uniform_buffers(&f.device, &slot, &Mat4::IDENTITY);
        f.log.take();

        let drawn = f.scene.render(&mut RecordingEncoder::new(&f.log), &slot);

        assert_eq!(drawn, 1);
        assert_eq!(
            f.log.take(),
            vec![
                Event::BindVertex { index: 0, buffer: "n vertices".into() },
                Event::BindUniform { index: 0, buffer: "n uniforms[1]".into() },
                Event::Draw(3),
            ]
        );
    }

    #[test]
    fn hidden_node_skips_its_own_draw_but_not_its_children() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let a = f.add(root, "a");
        f.add(a, "b");
        f.scene.node_mut(a).unwrap().set_hidden(true);

        let slot = f.frames.begin_frame().unwrap();
        f.scene.update_uniform_buffers(&f.device, &slot, &Mat4::IDENTITY);
        f.log.take();

        let drawn = f.scene.render(&mut RecordingEncoder::new(&f.log), &slot);

        assert_eq!(drawn, 1);
        assert!(f.log.take().contains(&Event::BindVertex { index: 0, buffer: "b vertices".into() }));
    }

    #[test]
    fn render_is_depth_first_in_child_order() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let a = f.add(root, "a");
        f.add(a, "a1");
        f.add(root, "b");

        let slot = f.frames.begin_frame().unwrap();
        f.scene.update_uniform_buffers(&f.device, &slot, &Mat4::IDENTITY);
        f.log.take();
        f.scene.render(&mut RecordingEncoder::new(&f.log), &slot);

        let order: Vec<String> = f
            .log
            .take()
            .into_iter()
            .filter_map(|e| match e {
                Event::BindVertex { buffer, .. } => Some(buffer),
                _ => None,
            })
            .collect();
        assert_eq!(order, vec!["a vertices", "a1 vertices", "b vertices"]);
    }

    #[test]
    fn update_writes_depth_first_in_child_order() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let a = f.add(root, "a");
        f.add(a, "a1");
        f.add(a, "a2");
        f.add(root, "b");
        f.log.take();

        let slot = f.frames.begin_frame().unwrap();
        f.scene.update_uniform_buffers(&f.device, &slot, &Mat4::IDENTITY);

        let order: Vec<String> = f.log.take_writes().into_iter().map(|(buffer, _)| buffer).collect();
        assert_eq!(
            order,
            vec!["a uniforms[0]", "a1 uniforms[0]", "a2 uniforms[0]", "b uniforms[0]"]
        );
    }

    #[test]
    fn very_deep_chain_updates_and_renders() {
        const DEPTH: usize = 100_000;
        let mut f = Fixture::new();
        let root = f.scene.root();

        // Linked bottom-up so each attach only walks a detached parent.
        let leaf = f.scene.insert(Node::new("leaf", &tri(), &f.device).unwrap()).unwrap();
        let mut top = leaf;
        for i in 0..DEPTH {
            let mut group = Node::group(format!("g{i}"));
            group.set_position(Vec3::new(0.0, 0.0, 1.0));
            let group = f.scene.insert(group).unwrap();
            f.scene.add_child(group, top).unwrap();
            top = group;
        }
        f.scene.add_child(root, top).unwrap();
        f.log.take();

        let slot = f.frames.begin_frame().unwrap();
        f.scene.update_uniform_buffers(&f.device, &slot, &Mat4::IDENTITY);

        let writes = f.log.take_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, "leaf uniforms[0]");
        // Whole-unit steps stay exact in f32.
        assert_eq!(writes[0].1.cols[3].z, DEPTH as f32);

        assert_eq!(f.scene.render(&mut RecordingEncoder::new(&f.log), &slot), 1);
        assert_eq!(f.scene.node(leaf).unwrap().uniform_buffer_index(), Some(0));
    }

    #[test]
    fn node_index_past_u32_is_reported() {
        assert_eq!(next_index(7), Ok(7));
        assert_eq!(next_index(u32::MAX as usize), Ok(u32::MAX));
        if let Ok(len) = usize::try_from(u64::from(u32::MAX) + 1) {
            assert_eq!(next_index(len), Err(SceneError::TooManyNodes { count: len }));
        }
    }

    #[test]
    fn node_attached_after_update_is_skipped_not_drawn_stale() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let late = f.add(root, "late");
        f.scene.remove_from_parent(late);

        // Frame 0 writes nothing for `late`.
        let slot = f.frames.begin_frame().unwrap();
        f.scene.update_uniform_buffers(&f.device, &slot, &Mat4::IDENTITY);
        f.scene.add_child(root, late).unwrap();
        f.log.take();

        let drawn = f.scene.render(&mut RecordingEncoder::new(&f.log), &slot);
        assert_eq!(drawn, 0);
        assert!(f.log.take().is_empty());
        f.frames.end_frame(slot, 1).unwrap();

        // Frame 1 picks it up.
        let slot = f.frames.begin_frame().unwrap();
        f.scene.update_uniform_buffers(&f.device, &slot, &Mat4::IDENTITY);
        assert_eq!(f.scene.render(&mut RecordingEncoder::new(&f.log), &slot), 1);
        assert_eq!(f.scene.node(late).unwrap().uniform_buffer_index(), Some(1));
    }

    #[test]
    fn slot_from_an_earlier_lap_does_not_match() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let n = f.add(root, "n");

        let slot = f.frames.begin_frame().unwrap();
        f.scene.update_uniform_buffers(&f.device, &slot, &Mat4::IDENTITY);
        f.frames.end_frame(slot, 0).unwrap();
        for s in 1..3 {
            let slot = f.frames.begin_frame().unwrap();
            f.frames.end_frame(slot, s).unwrap();
        }

        // Back on slot 0 three frames later; the old write does not count.
        let slot = f.frames.begin_frame().unwrap();
        assert_eq!(slot.index(), 0);
        assert_eq!(f.scene.render(&mut RecordingEncoder::new(&f.log), &slot), 0);
        assert_eq!(f.scene.node(n).unwrap().current_uniform_buffer().map(|b| b.label.as_str()), Some("n uniforms[0]"));
    }
}
