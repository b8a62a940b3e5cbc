use crate::device::{GraphicsDevice, RenderEncoder, UNIFORM_BUFFER_INDEX, VERTEX_BUFFER_INDEX};
use crate::frame::{FrameSlot, IN_FLIGHT_FRAMES};
use crate::math::{self, Mat4, MathError, Quaternion, Vec3};

use super::{NodeId, SceneError, Uniforms, Vertex};

/// GPU resources of a drawable node: immutable vertices plus one uniform buffer per
/// in-flight slot.
struct Geometry<B> {
    vertices: B,
    vertex_count: u32,
    uniforms: [B; IN_FLIGHT_FRAMES],
    /// `(slot index, frame number)` of the most recent uniform write.
    written: Option<(usize, u64)>,
}

/// A transformable scene entity.
///
/// Nodes are created detached and live in a [`Scene`](super::Scene), which owns the
/// parent/child links. `B` is the buffer type of the [`GraphicsDevice`] that built it.
pub struct Node<B> {
    name: String,
    position: Vec3,
    scale: Vec3,
    rotation: Quaternion,
    hidden: bool,
    geometry: Option<Geometry<B>>,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
}

impl<B> Node<B> {
    /// Creates a drawable node, uploading `vertices` and allocating its uniform ring.
    ///
    /// Fails without returning a partial node if the list is empty, the device is
    /// lost, or any allocation fails.
    pub fn new<D>(name: impl Into<String>, vertices: &[Vertex], device: &D) -> Result<Self, SceneError>
    where
        D: GraphicsDevice<Buffer = B>,
    {
        let name = name.into();
        if vertices.is_empty() {
            return Err(SceneError::EmptyGeometry { name });
        }
        let Ok(vertex_count) = u32::try_from(vertices.len()) else {
            return Err(SceneError::TooManyVertices {
                count: vertices.len(),
                name,
            });
        };
        if device.is_lost() {
            return Err(crate::device::DeviceError::Lost.into());
        }

        let vertex_buffer = device.create_vertex_buffer(&format!("{name} vertices"), vertices)?;

        // One buffer per in-flight slot; this pattern stops compiling if the ring size changes.
        let [u0, u1, u2] = std::array::from_fn::<_, IN_FLIGHT_FRAMES, _>(|i| {
            device.create_uniform_buffer(&format!("{name} uniforms[{i}]"), Uniforms::SIZE)
        });
        let uniforms = [u0?, u1?, u2?];

        log::debug!("created node {name:?} ({vertex_count} vertices)");

        Ok(Self {
            geometry: Some(Geometry {
                vertices: vertex_buffer,
                vertex_count,
                uniforms,
                written: None,
            }),
            ..Self::group(name)
        })
    }

    /// Creates a node without geometry. It draws nothing but still transforms its
    /// children; the scene root is one.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Quaternion::IDENTITY,
            hidden: false,
            geometry: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn position_mut(&mut self) -> &mut Vec3 {
        &mut self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn scale_mut(&mut self) -> &mut Vec3 {
        &mut self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    /// Replaces the accumulated rotation. The quaternion is normalized on the way in.
    ///
    /// A NaN or infinite quaternion is rejected and the current rotation kept.
    pub fn set_rotation(&mut self, rotation: Quaternion) -> Result<(), MathError> {
        let rotation = rotation.normalize();
        if !rotation.is_finite() {
            return Err(MathError::NonFinite);
        }
        self.rotation = rotation;
        Ok(())
    }

    /// Composes a rotation of `angle_degrees` about `axis` onto the current rotation.
    ///
    /// The new rotation is applied after the existing one, i.e. about the parent's
    /// axes rather than the node's own: `rotation = q(angle, axis) * rotation`.
    ///
    /// On error the rotation is left unchanged.
    pub fn rotate_by(&mut self, angle_degrees: f32, axis: Vec3) -> Result<(), MathError> {
        let q = Quaternion::rotation(angle_degrees, axis)?;
        let rotation = (q * self.rotation).normalize();
        if !rotation.is_finite() {
            return Err(MathError::NonFinite);
        }
        self.rotation = rotation;
        Ok(())
    }

    /// `translation(position) * rotation * scale`, recomputed on every call.
    pub fn model_matrix(&self) -> Mat4 {
        math::translation_vec(self.position) * self.rotation.to_mat4() * math::scale_vec(self.scale)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Hiding skips this node's own draw only; children keep rendering.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }

    /// Zero for group nodes.
    pub fn vertex_count(&self) -> u32 {
        self.geometry.as_ref().map_or(0, |g| g.vertex_count)
    }

    pub fn vertex_buffer(&self) -> Option<&B> {
        self.geometry.as_ref().map(|g| &g.vertices)
    }

    pub fn uniform_buffer(&self, slot_index: usize) -> Option<&B> {
        self.geometry.as_ref()?.uniforms.get(slot_index)
    }

    /// Ring slot written by the most recent update, if any.
    pub fn uniform_buffer_index(&self) -> Option<usize> {
        self.geometry.as_ref()?.written.map(|(index, _)| index)
    }

    /// The uniform buffer filled by the most recent update.
    pub fn current_uniform_buffer(&self) -> Option<&B> {
        self.uniform_buffer(self.uniform_buffer_index()?)
    }

    /// Writes `view_projection * world` into this node's buffer for `slot`.
    ///
    /// A non-finite result is not uploaded; the node is then skipped at render time.
    pub(super) fn write_uniforms<D>(&mut self, device: &D, slot: &FrameSlot, world: Mat4, view_projection: Mat4)
    where
        D: GraphicsDevice<Buffer = B>,
    {
        let Some(geometry) = self.geometry.as_mut() else {
            return;
        };

        let mvp = view_projection * world;
        if !mvp.is_finite() {
            log::error!("node {:?}: {}; uniforms not written", self.name, MathError::NonFinite);
            geometry.written = None;
            return;
        }

        device.write_uniforms(&geometry.uniforms[slot.index()], &Uniforms::new(mvp));
        geometry.written = Some((slot.index(), slot.frame()));
    }

    /// Records this node's draw for `slot`. Returns `false` if nothing was drawn.
    pub(super) fn encode<E>(&self, encoder: &mut E, slot: &FrameSlot) -> bool
    where
        E: RenderEncoder<B> + ?Sized,
    {
        let Some(geometry) = self.geometry.as_ref() else {
            return false;
        };
        if self.hidden {
            return false;
        }
        if geometry.written != Some((slot.index(), slot.frame())) {
            log::warn!(
                "node {:?} has no uniforms for frame {} (slot {}); skipped",
                self.name,
                slot.frame(),
                slot.index()
            );
            return false;
        }

        encoder.set_vertex_buffer(VERTEX_BUFFER_INDEX, &geometry.vertices);
        encoder.set_uniform_buffer(UNIFORM_BUFFER_INDEX, &geometry.uniforms[slot.index()]);
        encoder.draw(geometry.vertex_count);
        true
    }
}
