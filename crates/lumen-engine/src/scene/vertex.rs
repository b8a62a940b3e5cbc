use bytemuck::{Pod, Zeroable};

/// Shader location of [`Vertex::position`].
pub const POSITION_LOCATION: u32 = 0;

/// Shader location of [`Vertex::color`].
pub const COLOR_LOCATION: u32 = 1;

/// Geometry record uploaded once per node.
///
/// Equality is bitwise per component, so `-0.0 != 0.0` and a NaN equals an identical NaN.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    /// Linear RGBA.
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        POSITION_LOCATION => Float32x3,
        COLOR_LOCATION => Float32x4
    ];

    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    fn bits(&self) -> [u32; 7] {
        let [x, y, z] = self.position;
        let [r, g, b, a] = self.color;
        [x, y, z, r, g, b, a].map(f32::to_bits)
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for Vertex {}
