use crate::device::GraphicsDevice;

use super::{Node, SceneError, Vertex};

/// Face colours, in face order: +x, -x, +y, -y, +z, -z.
pub const CUBE_FACE_COLORS: [[f32; 4]; 6] = [
    [0.90, 0.20, 0.20, 1.0],
    [0.20, 0.80, 0.80, 1.0],
    [0.25, 0.85, 0.30, 1.0],
    [0.85, 0.30, 0.85, 1.0],
    [0.25, 0.40, 0.95, 1.0],
    [0.95, 0.85, 0.25, 1.0],
];

/// Triangle-list cube spanning `[-1, 1]` on every axis, two triangles per face.
///
/// Outward faces wind counter-clockwise on screen under the left-handed projections in
/// `math`, so back faces can be culled with the default front-face setting.
pub fn cube_vertices() -> [Vertex; 36] {
    // Each face as (normal axis, sign): corners are generated in the face plane.
    const FACES: [(usize, f32); 6] = [(0, 1.0), (0, -1.0), (1, 1.0), (1, -1.0), (2, 1.0), (2, -1.0)];

    let mut out = [Vertex::default(); 36];
    for (f, &(axis, sign)) in FACES.iter().enumerate() {
        let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
        let corner = |a: f32, b: f32| {
            let mut p = [0.0; 3];
            p[axis] = sign;
            p[u] = a;
            p[v] = b * sign;
            Vertex::new(p, CUBE_FACE_COLORS[f])
        };

        let quad = [corner(-1.0, -1.0), corner(-1.0, 1.0), corner(1.0, 1.0), corner(1.0, -1.0)];
        for (i, &k) in [0, 1, 2, 0, 2, 3].iter().enumerate() {
            out[f * 6 + i] = quad[k];
        }
    }
    out
}

impl<B> Node<B> {
    /// A drawable [`cube_vertices`] node.
    pub fn cube<D>(name: impl Into<String>, device: &D) -> Result<Self, SceneError>
    where
        D: GraphicsDevice<Buffer = B>,
    {
        Node::new(name, &cube_vertices(), device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::testing::{Log, RecordingDevice};

    fn position(v: &Vertex) -> Vec3 {
        Vec3::from(v.position)
    }

    #[test]
    fn every_vertex_is_a_corner() {
        for v in cube_vertices() {
            assert!(v.position.iter().all(|c| c.abs() == 1.0), "{v:?}");
        }
    }

    #[test]
    fn each_face_is_single_coloured_and_planar() {
        let verts = cube_vertices();
        for (f, face) in verts.chunks(6).enumerate() {
            assert!(face.iter().all(|v| v.color == CUBE_FACE_COLORS[f]));
            let axis = f / 2;
            let sign = if f % 2 == 0 { 1.0 } else { -1.0 };
            assert!(face.iter().all(|v| v.position[axis] == sign));
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_on_screen() {
        // With +z pointing into the screen, counter-clockwise on screen means the
        // plain cross product (b - a) x (c - a) points into the cube.
        for tri in cube_vertices().chunks(3) {
            let (a, b, c) = (position(&tri[0]), position(&tri[1]), position(&tri[2]));
            let n = (b - a).cross(c - a);
            let centroid = (a + b + c) * (1.0 / 3.0);
            assert!(n.dot(centroid) < 0.0, "{tri:?}");
        }
    }

    #[test]
    fn cube_node_draws_36_vertices() {
        let log = Log::default();
        let node = Node::cube("cube", &RecordingDevice::new(&log)).unwrap();
        assert_eq!(node.vertex_count(), 36);
    }
}
