//! Scene graph.
//!
//! A [`Scene`] owns a tree of [`Node`]s below a geometry-less root plus the projection
//! matrix. Once per frame, [`Scene::update_uniform_buffers`] walks the tree and writes
//! each node's `view_projection * world` into its uniform buffer for the current
//! [`FrameSlot`](crate::frame::FrameSlot); [`Scene::render`] then records the draws that
//! read exactly that slot.

mod camera;
mod cube;
mod error;
mod graph;
mod node;
mod uniforms;
mod vertex;

pub use camera::{Camera, ViewSource};
pub use cube::{cube_vertices, CUBE_FACE_COLORS};
pub use error::SceneError;
pub use graph::{NodeId, Scene};
pub use node::Node;
pub use uniforms::{Uniforms, UNIFORM_ALIGNMENT};
pub use vertex::{Vertex, COLOR_LOCATION, POSITION_LOCATION};
