//! wgpu rendering of a scene.
//!
//! Convention:
//! - one pipeline, flat per-vertex colour, depth tested (`Less`, cleared to 1.0)
//! - bind group 0 holds the node's uniform buffer for the current frame slot
//! - vertex buffer slot 0 holds the node's `Vertex` records

mod pipeline;
mod renderer;

pub use renderer::{RendererConfig, SceneRenderer};
