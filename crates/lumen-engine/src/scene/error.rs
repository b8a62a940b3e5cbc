use std::fmt;

use crate::device::DeviceError;
use crate::math::MathError;

use super::NodeId;

/// Failures raised while building or editing a scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A drawable node needs at least one vertex.
    EmptyGeometry { name: String },
    /// The vertex list does not fit a 32-bit draw count.
    TooManyVertices { name: String, count: usize },
    /// The scene has no room for another 32-bit node index.
    TooManyNodes { count: usize },
    /// Buffer allocation failed; no node was created.
    Device(DeviceError),
    Math(MathError),
    /// The id was never issued by this scene or its node has been destroyed.
    UnknownNode(NodeId),
    /// The root cannot be attached, detached or destroyed.
    RootNode,
    /// Attaching would make a node its own ancestor.
    Cycle { parent: NodeId, child: NodeId },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::EmptyGeometry { name } => write!(f, "node {name:?} has no vertices"),
            SceneError::TooManyVertices { name, count } => {
                write!(f, "node {name:?} has {count} vertices, more than a draw call can cover")
            }
            SceneError::TooManyNodes { count } => {
                write!(f, "scene already holds {count} node slots, the most a node id can address")
            }
            SceneError::Device(e) => write!(f, "{e}"),
            SceneError::Math(e) => write!(f, "{e}"),
            SceneError::UnknownNode(id) => write!(f, "unknown node {id}"),
            SceneError::RootNode => write!(f, "operation not permitted on the scene root"),
            SceneError::Cycle { parent, child } => {
                write!(f, "cannot attach {child} under its own descendant {parent}")
            }
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Device(e) => Some(e),
            SceneError::Math(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DeviceError> for SceneError {
    fn from(e: DeviceError) -> Self {
        SceneError::Device(e)
    }
}

impl From<MathError> for SceneError {
    fn from(e: MathError) -> Self {
        SceneError::Math(e)
    }
}
