use std::fmt;

/// Domain errors raised by the math layer.
///
/// These are reported where they are computed so a degenerate input never reaches a
/// uniform buffer as a NaN-poisoned matrix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MathError {
    /// A rotation axis of zero length was supplied.
    ZeroAxis,
    /// An angle, axis, quaternion or matrix (supplied or computed) contains NaN or
    /// infinite components.
    NonFinite,
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::ZeroAxis => write!(f, "rotation axis has zero length"),
            MathError::NonFinite => write!(f, "value contains NaN or infinite components"),
        }
    }
}

impl std::error::Error for MathError {}
