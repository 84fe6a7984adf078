use thiserror::Error;

/// Error types for the Lie group operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LieError {
    /// The element is the zero quaternion, so its scale and rotation are undefined.
    #[error("degenerate element: the zero quaternion has no scale or rotation")]
    DegenerateElement,

    /// A mapped parameter buffer does not hold exactly one group element.
    #[error("parameter buffer has wrong size: expected {expected}, got {got}")]
    WrongParamSize {
        /// Number of scalars required by the group.
        expected: usize,
        /// Number of scalars in the provided buffer.
        got: usize,
    },

    /// The scale factor must be strictly positive and finite.
    #[error("invalid scale {0}: must be strictly positive and finite")]
    InvalidScale(f64),
}
