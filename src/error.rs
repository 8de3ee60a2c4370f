//! Error type shared by the refiners and their numeric primitives.
//!
//! Every variant describes a precondition violation. Input checks run before
//! the first refinement iteration. The only error a running loop can raise is
//! `NonFinite` for a spectral embedding that overflowed; a failed call never
//! returns a partial map. Numeric degeneracy (rank-deficient least squares,
//! repeated singular values) is handled inside the primitives and is not an
//! error.

use thiserror::Error;

/// Shape as `(rows, cols)`.
pub type Shape = (usize, usize);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefineError {
    #[error("{what} is empty")]
    EmptyInput { what: &'static str },

    #[error("{what}: expected shape {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Shape,
        actual: Shape,
    },

    #[error("ZoomOut input map should be square, not ({rows}, {cols})")]
    NonSquareMap { rows: usize, cols: usize },

    #[error("not enough eigenvectors in {which}: {required} are needed when {provided} are provided")]
    InsufficientBasis {
        which: &'static str,
        required: usize,
        provided: usize,
    },

    #[error("correspondence index {index} out of range for {bound} source points")]
    IndexOutOfRange { index: usize, bound: usize },

    #[error("{what} contains non-finite values")]
    NonFinite { what: &'static str },

    /// Failure reported by the underlying linear-algebra backend.
    #[error("numeric backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, RefineError>;
