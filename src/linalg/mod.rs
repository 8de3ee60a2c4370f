//! Linear-algebra services used by the refiners.
//!
//! - [`dense`]: least squares and SVD on small dense matrices whose size is
//!   bounded by the basis dimension.
//! - [`sparse`]: point-to-point incidence matrices and the area-weighted
//!   projection of a correspondence back into the spectral domain.

pub mod dense;
pub mod sparse;

pub use dense::{DenseSolver, Svd, SvdSolver};
pub use sparse::{diagonal_area, incidence_matrix, CsrProjector, SparseProjector};
