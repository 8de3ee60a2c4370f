//! Nearest-neighbor search over spectral embeddings.
//!
//! Both refiners repeatedly embed the source basis into the target's
//! functional space and match every target vertex to its closest embedded
//! source vertex. The search is abstracted behind [`SpatialIndex`] so the
//! refiners can run against the exact k-d tree used in production
//! ([`KdTreeIndex`]) or an exhaustive scan ([`BruteForceIndex`]) in tests.
//!
//! Tie rule: when several reference points are at the same distance from a
//! query, the one with the lowest row index wins. Both implementations follow
//! this rule, so they return identical correspondences for identical inputs.

mod brute;
mod kdtree;

pub use brute::BruteForceIndex;
pub use kdtree::{KdTreeIndex, DEFAULT_LEAF_SIZE};

use crate::error::{RefineError, Result};
use crate::types::Correspondence;
use nalgebra::DMatrix;

/// Batched 1-nearest-neighbor search under Euclidean distance.
///
/// Implementations build their structure over `reference` on every call;
/// the reference set changes on every refinement iteration.
pub trait SpatialIndex {
    /// For each row of `queries`, the index of the closest row of `reference`.
    fn nearest(&self, reference: &DMatrix<f64>, queries: &DMatrix<f64>)
        -> Result<Correspondence>;
}

impl<T: SpatialIndex + ?Sized> SpatialIndex for &T {
    fn nearest(
        &self,
        reference: &DMatrix<f64>,
        queries: &DMatrix<f64>,
    ) -> Result<Correspondence> {
        (**self).nearest(reference, queries)
    }
}

/// Rejects empty or non-finite point sets and mismatched dimensionality.
pub(crate) fn check_point_sets(reference: &DMatrix<f64>, queries: &DMatrix<f64>) -> Result<()> {
    if reference.nrows() == 0 || reference.ncols() == 0 {
        return Err(RefineError::EmptyInput {
            what: "reference point set",
        });
    }
    if queries.nrows() == 0 {
        return Err(RefineError::EmptyInput {
            what: "query point set",
        });
    }
    if queries.ncols() != reference.ncols() {
        return Err(RefineError::ShapeMismatch {
            what: "query point dimension",
            expected: (queries.nrows(), reference.ncols()),
            actual: queries.shape(),
        });
    }
    // NaN distances never compare, so no nearest point would be defined
    if !reference.iter().all(|v| v.is_finite()) {
        return Err(RefineError::NonFinite {
            what: "reference point set",
        });
    }
    if !queries.iter().all(|v| v.is_finite()) {
        return Err(RefineError::NonFinite {
            what: "query point set",
        });
    }
    Ok(())
}

/// Copies the rows of `m` into one contiguous row-major buffer.
pub(crate) fn row_major(m: &DMatrix<f64>) -> Vec<f64> {
    let (rows, cols) = m.shape();
    let mut out = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            out.push(m[(r, c)]);
        }
    }
    out
}

#[inline]
pub(crate) fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
