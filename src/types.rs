//! Plain data types passed between the refiners and their primitives.

use crate::error::{RefineError, Result};
use nalgebra::DMatrix;

/// Dense spectral basis, rows = vertices, columns = basis functions.
pub type Basis = DMatrix<f64>;

/// Dense functional map between two truncated spectral bases.
pub type FunctionalMap = DMatrix<f64>;

/// Point-to-point map: for every target vertex, the index of its matched
/// source vertex. Many-to-one assignments are allowed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Correspondence {
    indices: Vec<usize>,
}

impl Correspondence {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    /// Number of target vertices covered by the map.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Number of distinct source vertices hit by at least one target vertex.
    pub fn distinct_sources(&self) -> usize {
        let mut seen: Vec<usize> = self.indices.clone();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }

    /// Gather `source` rows in correspondence order (`source[matches]`).
    pub fn gather_rows(&self, source: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let bound = source.nrows();
        if let Some(&index) = self.indices.iter().find(|&&i| i >= bound) {
            return Err(RefineError::IndexOutOfRange { index, bound });
        }
        Ok(DMatrix::from_fn(self.indices.len(), source.ncols(), |r, c| {
            source[(self.indices[r], c)]
        }))
    }
}
