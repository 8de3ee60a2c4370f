//! Sparse point-to-point incidence matrices and the area-weighted projection
//! `Lleftᵗ · A · P · Lright` that turns a correspondence into a functional map.
//!
//! Neither `A` nor `P` is ever densified. `P` has exactly one nonzero per row,
//! so `P · Lright` is a row gather; the product is evaluated as
//! `A · (P · Lright)` which keeps every intermediate at `n × k`.

use crate::error::{RefineError, Result};
use crate::types::Correspondence;
use nalgebra::DMatrix;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

/// Builds the `n_target × n_source` 0/1 matrix with a single `1` per row at
/// the matched source column.
pub fn incidence_matrix(matches: &Correspondence, n_source: usize) -> Result<CsrMatrix<f64>> {
    if let Some(&index) = matches.as_slice().iter().find(|&&j| j >= n_source) {
        return Err(RefineError::IndexOutOfRange {
            index,
            bound: n_source,
        });
    }
    let n_target = matches.len();
    let row_offsets: Vec<usize> = (0..=n_target).collect();
    let col_indices = matches.as_slice().to_vec();
    let values = vec![1.0; n_target];
    CsrMatrix::try_from_csr_data(n_target, n_source, row_offsets, col_indices, values)
        .map_err(|e| RefineError::Backend(format!("incidence matrix: {e}")))
}

/// Diagonal (lumped) area matrix from per-vertex weights.
pub fn diagonal_area(weights: &[f64]) -> CsrMatrix<f64> {
    let n = weights.len();
    let mut coo = CooMatrix::new(n, n);
    for (i, &w) in weights.iter().enumerate() {
        coo.push(i, i, w);
    }
    CsrMatrix::from(&coo)
}

/// Projection of a point-to-point map into the spectral domain.
pub trait SparseProjector {
    /// Computes `l_leftᵗ · area · p · l_right`.
    fn project(
        &self,
        l_left: &DMatrix<f64>,
        area: &CsrMatrix<f64>,
        p: &CsrMatrix<f64>,
        l_right: &DMatrix<f64>,
    ) -> Result<DMatrix<f64>>;
}

impl<T: SparseProjector + ?Sized> SparseProjector for &T {
    fn project(
        &self,
        l_left: &DMatrix<f64>,
        area: &CsrMatrix<f64>,
        p: &CsrMatrix<f64>,
        l_right: &DMatrix<f64>,
    ) -> Result<DMatrix<f64>> {
        (**self).project(l_left, area, p, l_right)
    }
}

/// CSR sparse × dense implementation of [`SparseProjector`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CsrProjector;

impl SparseProjector for CsrProjector {
    fn project(
        &self,
        l_left: &DMatrix<f64>,
        area: &CsrMatrix<f64>,
        p: &CsrMatrix<f64>,
        l_right: &DMatrix<f64>,
    ) -> Result<DMatrix<f64>> {
        if area.nrows() != l_left.nrows() || area.ncols() != p.nrows() {
            return Err(RefineError::ShapeMismatch {
                what: "area matrix",
                expected: (l_left.nrows(), p.nrows()),
                actual: (area.nrows(), area.ncols()),
            });
        }
        if p.ncols() != l_right.nrows() {
            return Err(RefineError::ShapeMismatch {
                what: "right basis",
                expected: (p.ncols(), l_right.ncols()),
                actual: l_right.shape(),
            });
        }

        let pulled: DMatrix<f64> = p * l_right;
        let weighted: DMatrix<f64> = area * &pulled;
        Ok(l_left.transpose() * weighted)
    }
}
