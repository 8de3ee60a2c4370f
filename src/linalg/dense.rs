//! Dense least squares and Procrustes projection backed by `nalgebra::SVD`.

use crate::error::{RefineError, Result};
use log::warn;
use nalgebra::{DMatrix, DVector, SVD};

/// Thin singular value decomposition `W = U·diag(σ)·Vᵗ`.
#[derive(Clone, Debug)]
pub struct Svd {
    pub u: DMatrix<f64>,
    pub singular_values: DVector<f64>,
    pub v_t: DMatrix<f64>,
}

/// Dense primitives consumed by the ICP refiner.
pub trait DenseSolver {
    /// Minimum-norm `X` minimizing `‖A·X − B‖_F`.
    ///
    /// Rank-deficient and under-determined systems are not errors; only a
    /// row-count mismatch between `A` and `B` is rejected.
    fn lstsq(&self, a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>>;

    fn svd(&self, w: &DMatrix<f64>) -> Result<Svd>;

    /// Closest matrix with orthonormal rows or columns to `w` in Frobenius
    /// norm, i.e. `U·I·Vᵗ` with `I` the rectangular identity of `w`'s shape.
    fn nearest_orthogonal(&self, w: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let svd = self.svd(w)?;
        Ok(&svd.u * &svd.v_t)
    }
}

impl<T: DenseSolver + ?Sized> DenseSolver for &T {
    fn lstsq(&self, a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        (**self).lstsq(a, b)
    }

    fn svd(&self, w: &DMatrix<f64>) -> Result<Svd> {
        (**self).svd(w)
    }

    fn nearest_orthogonal(&self, w: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        (**self).nearest_orthogonal(w)
    }
}

/// SVD-based solver. Singular values below `max(m, n)·ε·σ_max` are treated
/// as zero, the same cutoff LAPACK's `gelsd` uses by default.
#[derive(Clone, Copy, Debug, Default)]
pub struct SvdSolver;

impl SvdSolver {
    fn decompose(m: &DMatrix<f64>) -> Result<(DMatrix<f64>, DVector<f64>, DMatrix<f64>)> {
        let svd = SVD::new(m.clone(), true, true);
        match (svd.u, svd.v_t) {
            (Some(u), Some(v_t)) => Ok((u, svd.singular_values, v_t)),
            _ => Err(RefineError::Backend(
                "SVD did not return singular vectors".to_string(),
            )),
        }
    }
}

impl DenseSolver for SvdSolver {
    fn lstsq(&self, a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let (m, p) = a.shape();
        if b.nrows() != m {
            return Err(RefineError::ShapeMismatch {
                what: "least-squares right-hand side",
                expected: (m, b.ncols()),
                actual: b.shape(),
            });
        }
        if m == 0 || p == 0 || b.ncols() == 0 {
            return Ok(DMatrix::zeros(p, b.ncols()));
        }

        let (u, sigma, v_t) = Self::decompose(a)?;
        let sigma_max = sigma.iter().cloned().fold(0.0f64, f64::max);
        let cutoff = m.max(p) as f64 * f64::EPSILON * sigma_max;

        // X = V · Σ⁺ · Uᵗ · B, dropping directions below the cutoff
        let mut utb = u.transpose() * b;
        let mut rank = 0usize;
        for (i, &s) in sigma.iter().enumerate() {
            if s > cutoff {
                utb.row_mut(i).scale_mut(1.0 / s);
                rank += 1;
            } else {
                utb.row_mut(i).fill(0.0);
            }
        }
        if rank < p {
            warn!(
                "lstsq: system is rank-deficient (rank {rank} < {p}), returning minimum-norm solution"
            );
        }
        Ok(v_t.transpose() * utb)
    }

    fn svd(&self, w: &DMatrix<f64>) -> Result<Svd> {
        if w.nrows() == 0 || w.ncols() == 0 {
            return Err(RefineError::EmptyInput {
                what: "matrix to decompose",
            });
        }
        let (u, singular_values, v_t) = Self::decompose(w)?;
        Ok(Svd {
            u,
            singular_values,
            v_t,
        })
    }
}
