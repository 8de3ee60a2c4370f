//! Precondition checks run before any refinement iteration.

use crate::error::{RefineError, Result};
use nalgebra::DMatrix;
use nalgebra_sparse::CsrMatrix;

pub(crate) fn ensure_non_empty(what: &'static str, m: &DMatrix<f64>) -> Result<()> {
    if m.nrows() == 0 || m.ncols() == 0 {
        return Err(RefineError::EmptyInput { what });
    }
    Ok(())
}

pub(crate) fn ensure_finite(what: &'static str, m: &DMatrix<f64>) -> Result<()> {
    if m.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(RefineError::NonFinite { what })
    }
}

fn ensure_columns(which: &'static str, basis: &DMatrix<f64>, required: usize) -> Result<()> {
    if basis.ncols() < required {
        return Err(RefineError::InsufficientBasis {
            which,
            required,
            provided: basis.ncols(),
        });
    }
    Ok(())
}

/// `C` is `K2×K1`: `L1` needs `K1` columns and `L2` needs `K2`.
pub(crate) fn check_map_against_bases(
    l1: &DMatrix<f64>,
    l2: &DMatrix<f64>,
    c: &DMatrix<f64>,
) -> Result<()> {
    ensure_non_empty("source basis L1", l1)?;
    ensure_non_empty("target basis L2", l2)?;
    ensure_non_empty("functional map C", c)?;
    let (k2, k1) = c.shape();
    ensure_columns("source basis L1", l1, k1)?;
    ensure_columns("target basis L2", l2, k2)?;
    ensure_finite("source basis L1", l1)?;
    ensure_finite("target basis L2", l2)?;
    ensure_finite("functional map C", c)
}

pub(crate) fn check_icp_inputs(
    l1: &DMatrix<f64>,
    l2: &DMatrix<f64>,
    c: &DMatrix<f64>,
) -> Result<()> {
    check_map_against_bases(l1, l2, c)
}

pub(crate) fn check_zoomout_inputs(
    l1: &DMatrix<f64>,
    l2: &DMatrix<f64>,
    a2: &CsrMatrix<f64>,
    c: &DMatrix<f64>,
    nit: usize,
) -> Result<()> {
    if c.nrows() != c.ncols() {
        return Err(RefineError::NonSquareMap {
            rows: c.nrows(),
            cols: c.ncols(),
        });
    }
    ensure_non_empty("source basis L1", l1)?;
    ensure_non_empty("target basis L2", l2)?;
    ensure_non_empty("functional map C", c)?;

    let required = c.nrows() + nit;
    ensure_columns("source basis L1", l1, required)?;
    ensure_columns("target basis L2", l2, required)?;

    let n2 = l2.nrows();
    if a2.nrows() != n2 || a2.ncols() != n2 {
        return Err(RefineError::ShapeMismatch {
            what: "target area matrix A2",
            expected: (n2, n2),
            actual: (a2.nrows(), a2.ncols()),
        });
    }

    ensure_finite("source basis L1", l1)?;
    ensure_finite("target basis L2", l2)?;
    ensure_finite("functional map C", c)?;
    if !a2.values().iter().all(|v| v.is_finite()) {
        return Err(RefineError::NonFinite {
            what: "target area matrix A2",
        });
    }
    Ok(())
}
