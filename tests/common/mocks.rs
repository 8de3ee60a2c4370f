use fmap_refine::linalg::SparseProjector;
use fmap_refine::spatial::{BruteForceIndex, SpatialIndex};
use fmap_refine::{Correspondence, RefineError};
use nalgebra::DMatrix;
use nalgebra_sparse::CsrMatrix;
use std::cell::Cell;

/// Brute-force index that records how many batches it answered.
#[derive(Default)]
pub struct CountingIndex {
    pub calls: Cell<usize>,
}

impl SpatialIndex for CountingIndex {
    fn nearest(
        &self,
        reference: &DMatrix<f64>,
        queries: &DMatrix<f64>,
    ) -> Result<Correspondence, RefineError> {
        self.calls.set(self.calls.get() + 1);
        BruteForceIndex.nearest(reference, queries)
    }
}

/// Projector that records its calls and checks the `P` row-sum invariant.
#[derive(Default)]
pub struct CountingProjector {
    pub calls: Cell<usize>,
}

impl SparseProjector for CountingProjector {
    fn project(
        &self,
        l_left: &DMatrix<f64>,
        area: &CsrMatrix<f64>,
        p: &CsrMatrix<f64>,
        l_right: &DMatrix<f64>,
    ) -> Result<DMatrix<f64>, RefineError> {
        self.calls.set(self.calls.get() + 1);
        for row in p.row_iter() {
            assert_eq!(row.nnz(), 1, "incidence rows must hold exactly one entry");
            assert_eq!(row.values()[0], 1.0);
        }
        fmap_refine::linalg::CsrProjector.project(l_left, area, p, l_right)
    }
}
