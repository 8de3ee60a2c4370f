//! ZoomOut: iterative spectral upsampling of a square functional map.
//!
//! Starting from a `K×K` map, each iteration extracts a point-to-point
//! correspondence at the current dimension `k` and projects it back into the
//! spectral domain one dimension higher:
//!
//! ```text
//! matches = NN( (C·L1[:, :k]ᵗ)ᵗ , L2[:, :k] )
//! C       = L2[:, :k+1]ᵗ · A2 · P(matches) · L1[:, :k+1]
//! ```
//!
//! After `nit` iterations the map is `(K+nit)×(K+nit)`. Both bases must carry
//! at least `K+nit` columns; this is checked before the first iteration.

use super::embed::embed_and_match;
use super::options::ZoomOutOptions;
use super::validate;
use crate::diagnostics::{IterationTrace, RefineMethod, RefinementReport};
use crate::error::Result;
use crate::linalg::{incidence_matrix, CsrProjector, SparseProjector};
use crate::spatial::{KdTreeIndex, SpatialIndex};
use crate::types::{Basis, FunctionalMap};
use log::debug;
use nalgebra_sparse::CsrMatrix;
use std::time::Instant;

/// ZoomOut refiner generic over its nearest-neighbor and projection services.
pub struct ZoomOutRefiner<S = KdTreeIndex, P = CsrProjector> {
    options: ZoomOutOptions,
    index: S,
    projector: P,
}

impl ZoomOutRefiner {
    pub fn new(options: ZoomOutOptions) -> Self {
        let index = options.spatial_index();
        Self {
            options,
            index,
            projector: CsrProjector,
        }
    }
}

impl<S: SpatialIndex, P: SparseProjector> ZoomOutRefiner<S, P> {
    pub fn with_services(options: ZoomOutOptions, index: S, projector: P) -> Self {
        Self {
            options,
            index,
            projector,
        }
    }

    pub fn options(&self) -> &ZoomOutOptions {
        &self.options
    }

    /// Upsamples the square map `c` by `options.iterations` dimensions.
    ///
    /// `a2` is the `n2×n2` area matrix of the target surface; it is used as
    /// given and need not be diagonal.
    pub fn refine(
        &self,
        l1: &Basis,
        l2: &Basis,
        a2: &CsrMatrix<f64>,
        c: &FunctionalMap,
    ) -> Result<FunctionalMap> {
        self.run(l1, l2, a2, c, None)
    }

    pub fn refine_with_diagnostics(
        &self,
        l1: &Basis,
        l2: &Basis,
        a2: &CsrMatrix<f64>,
        c: &FunctionalMap,
    ) -> Result<(FunctionalMap, RefinementReport)> {
        let mut report = RefinementReport::new(RefineMethod::ZoomOut, c.shape());
        let map = self.run(l1, l2, a2, c, Some(&mut report))?;
        Ok((map, report))
    }

    fn run(
        &self,
        l1: &Basis,
        l2: &Basis,
        a2: &CsrMatrix<f64>,
        c: &FunctionalMap,
        mut report: Option<&mut RefinementReport>,
    ) -> Result<FunctionalMap> {
        let nit = self.options.iterations;
        validate::check_zoomout_inputs(l1, l2, a2, c, nit)?;
        let total = Instant::now();
        let kinit = c.nrows();
        let n1 = l1.nrows();
        debug!(
            "ZoomOutRefiner::refine n1={} n2={} k={} -> {} ({} iterations)",
            n1,
            l2.nrows(),
            kinit,
            kinit + nit,
            nit
        );

        let mut c_zo = c.clone();
        // the bases are sliced to the current dimension on every step
        let mut l1_k = l1.columns(0, kinit).into_owned();
        let mut l2_k = l2.columns(0, kinit).into_owned();
        for (iteration, k) in (kinit..kinit + nit).enumerate() {
            let start = Instant::now();
            let matches = embed_and_match(&l1_k, &l2_k, &c_zo, &self.index)?;
            let p = incidence_matrix(&matches, n1)?;

            let l1_next = l1.columns(0, k + 1).into_owned();
            let l2_next = l2.columns(0, k + 1).into_owned();
            c_zo = self.projector.project(&l2_next, a2, &p, &l1_next)?;
            l1_k = l1_next;
            l2_k = l2_next;

            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
            let distinct = matches.distinct_sources();
            debug!(
                "ZoomOutRefiner iter {iteration}: k={} -> {}, {distinct} distinct matches, {elapsed_ms:.3} ms",
                k,
                k + 1
            );
            if let Some(report) = report.as_deref_mut() {
                report.iterations.push(IterationTrace {
                    iteration,
                    map_rows: c_zo.nrows(),
                    map_cols: c_zo.ncols(),
                    distinct_matches: distinct,
                    elapsed_ms,
                });
            }
        }

        if let Some(report) = report {
            report.final_shape = c_zo.shape();
            report.elapsed_ms = total.elapsed().as_secs_f64() * 1000.0;
        }
        Ok(c_zo)
    }
}

/// Upsamples a square `K×K` functional map to `(K+nit)×(K+nit)` with the
/// default k-d tree index and CSR projector.
pub fn zoomout_refine(
    l1: &Basis,
    l2: &Basis,
    a2: &CsrMatrix<f64>,
    c: &FunctionalMap,
    nit: usize,
) -> Result<FunctionalMap> {
    ZoomOutRefiner::new(ZoomOutOptions::with_iterations(nit)).refine(l1, l2, a2, c)
}
