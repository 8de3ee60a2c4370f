//! Fixed-dimension ICP refinement of a functional map.
//!
//! Every iteration alternates between the point-to-point and the functional
//! representation of the map:
//! 1. embed the source basis into the target's spectral space with the
//!    current map and match every target vertex to its nearest embedded
//!    source vertex;
//! 2. solve the least-squares problem `L2·W ≈ L1[matches]` for the map that
//!    best explains the matched rows;
//! 3. replace `W` by its closest orthogonal matrix (`U·I·Vᵗ` from the SVD),
//!    enforcing the near-isometry assumption behind functional maps.
//!
//! The loop runs exactly `iterations` times; there is no convergence test.

use super::embed::embed_and_match;
use super::options::IcpOptions;
use super::validate;
use crate::diagnostics::{IterationTrace, RefineMethod, RefinementReport};
use crate::error::Result;
use crate::linalg::{DenseSolver, SvdSolver};
use crate::spatial::{KdTreeIndex, SpatialIndex};
use crate::types::{Basis, FunctionalMap};
use log::debug;
use std::time::Instant;

/// ICP refiner generic over its nearest-neighbor and dense services.
pub struct IcpRefiner<S = KdTreeIndex, D = SvdSolver> {
    options: IcpOptions,
    index: S,
    solver: D,
}

impl IcpRefiner {
    /// Refiner backed by the k-d tree index and the SVD solver.
    pub fn new(options: IcpOptions) -> Self {
        let index = options.spatial_index();
        Self {
            options,
            index,
            solver: SvdSolver,
        }
    }
}

impl<S: SpatialIndex, D: DenseSolver> IcpRefiner<S, D> {
    pub fn with_services(options: IcpOptions, index: S, solver: D) -> Self {
        Self {
            options,
            index,
            solver,
        }
    }

    pub fn options(&self) -> &IcpOptions {
        &self.options
    }

    /// Refines `c` (`K2×K1`) against bases `l1` (`n1×k1'`, `k1' ≥ K1`) and
    /// `l2` (`n2×k2'`, `k2' ≥ K2`). The result has the same shape as `c`.
    pub fn refine(
        &self,
        l1: &Basis,
        l2: &Basis,
        c: &FunctionalMap,
    ) -> Result<FunctionalMap> {
        self.run(l1, l2, c, None)
    }

    /// Like [`refine`](Self::refine), also returning a per-iteration trace.
    pub fn refine_with_diagnostics(
        &self,
        l1: &Basis,
        l2: &Basis,
        c: &FunctionalMap,
    ) -> Result<(FunctionalMap, RefinementReport)> {
        let mut report = RefinementReport::new(RefineMethod::Icp, c.shape());
        let map = self.run(l1, l2, c, Some(&mut report))?;
        Ok((map, report))
    }

    fn run(
        &self,
        l1: &Basis,
        l2: &Basis,
        c: &FunctionalMap,
        mut report: Option<&mut RefinementReport>,
    ) -> Result<FunctionalMap> {
        validate::check_icp_inputs(l1, l2, c)?;
        let total = Instant::now();
        let (k2, k1) = c.shape();
        let nit = self.options.iterations;
        debug!(
            "IcpRefiner::refine n1={} n2={} map={}x{} iterations={}",
            l1.nrows(),
            l2.nrows(),
            k2,
            k1,
            nit
        );

        // Basis functions beyond the map's dimensions are dropped here.
        let l1_icp = l1.columns(0, k1).into_owned();
        let l2_icp = l2.columns(0, k2).into_owned();

        let mut c_icp = c.clone();
        for iteration in 0..nit {
            let start = Instant::now();
            let matches = embed_and_match(&l1_icp, &l2_icp, &c_icp, &self.index)?;
            let matched_rows = matches.gather_rows(&l1_icp)?;
            let w = self.solver.lstsq(&l2_icp, &matched_rows)?;
            c_icp = self.solver.nearest_orthogonal(&w)?;

            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
            let distinct = matches.distinct_sources();
            debug!(
                "IcpRefiner iter {iteration}: {distinct} distinct matches, {elapsed_ms:.3} ms"
            );
            if let Some(report) = report.as_deref_mut() {
                report.iterations.push(IterationTrace {
                    iteration,
                    map_rows: k2,
                    map_cols: k1,
                    distinct_matches: distinct,
                    elapsed_ms,
                });
            }
        }

        if let Some(report) = report {
            report.final_shape = c_icp.shape();
            report.elapsed_ms = total.elapsed().as_secs_f64() * 1000.0;
        }
        Ok(c_icp)
    }
}

/// Refines a `K2×K1` functional map with `nit` ICP iterations using the
/// default k-d tree index and SVD solver.
pub fn icp_refine(
    l1: &Basis,
    l2: &Basis,
    c: &FunctionalMap,
    nit: usize,
) -> Result<FunctionalMap> {
    IcpRefiner::new(IcpOptions::with_iterations(nit)).refine(l1, l2, c)
}
