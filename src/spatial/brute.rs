use super::{check_point_sets, row_major, squared_distance, SpatialIndex};
use crate::error::Result;
use crate::types::Correspondence;
use nalgebra::DMatrix;

/// Exhaustive O(n·m) scan. Serves as the reference behavior for the k-d tree
/// and as a deterministic index for small problems.
#[derive(Clone, Copy, Debug, Default)]
pub struct BruteForceIndex;

impl SpatialIndex for BruteForceIndex {
    fn nearest(
        &self,
        reference: &DMatrix<f64>,
        queries: &DMatrix<f64>,
    ) -> Result<Correspondence> {
        check_point_sets(reference, queries)?;
        let dim = reference.ncols();
        let refs = row_major(reference);
        let qs = row_major(queries);

        let matches = qs
            .chunks_exact(dim)
            .map(|q| {
                let mut best = f64::INFINITY;
                let mut best_idx = 0usize;
                for (idx, p) in refs.chunks_exact(dim).enumerate() {
                    let d = squared_distance(q, p);
                    // strict comparison keeps the lowest index on ties
                    if d < best {
                        best = d;
                        best_idx = idx;
                    }
                }
                best_idx
            })
            .collect();
        Ok(Correspondence::new(matches))
    }
}
