//! Exact k-d tree over points of arbitrary dimension.
//!
//! The spectral embeddings change dimension between ZoomOut iterations, so
//! the tree stores coordinates in a flat row-major buffer and takes the
//! dimension at build time instead of as a const parameter.
//!
//! Construction splits on the axis of widest spread at the median, down to
//! buckets of at most `leaf_size` points. Queries descend to the nearer child
//! first and visit the far child only when the splitting plane is within the
//! current best distance. The far-side test is inclusive so equidistant
//! candidates on the other side are still compared and the lowest index wins.

use super::{check_point_sets, row_major, squared_distance, SpatialIndex};
use crate::error::Result;
use crate::types::Correspondence;
use log::trace;
use nalgebra::DMatrix;

/// Bucket size used by the reference refinement algorithms.
pub const DEFAULT_LEAF_SIZE: usize = 20;

/// k-d tree backed [`SpatialIndex`].
#[derive(Clone, Copy, Debug)]
pub struct KdTreeIndex {
    /// Maximum number of points stored in a leaf bucket.
    pub leaf_size: usize,
    /// Run batch queries on the rayon pool (requires the `parallel` feature).
    pub parallel: bool,
}

impl Default for KdTreeIndex {
    fn default() -> Self {
        Self {
            leaf_size: DEFAULT_LEAF_SIZE,
            parallel: true,
        }
    }
}

impl KdTreeIndex {
    pub fn new(leaf_size: usize, parallel: bool) -> Self {
        Self {
            leaf_size: leaf_size.max(1),
            parallel,
        }
    }
}

impl SpatialIndex for KdTreeIndex {
    fn nearest(
        &self,
        reference: &DMatrix<f64>,
        queries: &DMatrix<f64>,
    ) -> Result<Correspondence> {
        check_point_sets(reference, queries)?;
        let tree = KdTree::build(reference, self.leaf_size);
        trace!(
            "KdTree: {} points, dim={}, {} nodes",
            reference.nrows(),
            reference.ncols(),
            tree.nodes.len()
        );
        let qs = row_major(queries);
        let dim = queries.ncols();

        #[cfg(feature = "parallel")]
        if self.parallel {
            use rayon::prelude::*;
            let matches = qs
                .par_chunks_exact(dim)
                .map(|q| tree.nearest(q).0)
                .collect();
            return Ok(Correspondence::new(matches));
        }

        let matches = qs.chunks_exact(dim).map(|q| tree.nearest(q).0).collect();
        Ok(Correspondence::new(matches))
    }
}

enum Node {
    Leaf {
        start: usize,
        end: usize,
    },
    Split {
        axis: usize,
        value: f64,
        left: usize,
        right: usize,
    },
}

struct KdTree {
    dim: usize,
    coords: Vec<f64>,
    order: Vec<usize>,
    nodes: Vec<Node>,
    leaf_size: usize,
}

impl KdTree {
    fn build(points: &DMatrix<f64>, leaf_size: usize) -> Self {
        let n = points.nrows();
        let mut tree = Self {
            dim: points.ncols(),
            coords: row_major(points),
            order: (0..n).collect(),
            nodes: Vec::with_capacity(2 * n / leaf_size.max(1) + 1),
            leaf_size: leaf_size.max(1),
        };
        tree.build_range(0, n);
        tree
    }

    #[inline]
    fn point(&self, idx: usize) -> &[f64] {
        &self.coords[idx * self.dim..(idx + 1) * self.dim]
    }

    /// Builds the subtree over `order[start..end]` and returns its node id.
    fn build_range(&mut self, start: usize, end: usize) -> usize {
        let node_id = self.nodes.len();
        if end - start <= self.leaf_size {
            self.nodes.push(Node::Leaf { start, end });
            return node_id;
        }

        let (axis, spread) = self.widest_axis(start, end);
        if spread <= 0.0 {
            // all points coincide, nothing to split on
            self.nodes.push(Node::Leaf { start, end });
            return node_id;
        }

        let mid = start + (end - start) / 2;
        let dim = self.dim;
        let coords = &self.coords;
        self.order[start..end].select_nth_unstable_by(mid - start, |&a, &b| {
            coords[a * dim + axis]
                .total_cmp(&coords[b * dim + axis])
                .then(a.cmp(&b))
        });
        let value = self.coords[self.order[mid] * dim + axis];

        // placeholder, patched once both children exist
        self.nodes.push(Node::Leaf { start, end });
        let left = self.build_range(start, mid);
        let right = self.build_range(mid, end);
        self.nodes[node_id] = Node::Split {
            axis,
            value,
            left,
            right,
        };
        node_id
    }

    fn widest_axis(&self, start: usize, end: usize) -> (usize, f64) {
        let mut best_axis = 0usize;
        let mut best_spread = f64::NEG_INFINITY;
        for axis in 0..self.dim {
            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            for &idx in &self.order[start..end] {
                let v = self.coords[idx * self.dim + axis];
                lo = lo.min(v);
                hi = hi.max(v);
            }
            let spread = hi - lo;
            if spread > best_spread {
                best_spread = spread;
                best_axis = axis;
            }
        }
        (best_axis, best_spread)
    }

    /// Returns `(index, squared distance)` of the closest stored point.
    fn nearest(&self, query: &[f64]) -> (usize, f64) {
        let mut best = (usize::MAX, f64::INFINITY);
        self.search(0, query, &mut best);
        best
    }

    fn search(&self, node_id: usize, query: &[f64], best: &mut (usize, f64)) {
        match self.nodes[node_id] {
            Node::Leaf { start, end } => {
                for &idx in &self.order[start..end] {
                    let d = squared_distance(query, self.point(idx));
                    if best.0 == usize::MAX || d < best.1 || (d == best.1 && idx < best.0) {
                        *best = (idx, d);
                    }
                }
            }
            Node::Split {
                axis,
                value,
                left,
                right,
            } => {
                let diff = query[axis] - value;
                let (near, far) = if diff < 0.0 {
                    (left, right)
                } else {
                    (right, left)
                };
                self.search(near, query, best);
                if diff * diff <= best.1 {
                    self.search(far, query, best);
                }
            }
        }
    }
}
