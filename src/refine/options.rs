//! Serde-deserializable knobs for the two refiners.

use crate::spatial::{KdTreeIndex, DEFAULT_LEAF_SIZE};
use serde::Deserialize;

/// Parameters of the fixed-dimension ICP refinement.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct IcpOptions {
    /// Number of ICP iterations; the loop never stops early.
    pub iterations: usize,
    /// Leaf bucket size of the k-d tree built every iteration.
    pub leaf_size: usize,
    /// Answer nearest-neighbor batches on the rayon pool.
    pub parallel: bool,
}

impl Default for IcpOptions {
    fn default() -> Self {
        Self {
            iterations: 10,
            leaf_size: DEFAULT_LEAF_SIZE,
            parallel: true,
        }
    }
}

impl IcpOptions {
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }

    pub fn spatial_index(&self) -> KdTreeIndex {
        KdTreeIndex::new(self.leaf_size, self.parallel)
    }
}

/// Parameters of the dimension-growing ZoomOut refinement.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ZoomOutOptions {
    /// Number of upsampling steps; the output map grows by one per step.
    pub iterations: usize,
    pub leaf_size: usize,
    pub parallel: bool,
}

impl Default for ZoomOutOptions {
    fn default() -> Self {
        Self {
            iterations: 10,
            leaf_size: DEFAULT_LEAF_SIZE,
            parallel: true,
        }
    }
}

impl ZoomOutOptions {
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }

    pub fn spatial_index(&self) -> KdTreeIndex {
        KdTreeIndex::new(self.leaf_size, self.parallel)
    }
}
