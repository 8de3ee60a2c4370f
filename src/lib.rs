#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod diagnostics;
pub mod error;
pub mod refine;
pub mod types;

// Numeric services injected into the refiners.
pub mod linalg;
pub mod spatial;

// Demo tooling: JSON matrices and runtime configuration.
pub mod config;
pub mod io;

// --- High-level re-exports -------------------------------------------------

// Main entry points.
pub use crate::refine::{
    icp_refine, spectral_matches, zoomout_refine, IcpOptions, IcpRefiner, ZoomOutOptions,
    ZoomOutRefiner,
};

pub use crate::error::RefineError;
pub use crate::types::{Basis, Correspondence, FunctionalMap};

// Per-iteration reports returned by `refine_with_diagnostics`.
pub use crate::diagnostics::{IterationTrace, RefineMethod, RefinementReport};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use fmap_refine::prelude::*;
/// use nalgebra::DMatrix;
///
/// # fn main() -> Result<(), RefineError> {
/// let basis = DMatrix::<f64>::identity(100, 30);
/// let area = diagonal_area(&[1.0; 100]);
/// let c0 = DMatrix::<f64>::identity(10, 10);
///
/// let c = zoomout_refine(&basis, &basis, &area, &c0, 20)?;
/// assert_eq!(c.shape(), (30, 30));
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::linalg::diagonal_area;
    pub use crate::spatial::{BruteForceIndex, KdTreeIndex, SpatialIndex};
    pub use crate::{
        icp_refine, zoomout_refine, IcpOptions, IcpRefiner, RefineError, ZoomOutOptions,
        ZoomOutRefiner,
    };
}
