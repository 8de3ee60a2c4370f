//! Diagnostics data model returned by the refiners and the demo tools.
//!
//! `RefinementReport` is produced by `refine_with_diagnostics` on both
//! refiners and records, per iteration, the shape of the map and how many
//! source vertices the correspondence touched. Everything serializes to
//! camelCase JSON for the demo binaries.

pub mod refine;
pub mod timing;

pub use refine::{IterationTrace, RefineMethod, RefinementReport};
pub use timing::{StageTiming, TimingBreakdown};
