//! Functional-map refinement loops.
//!
//! The `refine` module bundles the two refinement routines:
//!
//! - [`icp`] keeps the map's shape fixed and alternates nearest-neighbor
//!   matching with an orthogonal least-squares update.
//! - [`zoomout`] grows a square map by one dimension per iteration, projecting
//!   each correspondence back through the target area matrix.
//!
//! Both share the embed-and-match step in [`spectral_matches`], check all
//! preconditions before their first iteration, and run a fixed number of
//! iterations with no early stop.

mod embed;
pub mod icp;
mod options;
mod validate;
pub mod zoomout;

pub use embed::spectral_matches;
pub use icp::{icp_refine, IcpRefiner};
pub use options::{IcpOptions, ZoomOutOptions};
pub use zoomout::{zoomout_refine, ZoomOutRefiner};
