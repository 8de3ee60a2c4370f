//! Spectral embedding + nearest-neighbor matching shared by both refiners.

use super::validate;
use crate::error::{RefineError, Result};
use crate::spatial::SpatialIndex;
use crate::types::{Basis, Correspondence, FunctionalMap};

/// Converts a functional map into a point-to-point correspondence.
///
/// `c` is `K2×K1`; `l1` and `l2` are truncated to their first `K1` and `K2`
/// columns. Every target vertex (row of `l2`) is matched to the source vertex
/// whose embedding `C·L1ᵗ` is closest.
pub fn spectral_matches<S: SpatialIndex + ?Sized>(
    l1: &Basis,
    l2: &Basis,
    c: &FunctionalMap,
    index: &S,
) -> Result<Correspondence> {
    validate::check_map_against_bases(l1, l2, c)?;
    let (k2, k1) = c.shape();
    let l1_used = l1.columns(0, k1).into_owned();
    let l2_used = l2.columns(0, k2).into_owned();
    embed_and_match(&l1_used, &l2_used, c, index)
}

/// Same as [`spectral_matches`] for bases already truncated to `c`'s shape.
pub(crate) fn embed_and_match<S: SpatialIndex + ?Sized>(
    l1_used: &Basis,
    l2_used: &Basis,
    c: &FunctionalMap,
    index: &S,
) -> Result<Correspondence> {
    // (C · L1ᵗ)ᵗ, one embedded source vertex per row
    let embedded = l1_used * c.transpose();
    // finite inputs can still overflow to inf - inf
    if !embedded.iter().all(|v| v.is_finite()) {
        return Err(RefineError::NonFinite {
            what: "spectral embedding",
        });
    }
    index.nearest(&embedded, l2_used)
}
