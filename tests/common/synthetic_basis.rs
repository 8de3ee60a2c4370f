use nalgebra::DMatrix;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

/// Orthonormal cosine (DCT-II) basis of a path graph with `n` vertices.
///
/// These are the Laplacian eigenvectors of the path, ordered by frequency.
/// Column 1 is strictly monotone, so every row is distinct once `k >= 2`.
pub fn cosine_basis(n: usize, k: usize) -> DMatrix<f64> {
    assert!(k <= n, "basis size must not exceed vertex count");
    let nf = n as f64;
    DMatrix::from_fn(n, k, |i, j| {
        if j == 0 {
            1.0 / nf.sqrt()
        } else {
            (2.0 / nf).sqrt() * (PI * (i as f64 + 0.5) * j as f64 / nf).cos()
        }
    })
}

/// Random permutation of `0..n`.
pub fn permutation(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(&mut rng);
    perm
}

/// Row `i` of the result is row `perm[i]` of `m`.
pub fn permute_rows(m: &DMatrix<f64>, perm: &[usize]) -> DMatrix<f64> {
    DMatrix::from_fn(perm.len(), m.ncols(), |r, c| m[(perm[r], c)])
}

pub fn random_matrix(rows: usize, cols: usize, scale: f64, seed: u64) -> DMatrix<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    DMatrix::from_fn(rows, cols, |_, _| rng.gen_range(-scale..scale))
}

pub fn random_weights(n: usize, lo: f64, hi: f64, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(lo..hi)).collect()
}
