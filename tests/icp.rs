mod common;

use approx::assert_relative_eq;
use common::init_logging;
use common::mocks::CountingIndex;
use common::synthetic_basis::{cosine_basis, permutation, permute_rows, random_matrix};
use fmap_refine::linalg::SvdSolver;
use fmap_refine::spatial::BruteForceIndex;
use fmap_refine::{icp_refine, spectral_matches, IcpOptions, IcpRefiner, RefineError};
use nalgebra::DMatrix;

#[test]
fn identical_bases_return_identity_unchanged() {
    init_logging();
    let l = cosine_basis(8, 4);
    let c = DMatrix::<f64>::identity(4, 4);
    let out = icp_refine(&l, &l, &c, 1).expect("refinement should succeed");
    assert_eq!(out.shape(), (4, 4));
    assert_relative_eq!(out, c, epsilon = 1e-10);
}

#[test]
fn perturbed_map_snaps_back_to_ground_truth() {
    init_logging();
    let n = 40;
    let l1 = cosine_basis(n, 10);
    let perm = permutation(n, 3);
    let l2 = permute_rows(&l1, &perm);

    let c0 = DMatrix::<f64>::identity(6, 6) + random_matrix(6, 6, 1e-3, 5);
    let refined = icp_refine(&l1, &l2, &c0, 5).expect("refinement should succeed");

    let before = (&c0 - DMatrix::<f64>::identity(6, 6)).norm();
    let after = (&refined - DMatrix::<f64>::identity(6, 6)).norm();
    assert!(
        after < before,
        "refinement should move toward the true map: before={before:.3e} after={after:.3e}"
    );
    assert_relative_eq!(refined, DMatrix::identity(6, 6), epsilon = 1e-8);

    let matches = spectral_matches(&l1, &l2, &refined, &BruteForceIndex).unwrap();
    assert_eq!(matches.as_slice(), perm.as_slice());
}

#[test]
fn square_output_is_orthogonal() {
    init_logging();
    let l1 = random_matrix(30, 8, 1.0, 17);
    let l2 = random_matrix(25, 9, 1.0, 18);
    let c0 = random_matrix(5, 5, 1.0, 19);
    let refiner = IcpRefiner::new(IcpOptions::with_iterations(10));
    let (out, report) = refiner
        .refine_with_diagnostics(&l1, &l2, &c0)
        .expect("refinement should succeed");
    assert_eq!(out.shape(), (5, 5));
    assert_relative_eq!(&out * out.transpose(), DMatrix::identity(5, 5), epsilon = 1e-10);
    assert_eq!(report.iterations.len(), 10);
    assert!(report.map_sizes().iter().all(|&s| s == (5, 5)));
    assert!(report
        .iterations
        .iter()
        .all(|it| it.distinct_matches >= 1 && it.distinct_matches <= 30));
}

#[test]
fn every_iteration_is_orthogonal() {
    let l1 = random_matrix(20, 6, 1.0, 41);
    let l2 = random_matrix(22, 6, 1.0, 42);
    let mut c = random_matrix(4, 4, 1.0, 43);
    for _ in 0..4 {
        c = icp_refine(&l1, &l2, &c, 1).unwrap();
        assert_relative_eq!(&c * c.transpose(), DMatrix::identity(4, 4), epsilon = 1e-10);
    }
}

#[test]
fn zero_iterations_is_identity_operation() {
    let l1 = random_matrix(12, 5, 1.0, 1);
    let l2 = random_matrix(14, 5, 1.0, 2);
    let c0 = random_matrix(3, 4, 1.0, 3);
    let out = icp_refine(&l1, &l2, &c0, 0).unwrap();
    assert_eq!(out, c0);
}

#[test]
fn repeated_calls_are_bit_identical() {
    let l1 = random_matrix(200, 12, 1.0, 7);
    let l2 = random_matrix(180, 12, 1.0, 8);
    let c0 = random_matrix(8, 8, 1.0, 9);
    let a = icp_refine(&l1, &l2, &c0, 6).unwrap();
    let b = icp_refine(&l1, &l2, &c0, 6).unwrap();
    assert_eq!(a, b);
}

#[test]
fn kd_tree_and_brute_force_agree() {
    let l1 = random_matrix(150, 10, 1.0, 21);
    let l2 = random_matrix(120, 10, 1.0, 22);
    let c0 = random_matrix(7, 7, 1.0, 23);
    let options = IcpOptions::with_iterations(4);
    let tree = IcpRefiner::new(options.clone()).refine(&l1, &l2, &c0).unwrap();
    let brute = IcpRefiner::with_services(options, BruteForceIndex, SvdSolver)
        .refine(&l1, &l2, &c0)
        .unwrap();
    assert_eq!(tree, brute);
}

#[test]
fn incompatible_map_fails_before_any_query() {
    let l1 = random_matrix(10, 3, 1.0, 1);
    let l2 = random_matrix(10, 6, 1.0, 2);
    let c0 = DMatrix::<f64>::identity(4, 4);
    let index = CountingIndex::default();
    let refiner = IcpRefiner::with_services(IcpOptions::with_iterations(3), &index, SvdSolver);
    let err = refiner.refine(&l1, &l2, &c0).unwrap_err();
    assert_eq!(
        err,
        RefineError::InsufficientBasis {
            which: "source basis L1",
            required: 4,
            provided: 3
        }
    );
    assert_eq!(index.calls.get(), 0);
}

#[test]
fn each_iteration_queries_once() {
    let l = cosine_basis(16, 6);
    let c0 = DMatrix::<f64>::identity(5, 5);
    let index = CountingIndex::default();
    let refiner = IcpRefiner::with_services(IcpOptions::with_iterations(7), &index, SvdSolver);
    refiner.refine(&l, &l, &c0).unwrap();
    assert_eq!(index.calls.get(), 7);
}
