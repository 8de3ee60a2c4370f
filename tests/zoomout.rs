mod common;

use approx::assert_relative_eq;
use common::init_logging;
use common::mocks::{CountingIndex, CountingProjector};
use common::synthetic_basis::{
    cosine_basis, permutation, permute_rows, random_matrix, random_weights,
};
use fmap_refine::linalg::{diagonal_area, CsrProjector};
use fmap_refine::spatial::BruteForceIndex;
use fmap_refine::{zoomout_refine, RefineError, ZoomOutOptions, ZoomOutRefiner};
use nalgebra::DMatrix;

#[test]
fn identity_bases_grow_to_identity() {
    init_logging();
    let l = DMatrix::<f64>::identity(5, 5);
    let a2 = diagonal_area(&[1.0; 5]);
    let c0 = DMatrix::<f64>::identity(3, 3);
    let out = zoomout_refine(&l, &l, &a2, &c0, 2).expect("refinement should succeed");
    assert_eq!(out.shape(), (5, 5));
    assert_relative_eq!(out, DMatrix::identity(5, 5), epsilon = 1e-12);
}

#[test]
fn permuted_shape_upsamples_to_identity() {
    init_logging();
    let n = 50;
    let l1 = cosine_basis(n, 12);
    let perm = permutation(n, 11);
    let l2 = permute_rows(&l1, &perm);
    let a2 = diagonal_area(&vec![1.0; n]);
    let c0 = DMatrix::<f64>::identity(4, 4);

    let out = zoomout_refine(&l1, &l2, &a2, &c0, 8).expect("refinement should succeed");
    assert_eq!(out.shape(), (12, 12));
    assert_relative_eq!(out, DMatrix::identity(12, 12), epsilon = 1e-10);
}

#[test]
fn lumped_area_weights_are_respected() {
    // L2 is orthonormal with respect to A2 = diag(w): L2ᵗ·A2·L2 = I
    let n = 30;
    let weights = random_weights(n, 0.5, 1.5, 4);
    let unit = cosine_basis(n, 9);
    let l2 = DMatrix::from_fn(n, 9, |r, c| unit[(r, c)] / weights[r].sqrt());
    let perm = permutation(n, 6);
    let mut l1 = DMatrix::<f64>::zeros(n, 9);
    for (i, &p) in perm.iter().enumerate() {
        l1.set_row(p, &l2.row(i));
    }
    let a2 = diagonal_area(&weights);
    let c0 = DMatrix::<f64>::identity(3, 3);

    let out = zoomout_refine(&l1, &l2, &a2, &c0, 6).unwrap();
    assert_relative_eq!(out, DMatrix::identity(9, 9), epsilon = 1e-10);
}

#[test]
fn map_size_grows_by_one_each_iteration() {
    init_logging();
    let l1 = random_matrix(40, 10, 1.0, 31);
    let l2 = random_matrix(35, 12, 1.0, 32);
    let a2 = diagonal_area(&random_weights(35, 0.1, 1.0, 33));
    let c0 = random_matrix(3, 3, 1.0, 34);
    let refiner = ZoomOutRefiner::new(ZoomOutOptions::with_iterations(7));
    let (out, report) = refiner
        .refine_with_diagnostics(&l1, &l2, &a2, &c0)
        .expect("refinement should succeed");
    assert_eq!(out.shape(), (10, 10));
    let sizes = report.map_sizes();
    let expected: Vec<(usize, usize)> = (4..=10).map(|k| (k, k)).collect();
    assert_eq!(sizes, expected);
    assert_eq!(report.final_shape, (10, 10));
}

#[test]
fn zero_iterations_is_identity_operation() {
    let l = random_matrix(20, 6, 1.0, 2);
    let a2 = diagonal_area(&[1.0; 20]);
    let c0 = random_matrix(6, 6, 1.0, 3);
    let out = zoomout_refine(&l, &l, &a2, &c0, 0).unwrap();
    assert_eq!(out, c0);
}

#[test]
fn repeated_calls_are_bit_identical() {
    let l1 = random_matrix(300, 20, 1.0, 51);
    let l2 = random_matrix(250, 20, 1.0, 52);
    let a2 = diagonal_area(&random_weights(250, 0.1, 1.0, 53));
    let c0 = random_matrix(5, 5, 1.0, 54);
    let a = zoomout_refine(&l1, &l2, &a2, &c0, 15).unwrap();
    let b = zoomout_refine(&l1, &l2, &a2, &c0, 15).unwrap();
    assert_eq!(a, b);
}

#[test]
fn kd_tree_and_brute_force_agree() {
    let l1 = random_matrix(120, 14, 1.0, 61);
    let l2 = random_matrix(100, 14, 1.0, 62);
    let a2 = diagonal_area(&random_weights(100, 0.1, 1.0, 63));
    let c0 = random_matrix(6, 6, 1.0, 64);
    let options = ZoomOutOptions::with_iterations(8);
    let tree = ZoomOutRefiner::new(options.clone())
        .refine(&l1, &l2, &a2, &c0)
        .unwrap();
    let brute = ZoomOutRefiner::with_services(options, BruteForceIndex, CsrProjector)
        .refine(&l1, &l2, &a2, &c0)
        .unwrap();
    assert_eq!(tree, brute);
}

#[test]
fn non_square_map_fails_before_any_work() {
    let l = DMatrix::<f64>::identity(6, 6);
    let a2 = diagonal_area(&[1.0; 6]);
    let c0 = DMatrix::<f64>::zeros(3, 2);
    let index = CountingIndex::default();
    let projector = CountingProjector::default();
    let refiner =
        ZoomOutRefiner::with_services(ZoomOutOptions::with_iterations(2), &index, &projector);
    let err = refiner.refine(&l, &l, &a2, &c0).unwrap_err();
    assert_eq!(err, RefineError::NonSquareMap { rows: 3, cols: 2 });
    assert!(err.to_string().contains("(3, 2)"));
    assert_eq!(index.calls.get(), 0);
    assert_eq!(projector.calls.get(), 0);
}

#[test]
fn insufficient_target_basis_names_counts() {
    let l1 = DMatrix::<f64>::identity(10, 10);
    let l2 = DMatrix::<f64>::identity(10, 6);
    let a2 = diagonal_area(&[1.0; 10]);
    let c0 = DMatrix::<f64>::identity(4, 4);
    let index = CountingIndex::default();
    let projector = CountingProjector::default();
    let refiner =
        ZoomOutRefiner::with_services(ZoomOutOptions::with_iterations(3), &index, &projector);
    let err = refiner.refine(&l1, &l2, &a2, &c0).unwrap_err();
    assert_eq!(
        err,
        RefineError::InsufficientBasis {
            which: "target basis L2",
            required: 7,
            provided: 6
        }
    );
    assert!(err.to_string().contains("7 are needed when 6 are provided"));
    assert_eq!(index.calls.get(), 0);
}

#[test]
fn every_incidence_matrix_has_one_entry_per_row() {
    let l1 = random_matrix(25, 9, 1.0, 71);
    let l2 = random_matrix(30, 9, 1.0, 72);
    let a2 = diagonal_area(&[1.0; 30]);
    let c0 = random_matrix(4, 4, 1.0, 73);
    let index = CountingIndex::default();
    let projector = CountingProjector::default();
    let refiner =
        ZoomOutRefiner::with_services(ZoomOutOptions::with_iterations(5), &index, &projector);
    let out = refiner.refine(&l1, &l2, &a2, &c0).unwrap();
    assert_eq!(out.shape(), (9, 9));
    assert_eq!(index.calls.get(), 5);
    assert_eq!(projector.calls.get(), 5);
}
