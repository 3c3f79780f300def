//! Reference-value tests for the matrix decompositions.
//!
//! Closed-form scenarios plus cross-checks against nalgebra's own
//! decompositions on the same inputs.

use approx::assert_relative_eq;
use nalgebra::DMatrix;
use tessera_math::prelude::*;

// =============================================================================
// HELPERS
// =============================================================================

fn hilbert(n: usize) -> Matrix {
    let mut m = Matrix::new(n, n).unwrap();
    for i in 0..n {
        for j in 0..n {
            m[(i, j)] = 1.0 / (i + j + 1) as f64;
        }
    }
    m
}

fn assert_matrix_close(actual: &Matrix, expected: &Matrix, tol: f64) {
    assert_eq!(actual.shape(), expected.shape());
    let diff = actual.sub(expected).unwrap().max_abs();
    assert!(diff <= tol, "max |diff| = {diff:e} > {tol:e}\n{actual}\nvs\n{expected}");
}

// =============================================================================
// CHOLESKY
// =============================================================================

#[test]
fn cholesky_classic_spd_matrix() {
    let a = Matrix::from_rows(&[
        &[4.0, 12.0, -16.0],
        &[12.0, 37.0, -43.0],
        &[-16.0, -43.0, 98.0],
    ])
    .unwrap();

    let chol = CholeskyDecomposition::new(&a).unwrap();
    assert!(chol.is_spd());

    let expected =
        Matrix::from_rows(&[&[2.0, 0.0, 0.0], &[6.0, 1.0, 0.0], &[-8.0, 5.0, 3.0]]).unwrap();
    assert_eq!(chol.get_l(), expected);
}

#[test]
fn cholesky_one_by_one() {
    for v in [0.25, 1.0, 16.0, 1e-8] {
        let chol = CholeskyDecomposition::new(&Matrix::from_rows(&[&[v]]).unwrap()).unwrap();
        assert!(chol.is_spd());
        assert_eq!(chol.l()[(0, 0)], v.sqrt());
    }
}

#[test]
fn cholesky_matches_nalgebra() {
    let a = hilbert(5);
    let chol = CholeskyDecomposition::new(&a).unwrap();
    assert!(chol.is_spd());

    let reference = nalgebra::Cholesky::new(DMatrix::from(&a)).unwrap();
    let reference_l = Matrix::try_from(&reference.l()).unwrap();
    assert_matrix_close(chol.l(), &reference_l, 1e-12);
}

#[test]
fn cholesky_solve_hilbert_system() {
    let a = hilbert(4);
    let chol = CholeskyDecomposition::new(&a).unwrap();

    // b = A * [1, 1, 1, 1]
    let ones = Matrix::from_vec(4, 1, vec![1.0; 4]).unwrap();
    let b = a.multiply(&ones).unwrap();

    let x = chol.solve(&b).unwrap();
    for i in 0..4 {
        assert_relative_eq!(x[(i, 0)], 1.0, epsilon = 1e-9);
    }
}

#[test]
fn cholesky_rejects_non_square() {
    let a = Matrix::new(3, 4).unwrap();
    assert!(matches!(
        CholeskyDecomposition::new(&a),
        Err(MathError::NotSquare { rows: 3, cols: 4 })
    ));
}

// =============================================================================
// EIGENVALUES: SYMMETRIC
// =============================================================================

#[test]
fn eigen_diagonal_matrix() {
    let a = Matrix::from_rows(&[&[2.0, 0.0], &[0.0, 3.0]]).unwrap();
    let eig = EigenvalueDecomposition::new(&a).unwrap();

    assert_eq!(eig.real_eigenvalues(), &[2.0, 3.0]);
    assert_eq!(eig.get_v(), Matrix::identity(2).unwrap());
    assert_eq!(eig.get_d(), a);
}

#[test]
fn eigen_unsorted_diagonal_is_sorted() {
    let a = Matrix::from_diagonal(&[5.0, -1.0, 3.0]).unwrap();
    let eig = EigenvalueDecomposition::new(&a).unwrap();

    assert_eq!(eig.real_eigenvalues(), &[-1.0, 3.0, 5.0]);
    // Eigenvector columns follow their eigenvalues.
    assert_eq!(eig.v().column(0), vec![0.0, 1.0, 0.0]);
    assert_eq!(eig.v().column(1), vec![0.0, 0.0, 1.0]);
    assert_eq!(eig.v().column(2), vec![1.0, 0.0, 0.0]);
}

#[test]
fn eigen_one_by_one() {
    let eig = EigenvalueDecomposition::new(&Matrix::from_rows(&[&[42.0]]).unwrap()).unwrap();
    assert_eq!(eig.real_eigenvalues(), &[42.0]);
    assert_eq!(eig.get_v(), Matrix::identity(1).unwrap());
}

#[test]
fn eigen_symmetric_matches_nalgebra() {
    let a = hilbert(6);
    let eig = EigenvalueDecomposition::new(&a).unwrap();
    assert!(eig.is_symmetric());

    let reference = nalgebra::SymmetricEigen::new(DMatrix::from(&a));
    let mut expected: Vec<f64> = reference.eigenvalues.iter().copied().collect();
    expected.sort_by(f64::total_cmp);

    for (actual, expected) in eig.real_eigenvalues().iter().zip(&expected) {
        assert_relative_eq!(*actual, *expected, epsilon = 1e-13, max_relative = 1e-8);
    }
}

#[test]
fn eigen_symmetric_reconstruction() {
    let a = Matrix::from_rows(&[
        &[2.0, -1.0, 0.0, 0.0],
        &[-1.0, 2.0, -1.0, 0.0],
        &[0.0, -1.0, 2.0, -1.0],
        &[0.0, 0.0, -1.0, 2.0],
    ])
    .unwrap();
    let eig = EigenvalueDecomposition::new(&a).unwrap();

    // Eigenvalues of the second-difference matrix: 2 - 2 cos(k pi / 5).
    for (k, &lambda) in eig.real_eigenvalues().iter().enumerate() {
        let expected = 2.0 - 2.0 * ((k + 1) as f64 * std::f64::consts::PI / 5.0).cos();
        assert_relative_eq!(lambda, expected, epsilon = 1e-13);
    }

    let v = eig.v();
    let vdvt = v
        .multiply(&eig.get_d())
        .unwrap()
        .multiply(&v.transpose())
        .unwrap();
    assert_matrix_close(&vdvt, &a, 1e-13);
}

// =============================================================================
// EIGENVALUES: NONSYMMETRIC
// =============================================================================

#[test]
fn eigen_rotation_matrix() {
    let a = Matrix::from_rows(&[&[0.0, -1.0], &[1.0, 0.0]]).unwrap();
    let eig = EigenvalueDecomposition::new(&a).unwrap();

    assert_eq!(eig.real_eigenvalues(), &[0.0, 0.0]);
    assert_eq!(eig.imag_eigenvalues(), &[1.0, -1.0]);

    let av = a.multiply(eig.v()).unwrap();
    let vd = eig.v().multiply(&eig.get_d()).unwrap();
    assert_matrix_close(&av, &vd, 1e-15);
}

#[test]
fn eigen_companion_matrix() {
    // Companion matrix of (x - 1)(x - 2)(x^2 + 1).
    let a = Matrix::from_rows(&[
        &[3.0, -3.0, 3.0, -2.0],
        &[1.0, 0.0, 0.0, 0.0],
        &[0.0, 1.0, 0.0, 0.0],
        &[0.0, 0.0, 1.0, 0.0],
    ])
    .unwrap();
    let eig = EigenvalueDecomposition::new(&a).unwrap();
    assert!(!eig.is_symmetric());

    let mut values = eig.eigenvalues();
    values.sort_by(|x, y| x.im.total_cmp(&y.im).then(x.re.total_cmp(&y.re)));

    let expected = [(0.0, -1.0), (1.0, 0.0), (2.0, 0.0), (0.0, 1.0)];
    for (value, (re, im)) in values.iter().zip(expected) {
        assert_relative_eq!(value.re, re, epsilon = 1e-10);
        assert_relative_eq!(value.im, im, epsilon = 1e-10);
    }

    let av = a.multiply(eig.v()).unwrap();
    let vd = eig.v().multiply(&eig.get_d()).unwrap();
    let scale = eig.v().max_abs().max(1.0) * a.max_abs();
    assert_matrix_close(&av, &vd, 1e-11 * scale);
}

#[test]
fn eigen_nonsymmetric_matches_nalgebra() {
    let a = Matrix::from_rows(&[
        &[4.0, 1.0, 2.0, 0.5],
        &[0.5, 3.0, 0.0, 1.0],
        &[0.0, 0.25, 2.0, 0.0],
        &[0.1, 0.0, 0.3, 1.0],
    ])
    .unwrap();
    let eig = EigenvalueDecomposition::new(&a).unwrap();

    let reference = DMatrix::from(&a).complex_eigenvalues();
    let mut expected: Vec<_> = reference.iter().copied().collect();
    expected.sort_by(|x, y| x.re.total_cmp(&y.re).then(x.im.total_cmp(&y.im)));

    let mut actual = eig.eigenvalues();
    actual.sort_by(|x, y| x.re.total_cmp(&y.re).then(x.im.total_cmp(&y.im)));

    for (x, y) in actual.iter().zip(&expected) {
        assert_relative_eq!(x.re, y.re, epsilon = 1e-10);
        assert_relative_eq!(x.im, y.im, epsilon = 1e-10);
    }
}

#[test]
fn eigen_rejects_non_square() {
    let a = Matrix::new(2, 5).unwrap();
    assert!(matches!(
        EigenvalueDecomposition::new(&a),
        Err(MathError::NotSquare { rows: 2, cols: 5 })
    ));
}

// =============================================================================
// THREADING
// =============================================================================

#[test]
fn decompositions_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Matrix>();
    assert_send_sync::<CholeskyDecomposition>();
    assert_send_sync::<EigenvalueDecomposition>();
}

#[test]
fn independent_decompositions_run_in_parallel() {
    let inputs: Vec<Matrix> = (1..=4).map(hilbert).collect();
    let sequential: Vec<Vec<f64>> = inputs
        .iter()
        .map(|m| EigenvalueDecomposition::new(m).unwrap().real_eigenvalues().to_vec())
        .collect();

    let parallel: Vec<Vec<f64>> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|m| {
                scope.spawn(move || {
                    EigenvalueDecomposition::new(m)
                        .unwrap()
                        .real_eigenvalues()
                        .to_vec()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}
