//! Cholesky decomposition of symmetric matrices.

use log::debug;

use crate::error::{MathError, MathResult};
use crate::linear_algebra::Matrix;

/// Cholesky decomposition `A = L * Lᵀ`.
///
/// `L` is lower triangular. If `A` is not symmetric positive definite the
/// decomposition still completes: diagonal terms that would need the square
/// root of a non-positive number are clamped to zero, the result is a partial
/// factor, and [`is_spd`](Self::is_spd) reports `false`. The failure only
/// surfaces when the factor is used to solve a system.
///
/// # Example
///
/// ```rust
/// use tessera_math::linear_algebra::{CholeskyDecomposition, Matrix};
///
/// let a = Matrix::from_rows(&[
///     &[4.0, 12.0, -16.0],
///     &[12.0, 37.0, -43.0],
///     &[-16.0, -43.0, 98.0],
/// ])
/// .unwrap();
///
/// let chol = CholeskyDecomposition::new(&a).unwrap();
/// assert!(chol.is_spd());
/// assert_eq!(chol.l().row(2), &[-8.0, 5.0, 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition {
    l: Matrix,
    is_spd: bool,
}

impl CholeskyDecomposition {
    /// Factors a square matrix.
    ///
    /// Symmetry is checked on the fly with exact comparisons of the mirrored
    /// entries; only the lower triangle of `a` feeds the factor.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::NotSquare`] if `a` is not square. A matrix that is
    /// not SPD is not an error here.
    pub fn new(a: &Matrix) -> MathResult<Self> {
        if !a.is_square() {
            return Err(MathError::not_square(a.rows(), a.cols()));
        }

        let n = a.rows();
        let mut l = Matrix::new(n, n)?;
        let mut is_spd = true;

        for j in 0..n {
            let mut d = 0.0;
            for k in 0..j {
                let mut s = 0.0;
                for i in 0..k {
                    s += l[(k, i)] * l[(j, i)];
                }
                s = (a[(j, k)] - s) / l[(k, k)];
                l[(j, k)] = s;
                d += s * s;
                is_spd &= a[(k, j)] == a[(j, k)];
            }
            d = a[(j, j)] - d;
            is_spd &= d > 0.0;
            l[(j, j)] = d.max(0.0).sqrt();
        }

        if !is_spd {
            debug!("Cholesky: {n}x{n} input is not symmetric positive definite");
        }

        Ok(Self { l, is_spd })
    }

    /// Returns true if the input was symmetric positive definite.
    pub fn is_spd(&self) -> bool {
        self.is_spd
    }

    /// The lower-triangular factor.
    pub fn l(&self) -> &Matrix {
        &self.l
    }

    /// A copy of the lower-triangular factor.
    pub fn get_l(&self) -> Matrix {
        self.l.clone()
    }

    /// Dimension of the factored matrix.
    pub fn dimension(&self) -> usize {
        self.l.rows()
    }

    /// Solves `A * X = B`.
    ///
    /// Runs forward substitution `L * Y = B` followed by back substitution
    /// `Lᵀ * X = Y`, one right-hand-side column at a time. `b` is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// - [`MathError::DimensionMismatch`] if `b` does not have `n` rows.
    /// - [`MathError::NotPositiveDefinite`] if the input was not SPD.
    pub fn solve(&self, b: &Matrix) -> MathResult<Matrix> {
        let n = self.dimension();
        if b.rows() != n {
            return Err(MathError::dimension_mismatch((n, n), b.shape()));
        }
        if !self.is_spd {
            return Err(MathError::NotPositiveDefinite);
        }

        let l = &self.l;
        let nx = b.cols();
        let mut x = b.clone();

        // Solve L * Y = B
        for k in 0..n {
            for j in 0..nx {
                let mut sum = x[(k, j)];
                for i in 0..k {
                    sum -= x[(i, j)] * l[(k, i)];
                }
                x[(k, j)] = sum / l[(k, k)];
            }
        }

        // Solve L' * X = Y
        for k in (0..n).rev() {
            for j in 0..nx {
                let mut sum = x[(k, j)];
                for i in k + 1..n {
                    sum -= x[(i, j)] * l[(i, k)];
                }
                x[(k, j)] = sum / l[(k, k)];
            }
        }

        Ok(x)
    }

    /// Solves `A * x = b` for a single right-hand side.
    pub fn solve_vector(&self, b: &[f64]) -> MathResult<Vec<f64>> {
        let n = self.dimension();
        if b.len() != n {
            return Err(MathError::dimension_mismatch((n, n), (b.len(), 1)));
        }
        let rhs = Matrix::from_row_slice(n, 1, b)?;
        Ok(self.solve(&rhs)?.into_vec())
    }

    /// Inverse of the factored matrix, `A⁻¹ = solve(I)`.
    pub fn inverse(&self) -> MathResult<Matrix> {
        self.solve(&Matrix::identity(self.dimension())?)
    }

    /// Determinant of the factored matrix, `Π L[i][i]²`.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::NotPositiveDefinite`] if the input was not SPD.
    pub fn determinant(&self) -> MathResult<f64> {
        if !self.is_spd {
            return Err(MathError::NotPositiveDefinite);
        }
        Ok(self.l.diagonal().iter().map(|x| x * x).product())
    }
}
