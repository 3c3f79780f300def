//! Eigenvalue decomposition of real square matrices.
//!
//! Symmetric input is tridiagonalised and diagonalised by implicit QL, giving
//! real eigenvalues in ascending order and an orthogonal eigenvector matrix.
//! Anything else is reduced to Hessenberg form and then to real Schur form by
//! double-shift QR, giving a block-diagonal eigenvalue matrix.
//!
//! The routines descend from JAMA and EISPACK.

mod nonsymmetric;
mod symmetric;

use log::debug;
use nalgebra::Complex;

use crate::error::{MathError, MathResult};
use crate::linear_algebra::Matrix;

/// IEEE double precision machine epsilon, `2^-52`.
pub const MACHINE_EPSILON: f64 = 2.220_446_049_250_313e-16;

/// Configuration for the iterative eigenvalue phases.
///
/// By default there is no iteration limit: the QL and QR phases rely on their
/// convergence behaviour and the exceptional shifts at iterations 10 and 30.
/// Setting a limit turns a stalled eigenvalue into
/// [`MathError::ConvergenceFailed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EigenConfig {
    /// Maximum iterations spent on any single eigenvalue (or pair).
    pub max_iterations: Option<u32>,
}

impl EigenConfig {
    /// Creates a configuration with no iteration limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-eigenvalue iteration limit.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Removes the iteration limit.
    #[must_use]
    pub fn without_iteration_limit(mut self) -> Self {
        self.max_iterations = None;
        self
    }
}

/// Eigenvalues and eigenvectors of a real square matrix.
///
/// If `A` is symmetric then `A = V * D * Vᵀ`, where `D` is diagonal and `V`
/// is orthogonal.
///
/// Otherwise `D` is block diagonal, with real eigenvalues in 1x1 blocks and
/// each complex pair `λ ± iμ` in a 2x2 block `[λ, μ; -μ, λ]`. The columns of
/// `V` are eigenvectors in the sense `A * V = V * D`. `V` may be badly
/// conditioned or even singular.
///
/// # Example
///
/// ```rust
/// use tessera_math::linear_algebra::{EigenvalueDecomposition, Matrix};
///
/// let a = Matrix::from_rows(&[&[0.0, -1.0], &[1.0, 0.0]]).unwrap();
/// let eig = EigenvalueDecomposition::new(&a).unwrap();
///
/// assert_eq!(eig.real_eigenvalues(), &[0.0, 0.0]);
/// assert_eq!(eig.imag_eigenvalues(), &[1.0, -1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct EigenvalueDecomposition {
    v: Matrix,
    d: Vec<f64>,
    e: Vec<f64>,
    symmetric: bool,
}

impl EigenvalueDecomposition {
    /// Decomposes a square matrix with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::NotSquare`] if `a` is not square.
    pub fn new(a: &Matrix) -> MathResult<Self> {
        Self::with_config(a, &EigenConfig::default())
    }

    /// Decomposes a square matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::NotSquare`] if `a` is not square, and
    /// [`MathError::ConvergenceFailed`] if `config` sets an iteration limit
    /// that is exceeded.
    pub fn with_config(a: &Matrix, config: &EigenConfig) -> MathResult<Self> {
        if !a.is_square() {
            return Err(MathError::not_square(a.rows(), a.cols()));
        }

        let n = a.rows();
        let mut d = vec![0.0; n];
        let mut e = vec![0.0; n];
        let symmetric = a.is_symmetric();

        let v = if symmetric {
            debug!("Eigen: {n}x{n} symmetric input, tridiagonal QL");
            let mut v = a.clone();
            symmetric::tridiagonalize(&mut v, &mut d, &mut e);
            symmetric::diagonalize(&mut v, &mut d, &mut e, config)?;
            v
        } else {
            debug!("Eigen: {n}x{n} nonsymmetric input, Hessenberg QR");
            let mut v = Matrix::new(n, n)?;
            nonsymmetric::decompose(a, &mut v, &mut d, &mut e, config)?;
            v
        };

        Ok(Self { v, d, e, symmetric })
    }

    /// Returns true if the input was exactly symmetric.
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Dimension of the decomposed matrix.
    pub fn dimension(&self) -> usize {
        self.d.len()
    }

    /// The eigenvector matrix.
    pub fn v(&self) -> &Matrix {
        &self.v
    }

    /// A copy of the eigenvector matrix.
    pub fn get_v(&self) -> Matrix {
        self.v.clone()
    }

    /// Real parts of the eigenvalues.
    pub fn real_eigenvalues(&self) -> &[f64] {
        &self.d
    }

    /// Imaginary parts of the eigenvalues.
    ///
    /// Nonzero exactly for complex pairs, with `e[i] > 0` followed by
    /// `e[i + 1] < 0`.
    pub fn imag_eigenvalues(&self) -> &[f64] {
        &self.e
    }

    /// Eigenvalues as complex numbers.
    pub fn eigenvalues(&self) -> Vec<Complex<f64>> {
        self.d
            .iter()
            .zip(&self.e)
            .map(|(&re, &im)| Complex::new(re, im))
            .collect()
    }

    /// The block diagonal eigenvalue matrix.
    pub fn get_d(&self) -> Matrix {
        let n = self.dimension();
        let mut out = Matrix::from_parts(n, n, vec![0.0; n * n]);
        for i in 0..n {
            out[(i, i)] = self.d[i];
            if self.e[i] > 0.0 && i + 1 < n {
                out[(i, i + 1)] = self.e[i];
            } else if self.e[i] < 0.0 && i > 0 {
                out[(i, i - 1)] = self.e[i];
            }
        }
        out
    }
}
