//! Linear algebra utilities.
//!
//! This module provides the dense matrix type and the decompositions
//! needed by pricing and term-structure code:
//!
//! - [`Matrix`]: row-major dense storage with `(i, j)` addressing
//! - [`CholeskyDecomposition`]: `A = L * Lᵀ` with linear-system solving
//! - [`EigenvalueDecomposition`]: eigenvalues and eigenvectors of real
//!   square matrices, symmetric or not
//!
//! All work happens when a decomposition is constructed; afterwards it is an
//! immutable value that can be queried or shared freely.
//!
//! # Example: Correlation Matrix
//!
//! ```rust
//! use tessera_math::linear_algebra::{Matrix, EigenvalueDecomposition};
//!
//! let corr = Matrix::from_rows(&[
//!     &[1.0, 0.8, 0.3],
//!     &[0.8, 1.0, 0.5],
//!     &[0.3, 0.5, 1.0],
//! ])
//! .unwrap();
//!
//! // A valid correlation matrix factors...
//! let chol = corr.cholesky().unwrap();
//! assert!(chol.is_spd());
//!
//! // ...and has non-negative eigenvalues summing to its dimension.
//! let eig = EigenvalueDecomposition::new(&corr).unwrap();
//! let total: f64 = eig.real_eigenvalues().iter().sum();
//! assert!((total - 3.0).abs() < 1e-12);
//! assert!(eig.real_eigenvalues()[0] > 0.0);
//! ```

mod cholesky;
mod complex;
mod eigen;
mod matrix;

pub use cholesky::CholeskyDecomposition;
pub use eigen::{EigenConfig, EigenvalueDecomposition, MACHINE_EPSILON};
pub use matrix::Matrix;
