//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during mathematical operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// A matrix was requested with a zero dimension.
    #[error("Invalid matrix dimensions: {rows}x{cols} (both must be at least 1)")]
    InvalidDimensions {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },

    /// Supplied buffer does not match the requested shape.
    #[error("Data length mismatch: expected {expected} elements, got {actual}")]
    DataLength {
        /// Number of elements implied by the shape.
        expected: usize,
        /// Number of elements supplied.
        actual: usize,
    },

    /// Operation requires a square matrix.
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Rows in the matrix.
        rows: usize,
        /// Columns in the matrix.
        cols: usize,
    },

    /// Matrix dimensions are incompatible.
    #[error("Incompatible matrix dimensions: ({rows1}x{cols1}) and ({rows2}x{cols2})")]
    DimensionMismatch {
        /// Rows in first matrix.
        rows1: usize,
        /// Columns in first matrix.
        cols1: usize,
        /// Rows in second matrix.
        rows2: usize,
        /// Columns in second matrix.
        cols2: usize,
    },

    /// Matrix is not symmetric positive definite.
    #[error("Matrix is not symmetric positive definite")]
    NotPositiveDefinite,

    /// Iterative algorithm failed to converge.
    #[error("Convergence failed after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// Final residual value.
        residual: f64,
    },
}

impl MathError {
    /// Creates a convergence failed error.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Creates a not-square error for the given shape.
    #[must_use]
    pub fn not_square(rows: usize, cols: usize) -> Self {
        Self::NotSquare { rows, cols }
    }

    /// Creates a dimension mismatch error from two shapes.
    #[must_use]
    pub fn dimension_mismatch(lhs: (usize, usize), rhs: (usize, usize)) -> Self {
        Self::DimensionMismatch {
            rows1: lhs.0,
            cols1: lhs.1,
            rows2: rhs.0,
            cols2: rhs.1,
        }
    }
}
