//! # Tessera Math
//!
//! Mathematical utilities for the Tessera quantitative finance library.
//!
//! This crate provides:
//!
//! - **Matrix**: Dense row-major matrix storage
//! - **Cholesky**: Factorisation of symmetric positive definite matrices
//! - **Eigen**: Eigenvalues and eigenvectors of real square matrices
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: The same input always gives bit-identical output
//! - **Numerical Stability**: Scaled Householder reductions, Smith complex
//!   division and overflow control in back substitution
//! - **Explicit Errors**: Shape problems are rejected up front; numerical
//!   validity is reported separately

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]
#![allow(clippy::needless_range_loop)]

pub mod error;
pub mod linear_algebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::linear_algebra::{
        CholeskyDecomposition, EigenConfig, EigenvalueDecomposition, Matrix,
    };
}

pub use error::{MathError, MathResult};
