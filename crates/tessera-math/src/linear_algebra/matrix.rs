//! Dense row-major matrix storage.

use std::fmt;
use std::ops::{Index, IndexMut};

use nalgebra::DMatrix;
use ndarray::Array2;

use crate::error::{MathError, MathResult};
use crate::linear_algebra::{CholeskyDecomposition, EigenvalueDecomposition};

/// A dense matrix of `f64` stored as a single row-major buffer.
///
/// Element `(i, j)` lives at offset `i * cols + j` (see [`Matrix::address`]).
/// The shape is fixed at construction and both dimensions are at least 1.
///
/// Indexing with `matrix[(i, j)]` checks row and column bounds with
/// `debug_assert!` in debug builds. Release builds only get the buffer's own
/// bounds check, so an out-of-range column that still lands inside the buffer
/// silently addresses the wrong element. Keeping indices in range is the
/// caller's responsibility.
///
/// # Example
///
/// ```rust
/// use tessera_math::linear_algebra::Matrix;
///
/// let a = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]).unwrap();
/// assert_eq!(a[(1, 0)], 3.0);
/// assert_eq!(a.address(1, 0), 2);
///
/// let at = a.transpose();
/// assert_eq!(at[(0, 1)], 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

fn check_shape(rows: usize, cols: usize) -> MathResult<()> {
    if rows == 0 || cols == 0 {
        return Err(MathError::InvalidDimensions { rows, cols });
    }
    Ok(())
}

impl Matrix {
    /// Creates a zero-filled matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::InvalidDimensions`] if either dimension is zero.
    pub fn new(rows: usize, cols: usize) -> MathResult<Self> {
        check_shape(rows, cols)?;
        Ok(Self::from_parts(rows, cols, vec![0.0; rows * cols]))
    }

    /// Alias for [`Matrix::new`].
    pub fn zeros(rows: usize, cols: usize) -> MathResult<Self> {
        Self::new(rows, cols)
    }

    /// Creates a matrix that takes ownership of a row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or if
    /// `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> MathResult<Self> {
        check_shape(rows, cols)?;
        if data.len() != rows * cols {
            return Err(MathError::DataLength {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self::from_parts(rows, cols, data))
    }

    /// Creates a matrix by copying a row-major slice.
    pub fn from_row_slice(rows: usize, cols: usize, data: &[f64]) -> MathResult<Self> {
        Self::from_vec(rows, cols, data.to_vec())
    }

    /// Creates a matrix from a slice of equally sized rows.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::InvalidDimensions`] for an empty input and
    /// [`MathError::DataLength`] when the rows are ragged.
    pub fn from_rows(rows: &[&[f64]]) -> MathResult<Self> {
        let n = rows.len();
        let m = rows.first().map_or(0, |row| row.len());
        check_shape(n, m)?;

        if rows.iter().any(|row| row.len() != m) {
            return Err(MathError::DataLength {
                expected: n * m,
                actual: rows.iter().map(|row| row.len()).sum(),
            });
        }

        let data = rows.iter().flat_map(|row| row.iter().copied()).collect();
        Ok(Self::from_parts(n, m, data))
    }

    /// Creates the `n x n` identity matrix.
    pub fn identity(n: usize) -> MathResult<Self> {
        let mut m = Self::new(n, n)?;
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        Ok(m)
    }

    /// Creates a square matrix with the given diagonal.
    pub fn from_diagonal(diagonal: &[f64]) -> MathResult<Self> {
        let n = diagonal.len();
        let mut m = Self::new(n, n)?;
        for (i, &value) in diagonal.iter().enumerate() {
            m[(i, i)] = value;
        }
        Ok(m)
    }

    /// Builds a matrix whose shape is already known to be valid.
    pub(crate) fn from_parts(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert!(rows > 0 && cols > 0, "empty matrix {rows}x{cols}");
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns true if the matrix has as many rows as columns.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Offset of element `(i, j)` in the row-major buffer: `i * cols + j`.
    ///
    /// No bounds check is performed; callers must pass `i < rows` and
    /// `j < cols`.
    #[inline]
    pub fn address(&self, i: usize, j: usize) -> usize {
        i * self.cols + j
    }

    /// Returns element `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self[(i, j)]
    }

    /// Sets element `(i, j)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self[(i, j)] = value;
    }

    /// The underlying row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consumes the matrix and returns its row-major buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        debug_assert!(i < self.rows, "row {i} out of bounds ({})", self.rows);
        let start = self.address(i, 0);
        &self.data[start..start + self.cols]
    }

    /// Column `j` copied into a vector.
    pub fn column(&self, j: usize) -> Vec<f64> {
        (0..self.rows).map(|i| self[(i, j)]).collect()
    }

    /// Main diagonal copied into a vector.
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.rows.min(self.cols)).map(|i| self[(i, i)]).collect()
    }

    /// Exact symmetry test: `A[i][j] == A[j][i]` for every pair.
    ///
    /// No tolerance is applied. Non-square matrices are never symmetric.
    pub fn is_symmetric(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        for i in 0..self.rows {
            for j in 0..i {
                if self[(i, j)] != self[(j, i)] {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the transpose.
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self[(i, j)]);
            }
        }
        Self::from_parts(self.cols, self.rows, data)
    }

    /// Matrix product `self * other`.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::DimensionMismatch`] if `self.cols() != other.rows()`.
    pub fn multiply(&self, other: &Matrix) -> MathResult<Matrix> {
        if self.cols != other.rows {
            return Err(MathError::dimension_mismatch(self.shape(), other.shape()));
        }

        let mut out = Self::from_parts(self.rows, other.cols, vec![0.0; self.rows * other.cols]);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self[(i, k)] * other[(k, j)];
                }
                out[(i, j)] = sum;
            }
        }
        Ok(out)
    }

    /// Element-wise difference `self - other`.
    pub fn sub(&self, other: &Matrix) -> MathResult<Matrix> {
        if self.shape() != other.shape() {
            return Err(MathError::dimension_mismatch(self.shape(), other.shape()));
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a - b)
            .collect();
        Ok(Self::from_parts(self.rows, self.cols, data))
    }

    /// Multiplies every element by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        let data = self.data.iter().map(|x| x * factor).collect();
        Self::from_parts(self.rows, self.cols, data)
    }

    /// Largest absolute element.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
    }

    /// Frobenius norm.
    pub fn frobenius_norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Cholesky decomposition of this matrix.
    pub fn cholesky(&self) -> MathResult<CholeskyDecomposition> {
        CholeskyDecomposition::new(self)
    }

    /// Eigenvalue decomposition of this matrix.
    pub fn eigen(&self) -> MathResult<EigenvalueDecomposition> {
        EigenvalueDecomposition::new(self)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        debug_assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.data[self.address(i, j)]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        debug_assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        let offset = self.address(i, j);
        &mut self.data[offset]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            let row = self.row(i);
            write!(f, "[")?;
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{value}")?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

impl TryFrom<&DMatrix<f64>> for Matrix {
    type Error = MathError;

    fn try_from(m: &DMatrix<f64>) -> MathResult<Self> {
        let (rows, cols) = (m.nrows(), m.ncols());
        check_shape(rows, cols)?;
        let mut out = Self::from_parts(rows, cols, vec![0.0; rows * cols]);
        for i in 0..rows {
            for j in 0..cols {
                out[(i, j)] = m[(i, j)];
            }
        }
        Ok(out)
    }
}

impl From<&Matrix> for DMatrix<f64> {
    fn from(m: &Matrix) -> Self {
        DMatrix::from_row_slice(m.rows, m.cols, &m.data)
    }
}

impl TryFrom<&Array2<f64>> for Matrix {
    type Error = MathError;

    fn try_from(a: &Array2<f64>) -> MathResult<Self> {
        let (rows, cols) = a.dim();
        check_shape(rows, cols)?;
        // Logical iteration order is row-major whatever the memory layout.
        Ok(Self::from_parts(rows, cols, a.iter().copied().collect()))
    }
}

impl From<&Matrix> for Array2<f64> {
    fn from(m: &Matrix) -> Self {
        Array2::from_shape_fn((m.rows, m.cols), |(i, j)| m[(i, j)])
    }
}
