//! Dense matrix core.
//!
//! [`Matrix`] is an immutable m×n grid of `f64` backed by [`Array2`], paired
//! with an equality/zero tolerance ε and a per-instance catalog of memoized
//! derived artifacts. Every arithmetic operation returns a new matrix; there
//! is no in-place mutation. All zero and equality tests route through ε —
//! never through exact floating-point comparison.

mod factory;

use std::fmt;
use std::ops::{Index, Range};

use ndarray::{s, Array1, Array2, Axis};

use crate::catalog::Catalog;
use crate::error::{MatrixError, Result};

/// Default equality/zero tolerance.
pub const DEFAULT_EPSILON: f64 = 1e-11;

/// An immutable dense m×n matrix of real numbers.
///
/// The matrix carries its own tolerance ε (default [`DEFAULT_EPSILON`]) used
/// by every comparison, pivot test and singularity check, and a write-once
/// catalog of derived artifacts (transpose, determinant, echelon forms,
/// factorizations) populated on first request.
pub struct Matrix {
    data: Array2<f64>,
    eps: f64,
    catalog: Box<Catalog>,
}

impl Matrix {
    /// Build a matrix from row data, validating that every row has the same
    /// length. Integer and float literals are both accepted.
    pub fn from_rows<T: Into<f64>>(rows: Vec<Vec<T>>) -> Result<Matrix> {
        let m = rows.len();
        let n = rows.first().map_or(0, |r| r.len());
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(MatrixError::InconsistentRowLength {
                    row: i,
                    expected: n,
                    got: row.len(),
                });
            }
        }
        let flat: Vec<f64> = rows
            .into_iter()
            .flatten()
            .map(Into::into)
            .collect();
        let data = Array2::from_shape_vec((m, n), flat).map_err(|_| {
            MatrixError::InvalidParameter {
                what: "row data does not form a rectangular grid",
            }
        })?;
        Ok(Matrix::from_array(data))
    }

    /// Build a matrix from a flat row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, flat: Vec<f64>) -> Result<Matrix> {
        if flat.len() != rows * cols {
            return Err(MatrixError::LengthMismatch {
                op: "from_vec",
                expected: rows * cols,
                got: flat.len(),
            });
        }
        let data = Array2::from_shape_vec((rows, cols), flat).map_err(|_| {
            MatrixError::InvalidParameter {
                what: "flat data does not form a rectangular grid",
            }
        })?;
        Ok(Matrix::from_array(data))
    }

    /// Wrap an existing ndarray grid with the default tolerance.
    pub fn from_array(data: Array2<f64>) -> Matrix {
        Matrix {
            data,
            eps: DEFAULT_EPSILON,
            catalog: Box::default(),
        }
    }

    /// A 1×n matrix holding `v` as its single row.
    pub fn row_vector(v: &Array1<f64>) -> Matrix {
        Matrix::from_array(v.clone().insert_axis(Axis(0)))
    }

    /// An n×1 matrix holding `v` as its single column.
    pub fn column_vector(v: &Array1<f64>) -> Matrix {
        Matrix::from_array(v.clone().insert_axis(Axis(1)))
    }

    /// Replace the tolerance, keeping the data. The returned matrix starts
    /// with an empty catalog since every cached artifact depends on ε.
    pub fn with_epsilon(self, eps: f64) -> Result<Matrix> {
        if !eps.is_finite() || eps <= 0.0 {
            return Err(MatrixError::InvalidParameter {
                what: "epsilon must be finite and > 0",
            });
        }
        Ok(Matrix {
            data: self.data,
            eps,
            catalog: Box::default(),
        })
    }

    /// A new matrix with the given data, inheriting this matrix's tolerance.
    pub(crate) fn derived(&self, data: Array2<f64>) -> Matrix {
        Matrix {
            data,
            eps: self.eps,
            catalog: Box::default(),
        }
    }

    pub(crate) fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub(crate) fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// The tolerance below which a value counts as zero.
    pub fn epsilon(&self) -> f64 {
        self.eps
    }

    /// `true` if `x` is within ε of zero.
    pub fn approx_zero(&self, x: f64) -> bool {
        x.abs() <= self.eps
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    /// (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        (self.data.nrows(), self.data.ncols())
    }

    /// `true` for a 0×0 matrix.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checked element access.
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        if row >= self.nrows() || col >= self.ncols() {
            return Err(MatrixError::OutOfBounds {
                row,
                col,
                rows: self.nrows(),
                cols: self.ncols(),
            });
        }
        Ok(self.data[[row, col]])
    }

    /// Row `i` as a vector.
    pub fn row(&self, i: usize) -> Result<Array1<f64>> {
        if i >= self.nrows() {
            return Err(MatrixError::OutOfBounds {
                row: i,
                col: 0,
                rows: self.nrows(),
                cols: self.ncols(),
            });
        }
        Ok(self.data.row(i).to_owned())
    }

    /// Column `j` as a vector.
    pub fn column(&self, j: usize) -> Result<Array1<f64>> {
        if j >= self.ncols() {
            return Err(MatrixError::OutOfBounds {
                row: 0,
                col: j,
                rows: self.nrows(),
                cols: self.ncols(),
            });
        }
        Ok(self.data.column(j).to_owned())
    }

    /// Elementwise equality within this matrix's tolerance.
    pub fn approx_eq(&self, other: &Matrix) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).abs() <= self.eps)
    }

    /// `true` when row and column counts match.
    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    /// `true` for a square matrix equal to its transpose within ε.
    pub fn is_symmetric(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows();
        for i in 0..n {
            for j in (i + 1)..n {
                if (self.data[[i, j]] - self.data[[j, i]]).abs() > self.eps {
                    return false;
                }
            }
        }
        true
    }

    /// `true` for a square matrix whose off-diagonal entries are all within ε
    /// of zero.
    pub fn is_diagonal(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows();
        for i in 0..n {
            for j in 0..n {
                if i != j && !self.approx_zero(self.data[[i, j]]) {
                    return false;
                }
            }
        }
        true
    }

    /// `true` for a square matrix with only zeros below the diagonal.
    pub fn is_upper_triangular(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows();
        for i in 1..n {
            for j in 0..i {
                if !self.approx_zero(self.data[[i, j]]) {
                    return false;
                }
            }
        }
        true
    }

    /// `true` for a square matrix with only zeros above the diagonal.
    pub fn is_lower_triangular(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows();
        for i in 0..n {
            for j in (i + 1)..n {
                if !self.approx_zero(self.data[[i, j]]) {
                    return false;
                }
            }
        }
        true
    }

    /// Upper- or lower-triangular.
    pub fn is_triangular(&self) -> bool {
        self.is_upper_triangular() || self.is_lower_triangular()
    }

    /// `true` for a square matrix within ε of the identity.
    pub fn is_identity(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows();
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { 1.0 } else { 0.0 };
                if (self.data[[i, j]] - expected).abs() > self.eps {
                    return false;
                }
            }
        }
        true
    }

    /// `true` when every entry is within ε of zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&v| v.abs() <= self.eps)
    }

    /// `true` for a square matrix with `AᵀA = I` within ε.
    pub fn is_orthogonal(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let product = self.data.t().dot(&self.data);
        let n = self.nrows();
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { 1.0 } else { 0.0 };
                if (product[[i, j]] - expected).abs() > self.eps.max(1e-9) {
                    return false;
                }
            }
        }
        true
    }

    /// Transpose, computed once and cached in the catalog.
    pub fn transpose(&self) -> &Matrix {
        self.catalog
            .transpose
            .get_or_insert_with(|| self.derived(self.data.t().to_owned()))
    }

    /// Elementwise sum. Shapes must match.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape("add", other)?;
        Ok(self.derived(&self.data + &other.data))
    }

    /// Elementwise difference. Shapes must match.
    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape("sub", other)?;
        Ok(self.derived(&self.data - &other.data))
    }

    /// Matrix product. `self.ncols()` must equal `other.nrows()`.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        if self.ncols() != other.nrows() {
            return Err(MatrixError::ShapeMismatch {
                op: "matmul",
                left_rows: self.nrows(),
                left_cols: self.ncols(),
                right_rows: other.nrows(),
                right_cols: other.ncols(),
            });
        }
        Ok(self.derived(self.data.dot(&other.data)))
    }

    /// Matrix-vector product. `b.len()` must equal `self.ncols()`.
    pub fn mul_vector(&self, b: &Array1<f64>) -> Result<Array1<f64>> {
        if b.len() != self.ncols() {
            return Err(MatrixError::LengthMismatch {
                op: "mul_vector",
                expected: self.ncols(),
                got: b.len(),
            });
        }
        Ok(self.data.dot(b))
    }

    /// Multiply every entry by `s`.
    pub fn scale(&self, s: f64) -> Matrix {
        self.derived(self.data.mapv(|v| v * s))
    }

    /// Divide every entry by `s`. A divisor within ε of zero is rejected.
    pub fn div_scalar(&self, s: f64) -> Result<Matrix> {
        if self.approx_zero(s) {
            return Err(MatrixError::InvalidParameter {
                what: "scalar divisor is within tolerance of zero",
            });
        }
        Ok(self.derived(self.data.mapv(|v| v / s)))
    }

    /// Elementwise negation.
    pub fn neg(&self) -> Matrix {
        self.derived(self.data.mapv(|v| -v))
    }

    /// Sum of the diagonal. Square matrices only.
    pub fn trace(&self) -> Result<f64> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.nrows(),
                cols: self.ncols(),
            });
        }
        Ok(self.data.diag().sum())
    }

    /// Horizontal concatenation `[self | other]`. Row counts must match.
    pub fn augment(&self, other: &Matrix) -> Result<Matrix> {
        if self.nrows() != other.nrows() {
            return Err(MatrixError::ShapeMismatch {
                op: "augment",
                left_rows: self.nrows(),
                left_cols: self.ncols(),
                right_rows: other.nrows(),
                right_cols: other.ncols(),
            });
        }
        let m = self.nrows();
        let (n1, n2) = (self.ncols(), other.ncols());
        let mut out = Array2::zeros((m, n1 + n2));
        for i in 0..m {
            for j in 0..n1 {
                out[[i, j]] = self.data[[i, j]];
            }
            for j in 0..n2 {
                out[[i, n1 + j]] = other.data[[i, j]];
            }
        }
        Ok(self.derived(out))
    }

    /// Vertical concatenation. Column counts must match.
    pub fn vstack(&self, other: &Matrix) -> Result<Matrix> {
        if self.ncols() != other.ncols() {
            return Err(MatrixError::ShapeMismatch {
                op: "vstack",
                left_rows: self.nrows(),
                left_cols: self.ncols(),
                right_rows: other.nrows(),
                right_cols: other.ncols(),
            });
        }
        let (m1, m2) = (self.nrows(), other.nrows());
        let n = self.ncols();
        let mut out = Array2::zeros((m1 + m2, n));
        for j in 0..n {
            for i in 0..m1 {
                out[[i, j]] = self.data[[i, j]];
            }
            for i in 0..m2 {
                out[[m1 + i, j]] = other.data[[i, j]];
            }
        }
        Ok(self.derived(out))
    }

    /// Copy of the block `rows × cols`.
    pub fn submatrix(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Matrix> {
        if rows.end > self.nrows() || cols.end > self.ncols() {
            return Err(MatrixError::OutOfBounds {
                row: rows.end.saturating_sub(1),
                col: cols.end.saturating_sub(1),
                rows: self.nrows(),
                cols: self.ncols(),
            });
        }
        let block = self.data.slice(s![rows, cols]).to_owned();
        Ok(self.derived(block))
    }

    fn check_same_shape(&self, op: &'static str, other: &Matrix) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(MatrixError::ShapeMismatch {
                op,
                left_rows: self.nrows(),
                left_cols: self.ncols(),
                right_rows: other.nrows(),
                right_cols: other.ncols(),
            });
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[[row, col]]
    }
}

impl Clone for Matrix {
    /// Cloning copies data and tolerance but starts from an empty catalog:
    /// catalogs are bound 1:1 to their owning instance and never shared.
    fn clone(&self) -> Matrix {
        Matrix {
            data: self.data.clone(),
            eps: self.eps,
            catalog: Box::default(),
        }
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("shape", &self.shape())
            .field("epsilon", &self.eps)
            .field("data", &self.data)
            .finish()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.nrows() {
            write!(f, "[")?;
            for j in 0..self.ncols() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.data[[i, j]])?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_rows_rectangular() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(a.shape(), (2, 2));
        assert_eq!(a[(1, 0)], 3.0);
    }

    #[test]
    fn test_from_rows_accepts_integers() {
        let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(a[(0, 1)], 2.0);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(
            err,
            MatrixError::InconsistentRowLength {
                row: 1,
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn test_empty_matrix() {
        let a = Matrix::from_rows(Vec::<Vec<f64>>::new()).unwrap();
        assert!(a.is_empty());
        assert_eq!(a.shape(), (0, 0));
    }

    #[test]
    fn test_with_epsilon_validation() {
        let a = Matrix::from_rows(vec![vec![1.0]]).unwrap();
        assert!(a.clone().with_epsilon(1e-6).is_ok());
        let a2 = Matrix::from_rows(vec![vec![1.0]]).unwrap();
        assert!(a2.with_epsilon(-1.0).is_err());
    }

    #[test]
    fn test_get_out_of_bounds() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
        assert!(a.get(0, 1).is_ok());
        let err = a.get(1, 0).unwrap_err();
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_matmul_known_product() {
        // [[1,2],[3,4]] * [[5,6],[7,8]] = [[19,22],[43,50]]
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(vec![vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();
        let c = a.matmul(&b).unwrap();
        let expected =
            Matrix::from_rows(vec![vec![19.0, 22.0], vec![43.0, 50.0]]).unwrap();
        assert!(c.approx_eq(&expected));
    }

    #[test]
    fn test_matmul_shape_mismatch() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
        let b = Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
        assert!(a.matmul(&b).unwrap_err().is_shape_error());
    }

    #[test]
    fn test_add_sub_roundtrip() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(vec![vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap();
        let sum = a.add(&b).unwrap();
        let back = sum.sub(&b).unwrap();
        assert!(back.approx_eq(&a));
    }

    #[test]
    fn test_transpose_is_cached() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert!(!a.catalog().transpose.has());
        let t = a.transpose();
        assert_eq!(t[(0, 1)], 3.0);
        assert!(a.catalog().transpose.has());
        // Second call returns the same cached artifact.
        let t2 = a.transpose();
        assert!(std::ptr::eq(t, t2));
    }

    #[test]
    fn test_clone_gets_fresh_catalog() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let _ = a.transpose();
        let b = a.clone();
        assert!(!b.catalog().transpose.has());
        assert!(b.approx_eq(&a));
    }

    #[test]
    fn test_trace() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_relative_eq!(a.trace().unwrap(), 5.0);
        let rect = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        assert!(rect.trace().is_err());
    }

    #[test]
    fn test_div_scalar_rejects_zero() {
        let a = Matrix::from_rows(vec![vec![2.0]]).unwrap();
        assert!(a.div_scalar(0.0).is_err());
        let half = a.div_scalar(2.0).unwrap();
        assert_relative_eq!(half[(0, 0)], 1.0);
    }

    #[test]
    fn test_predicates() {
        let diag = Matrix::from_rows(vec![vec![2.0, 0.0], vec![0.0, 3.0]]).unwrap();
        assert!(diag.is_square());
        assert!(diag.is_diagonal());
        assert!(diag.is_symmetric());
        assert!(diag.is_triangular());
        assert!(!diag.is_identity());

        let upper = Matrix::from_rows(vec![vec![1.0, 5.0], vec![0.0, 2.0]]).unwrap();
        assert!(upper.is_upper_triangular());
        assert!(!upper.is_lower_triangular());
        assert!(!upper.is_symmetric());
    }

    #[test]
    fn test_augment_and_submatrix() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let i = Matrix::identity(2);
        let aug = a.augment(&i).unwrap();
        assert_eq!(aug.shape(), (2, 4));
        let right = aug.submatrix(0..2, 2..4).unwrap();
        assert!(right.is_identity());
    }

    #[test]
    fn test_vstack() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
        let b = Matrix::from_rows(vec![vec![3.0, 4.0]]).unwrap();
        let stacked = a.vstack(&b).unwrap();
        assert_eq!(stacked.shape(), (2, 2));
        assert_eq!(stacked[(1, 1)], 4.0);
    }

    #[test]
    fn test_row_column_vector_conversions() {
        let v = ndarray::array![1.0, 2.0, 3.0];
        let row = Matrix::row_vector(&v);
        assert_eq!(row.shape(), (1, 3));
        let col = Matrix::column_vector(&v);
        assert_eq!(col.shape(), (3, 1));
        assert_eq!(col.column(0).unwrap(), v);
        assert_eq!(row.row(0).unwrap(), v);
    }

    #[test]
    fn test_mul_vector() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let x = ndarray::array![1.0, 1.0];
        let y = a.mul_vector(&x).unwrap();
        assert_relative_eq!(y[0], 3.0);
        assert_relative_eq!(y[1], 7.0);
        let too_long = ndarray::array![1.0, 1.0, 1.0];
        assert!(a.mul_vector(&too_long).is_err());
    }
}
