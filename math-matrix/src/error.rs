//! Error types for dense matrix operations.
//!
//! This module provides structured error handling for matrix construction,
//! arithmetic, factorization and solving, following the Microsoft Rust
//! Guidelines pattern of using `thiserror` for library error types with
//! helper methods for error categorization.

use thiserror::Error;

/// Errors that can occur during matrix operations.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// Row data passed to a constructor is not rectangular.
    #[error("inconsistent row length at row {row}: expected {expected}, got {got}")]
    InconsistentRowLength {
        /// Index of the offending row
        row: usize,
        /// Expected number of columns
        expected: usize,
        /// Actual number of columns
        got: usize,
    },

    /// Two matrix operands have incompatible shapes.
    #[error("shape mismatch in {op}: left is {left_rows}x{left_cols}, right is {right_rows}x{right_cols}")]
    ShapeMismatch {
        /// The operation that was attempted
        op: &'static str,
        /// Rows of the left operand
        left_rows: usize,
        /// Columns of the left operand
        left_cols: usize,
        /// Rows of the right operand
        right_rows: usize,
        /// Columns of the right operand
        right_cols: usize,
    },

    /// A vector operand has the wrong length for the matrix it is paired with.
    #[error("length mismatch in {op}: expected {expected} elements, got {got}")]
    LengthMismatch {
        /// The operation that was attempted
        op: &'static str,
        /// Expected vector length
        expected: usize,
        /// Actual vector length
        got: usize,
    },

    /// A square matrix is required (trace, determinant, inverse, eigenvalues, LU).
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// The matrix is singular (determinant within tolerance of zero), so it
    /// has no inverse and inverse-based solving is impossible.
    #[error("matrix is singular, not invertible")]
    Singular,

    /// Elimination or substitution hit a pivot within tolerance of zero.
    #[error("zero pivot encountered in column {column}")]
    ZeroPivot {
        /// Column index of the degenerate pivot
        column: usize,
    },

    /// A symmetric matrix is required (Cholesky, Jacobi eigenvalues).
    #[error("matrix is not symmetric")]
    NotSymmetric,

    /// Cholesky factorization requires a positive-definite matrix.
    #[error("matrix is not positive-definite (failed at pivot {index})")]
    NotPositiveDefinite {
        /// Index of the non-positive pivot
        index: usize,
    },

    /// A row/column index lies beyond the matrix extent.
    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    OutOfBounds {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// A scalar or configuration parameter is invalid.
    #[error("invalid parameter: {what}")]
    InvalidParameter {
        /// Description of the violated constraint
        what: &'static str,
    },

    /// No eigenvalue algorithm applies to this matrix.
    #[error("cannot compute eigenvalues: {reason}")]
    EigenUnsupported {
        /// Why the computation is not possible
        reason: &'static str,
    },
}

/// A specialized `Result` type for matrix operations.
pub type Result<T> = std::result::Result<T, MatrixError>;

impl MatrixError {
    /// Returns `true` if this error is about operand shapes or indices.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            MatrixError::InconsistentRowLength { .. }
                | MatrixError::ShapeMismatch { .. }
                | MatrixError::LengthMismatch { .. }
                | MatrixError::NotSquare { .. }
                | MatrixError::OutOfBounds { .. }
        )
    }

    /// Returns `true` if this error reports a singular or degenerate matrix.
    pub fn is_singularity_error(&self) -> bool {
        matches!(
            self,
            MatrixError::Singular
                | MatrixError::ZeroPivot { .. }
                | MatrixError::NotPositiveDefinite { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MatrixError::NotSquare { rows: 2, cols: 3 };
        assert_eq!(err.to_string(), "matrix is not square: 2x3");
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = MatrixError::ShapeMismatch {
            op: "matmul",
            left_rows: 2,
            left_cols: 3,
            right_rows: 4,
            right_cols: 2,
        };
        assert!(err.to_string().contains("matmul"));
        assert!(err.to_string().contains("2x3"));
        assert!(err.to_string().contains("4x2"));
    }

    #[test]
    fn test_is_shape_error() {
        let shape_err = MatrixError::NotSquare { rows: 1, cols: 2 };
        let singular_err = MatrixError::Singular;

        assert!(shape_err.is_shape_error());
        assert!(!singular_err.is_shape_error());
    }

    #[test]
    fn test_is_singularity_error() {
        let pivot_err = MatrixError::ZeroPivot { column: 0 };
        let bounds_err = MatrixError::OutOfBounds {
            row: 5,
            col: 0,
            rows: 2,
            cols: 2,
        };

        assert!(pivot_err.is_singularity_error());
        assert!(!bounds_err.is_singularity_error());
    }
}
