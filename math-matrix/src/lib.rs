//! Dense numeric matrix algebra engine.
//!
//! This crate provides an immutable dense matrix type with tolerance-based
//! comparison, Gaussian-elimination reduction, the classic factorizations,
//! a strategy-picking linear solver and real eigenvalue extraction.
//!
//! # Features
//!
//! - **Matrix core**: immutable m×n grid over `f64` with a per-matrix
//!   zero/equality tolerance ε
//! - **Derived-artifact catalog**: transpose, determinant, inverse, echelon
//!   forms and factorizations are each computed once and memoized
//! - **Reduction**: REF with partial pivoting and swap counting, RREF
//! - **Factorizations**: LU (Doolittle with pivoting), QR (Householder),
//!   Cholesky, Crout and a one-sided Jacobi SVD, each with a specialized
//!   `solve`
//! - **Solver dispatch**: explicit strategy or a default that reuses
//!   whatever is already cached, falling back LU → QR → RREF augmentation
//! - **Eigenvalues**: triangular shortcut, closed-form characteristic
//!   polynomial below 5×5, Jacobi rotations for symmetric matrices
//!
//! # Example
//!
//! ```
//! use math_matrix::Matrix;
//! use ndarray::array;
//!
//! let a = Matrix::from_rows(vec![vec![4.0, 7.0], vec![2.0, 6.0]])?;
//! let x = a.solve(&array![1.0, 0.0])?;
//! assert!((x[0] - 0.6).abs() < 1e-10);
//! assert!((x[1] + 0.2).abs() < 1e-10);
//! # Ok::<(), math_matrix::MatrixError>(())
//! ```

mod analysis;
mod catalog;
mod decompose;
mod eigen;
mod error;
mod matrix;
mod reduce;
mod solve;

pub use decompose::{
    CholeskyDecomposition, CroutDecomposition, LuDecomposition, QrDecomposition, SvdDecomposition,
};
pub use eigen::EigenMethod;
pub use error::{MatrixError, Result};
pub use matrix::{Matrix, DEFAULT_EPSILON};
pub use reduce::RowEchelon;
pub use solve::SolveMethod;
