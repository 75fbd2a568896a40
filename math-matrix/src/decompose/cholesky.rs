//! Cholesky factorization for symmetric positive-definite matrices.
//!
//! Factors `A = L·Lᵀ` with `L` lower-triangular. Symmetry is checked up
//! front; positive-definiteness is detected during factorization (a pivot at
//! or below tolerance fails with [`MatrixError::NotPositiveDefinite`] instead
//! of producing a garbage factor).

use ndarray::{Array1, Array2};

use crate::decompose::{back_substitution, forward_substitution};
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

/// Cholesky factorization result: `A = L·Lᵀ`.
#[derive(Debug)]
pub struct CholeskyDecomposition {
    /// Lower-triangular factor.
    pub l: Matrix,
}

impl Matrix {
    /// Cholesky factorization, cached per matrix. Requires a symmetric
    /// positive-definite matrix.
    pub fn cholesky(&self) -> Result<&CholeskyDecomposition> {
        if let Some(f) = self.catalog().cholesky.get() {
            return Ok(f);
        }
        let f = factorize(self)?;
        Ok(self.catalog().cholesky.insert(f))
    }
}

impl CholeskyDecomposition {
    /// The upper-triangular factor `Lᵀ`.
    pub fn lt(&self) -> &Matrix {
        self.l.transpose()
    }

    /// Solve `Ax = b` via `L(Lᵀx) = b`: forward then back substitution.
    pub fn solve(&self, b: &Array1<f64>) -> Result<Array1<f64>> {
        let n = self.l.nrows();
        if b.len() != n {
            return Err(MatrixError::LengthMismatch {
                op: "cholesky solve",
                expected: n,
                got: b.len(),
            });
        }
        let y = forward_substitution(self.l.data(), b, false, self.l.epsilon())?;
        back_substitution(self.lt().data(), &y, self.l.epsilon())
    }
}

fn factorize(a: &Matrix) -> Result<CholeskyDecomposition> {
    if !a.is_square() {
        return Err(MatrixError::NotSquare {
            rows: a.nrows(),
            cols: a.ncols(),
        });
    }
    if !a.is_symmetric() {
        return Err(MatrixError::NotSymmetric);
    }

    let n = a.nrows();
    let eps = a.epsilon();
    let data = a.data();
    let mut l: Array2<f64> = Array2::zeros((n, n));

    for j in 0..n {
        let mut diag = data[[j, j]];
        for k in 0..j {
            diag -= l[[j, k]] * l[[j, k]];
        }
        if diag <= eps {
            return Err(MatrixError::NotPositiveDefinite { index: j });
        }
        l[[j, j]] = diag.sqrt();

        for i in (j + 1)..n {
            let mut sum = data[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = sum / l[[j, j]];
        }
    }

    Ok(CholeskyDecomposition { l: a.derived(l) })
}
