//! Determinant, inverse, singularity and rank.
//!
//! Small matrices use closed forms (1×1 through 3×3 for the determinant,
//! 1×1 and 2×2 for the inverse); larger matrices route through the reduction
//! engine: `det = (−1)^swaps · Π diag(REF)` and the inverse is read off the
//! RREF of `[A | I]`. Determinant and inverse are memoized per matrix.

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

impl Matrix {
    /// Determinant. Square matrices only — a non-square determinant is
    /// always an error, never a default value.
    pub fn det(&self) -> Result<f64> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.nrows(),
                cols: self.ncols(),
            });
        }
        if let Some(d) = self.catalog().determinant.get() {
            return Ok(*d);
        }

        let d = match self.nrows() {
            // Empty product convention.
            0 => 1.0,
            1 => self[(0, 0)],
            2 => self[(0, 0)] * self[(1, 1)] - self[(0, 1)] * self[(1, 0)],
            3 => {
                let a = self.data();
                a[[0, 0]] * (a[[1, 1]] * a[[2, 2]] - a[[1, 2]] * a[[2, 1]])
                    - a[[0, 1]] * (a[[1, 0]] * a[[2, 2]] - a[[1, 2]] * a[[2, 0]])
                    + a[[0, 2]] * (a[[1, 0]] * a[[2, 1]] - a[[1, 1]] * a[[2, 0]])
            }
            n => {
                let echelon = self.row_echelon();
                let mut product = 1.0;
                for i in 0..n {
                    product *= echelon.matrix[(i, i)];
                }
                if echelon.row_swaps % 2 == 1 {
                    -product
                } else {
                    product
                }
            }
        };
        Ok(*self.catalog().determinant.insert(d))
    }

    /// `true` when |det| is within ε of zero.
    pub fn is_singular(&self) -> Result<bool> {
        Ok(self.det()?.abs() <= self.epsilon())
    }

    /// `true` when |det| exceeds ε.
    pub fn is_nonsingular(&self) -> Result<bool> {
        Ok(!self.is_singular()?)
    }

    /// Alias for [`Matrix::is_nonsingular`].
    pub fn is_invertible(&self) -> Result<bool> {
        self.is_nonsingular()
    }

    /// Inverse, memoized per matrix. Requires a square, nonsingular matrix.
    pub fn inverse(&self) -> Result<&Matrix> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.nrows(),
                cols: self.ncols(),
            });
        }
        if let Some(inv) = self.catalog().inverse.get() {
            return Ok(inv);
        }
        if self.is_singular()? {
            return Err(MatrixError::Singular);
        }

        let n = self.nrows();
        let inv = match n {
            0 => self.derived(self.data().clone()),
            1 => self.derived(self.data().mapv(|v| 1.0 / v)),
            2 => {
                // Adjugate over determinant.
                let det = self.det()?;
                let a = self.data();
                let data = ndarray::array![
                    [a[[1, 1]] / det, -a[[0, 1]] / det],
                    [-a[[1, 0]] / det, a[[0, 0]] / det],
                ];
                self.derived(data)
            }
            _ => {
                // RREF of [A | I]; the right block is A⁻¹.
                let augmented = self.augment(&Matrix::identity(n))?;
                let reduced = augmented.rref();
                reduced.submatrix(0..n, n..2 * n)?
            }
        };
        Ok(self.catalog().inverse.insert(inv))
    }

    /// Number of pivot rows in the RREF. Always ≤ min(m, n); the zero
    /// matrix has rank 0.
    pub fn rank(&self) -> usize {
        self.rref()
            .pivot_columns()
            .iter()
            .filter(|p| p.is_some())
            .count()
    }
}
