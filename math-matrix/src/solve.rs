//! Linear-system solve dispatcher.
//!
//! `solve` picks among the factorization-backed strategies. Explicit methods
//! always use (and cache) the corresponding decomposition; the default
//! strategy reuses whatever the catalog already holds before computing
//! anything new, then falls back LU → QR → RREF augmentation. The fallback
//! chain is an internal retry policy: if no strategy succeeds the final
//! error is raised, nothing is swallowed.

use ndarray::Array1;

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

/// Strategy for solving `Ax = b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolveMethod {
    /// Doolittle LU with partial pivoting.
    Lu,
    /// Householder QR.
    Qr,
    /// Multiply by the (possibly cached) inverse.
    Inverse,
    /// Gauss-Jordan on the augmented matrix `[A | b]`.
    Rref,
    /// Reuse cached artifacts, then LU → QR → RREF augmentation.
    #[default]
    Auto,
}

impl Matrix {
    /// Solve `Ax = b` with the default strategy ([`SolveMethod::Auto`]).
    pub fn solve(&self, b: &Array1<f64>) -> Result<Array1<f64>> {
        self.solve_with(b, SolveMethod::Auto)
    }

    /// Solve `Ax = b` with an explicit strategy.
    pub fn solve_with(&self, b: &Array1<f64>, method: SolveMethod) -> Result<Array1<f64>> {
        if b.len() != self.nrows() {
            return Err(MatrixError::LengthMismatch {
                op: "solve",
                expected: self.nrows(),
                got: b.len(),
            });
        }
        match method {
            SolveMethod::Lu => self.lu()?.solve(b),
            SolveMethod::Qr => self.qr()?.solve(b),
            SolveMethod::Inverse => self.inverse()?.mul_vector(b),
            SolveMethod::Rref => self.solve_by_augmentation(b),
            SolveMethod::Auto => self.solve_auto(b),
        }
    }

    /// Default priority order: cached inverse, 2×2 closed form, cached RREF,
    /// LU, QR, RREF augmentation.
    fn solve_auto(&self, b: &Array1<f64>) -> Result<Array1<f64>> {
        // 1. An already-computed inverse is the cheapest route.
        if self.catalog().inverse.has() {
            log::debug!("solve: reusing cached inverse");
            return self.solve_with(b, SolveMethod::Inverse);
        }

        // 2. For 2×2 the closed-form inverse is immediate.
        if self.shape() == (2, 2) {
            match self.inverse() {
                Ok(inv) => {
                    log::debug!("solve: 2x2 closed-form inverse");
                    return inv.mul_vector(b);
                }
                Err(MatrixError::Singular) => {}
                Err(e) => return Err(e),
            }
        }

        // 3. A cached RREF means the inverse route has already paid most of
        //    its cost.
        if self.is_square() && self.catalog().rref.has() {
            match self.inverse() {
                Ok(inv) => {
                    log::debug!("solve: inverse via cached rref");
                    return inv.mul_vector(b);
                }
                Err(MatrixError::Singular) => {}
                Err(e) => return Err(e),
            }
        }

        // 4. LU, then QR when LU hits a degenerate pivot.
        if self.is_square() {
            match self.lu().and_then(|f| f.solve(b)) {
                Ok(x) => {
                    log::debug!("solve: lu");
                    return Ok(x);
                }
                Err(e) if e.is_singularity_error() => {
                    log::debug!("solve: lu degenerate, trying qr");
                }
                Err(e) => return Err(e),
            }
            match self.qr().and_then(|f| f.solve(b)) {
                Ok(x) => {
                    log::debug!("solve: qr");
                    return Ok(x);
                }
                Err(e) if e.is_singularity_error() => {
                    log::debug!("solve: qr degenerate, trying rref augmentation");
                }
                Err(e) => return Err(e),
            }
        }

        // 5. Last resort, also the only route for singular systems.
        self.solve_by_augmentation(b)
    }

    /// Gauss-Jordan solve: reduce `[A | b]` to RREF and read the solution
    /// off the pivot columns.
    ///
    /// When A is singular some rows of the RREF are entirely zero, which
    /// shifts the columns holding the pivot 1s. The solution is assembled by
    /// pivot-column correspondence — `x[pivot_col] = rhs[row]` — with free
    /// variables set to 0, never by row position.
    fn solve_by_augmentation(&self, b: &Array1<f64>) -> Result<Array1<f64>> {
        let n = self.ncols();
        let augmented = self.augment(&Matrix::column_vector(b))?;
        let reduced = augmented.rref();
        let eps = reduced.epsilon();

        let mut x = Array1::zeros(n);
        for i in 0..reduced.nrows() {
            let pivot = (0..n).find(|&j| reduced[(i, j)].abs() > eps);
            match pivot {
                Some(col) => x[col] = reduced[(i, n)],
                None => {
                    // Zero coefficient row: any nonzero right-hand side means
                    // the system is inconsistent.
                    if reduced[(i, n)].abs() > eps {
                        return Err(MatrixError::Singular);
                    }
                }
            }
        }
        log::debug!("solve: rref augmentation");
        Ok(x)
    }
}
