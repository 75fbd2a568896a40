//! Matrix factorizations.
//!
//! Each factorization is computed at most once per matrix (cached in the
//! catalog) and yields an immutable result record exposing its factors plus
//! a `solve` specialized to its factor structure.

mod cholesky;
mod crout;
mod lu;
mod qr;
mod svd;

pub use cholesky::CholeskyDecomposition;
pub use crout::CroutDecomposition;
pub use lu::LuDecomposition;
pub use qr::QrDecomposition;
pub use svd::SvdDecomposition;

use ndarray::{Array1, Array2};

use crate::error::{MatrixError, Result};

/// Solve `Lx = b` for lower-triangular `L`.
///
/// With `unit_diagonal` the diagonal is taken to be 1 and never divided by.
pub(crate) fn forward_substitution(
    l: &Array2<f64>,
    b: &Array1<f64>,
    unit_diagonal: bool,
    eps: f64,
) -> Result<Array1<f64>> {
    let n = l.nrows();
    let mut x = b.clone();
    for i in 0..n {
        for j in 0..i {
            x[i] -= l[[i, j]] * x[j];
        }
        if !unit_diagonal {
            let diag = l[[i, i]];
            if diag.abs() <= eps {
                return Err(MatrixError::ZeroPivot { column: i });
            }
            x[i] /= diag;
        }
    }
    Ok(x)
}

/// Solve `Ux = b` for upper-triangular `U`.
pub(crate) fn back_substitution(u: &Array2<f64>, b: &Array1<f64>, eps: f64) -> Result<Array1<f64>> {
    let n = u.nrows();
    let mut x = b.clone();
    for i in (0..n).rev() {
        for j in (i + 1)..n {
            x[i] -= u[[i, j]] * x[j];
        }
        let diag = u[[i, i]];
        if diag.abs() <= eps {
            return Err(MatrixError::ZeroPivot { column: i });
        }
        x[i] /= diag;
    }
    Ok(x)
}
