//! Singular value decomposition via one-sided Jacobi rotations.
//!
//! Factors an m×n matrix (m ≥ n) as `A = U·Σ·Vᵀ` where `U` is m×n with
//! orthonormal columns, `Σ` is diagonal with non-negative entries in
//! descending order and `V` is n×n orthogonal. Column pairs are rotated until
//! all are mutually orthogonal; singular values are the resulting column
//! norms. Rank-deficient input yields zero singular values rather than an
//! error, and `solve` falls back to the pseudoinverse (least-squares)
//! solution.

use ndarray::{Array1, Array2};

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

const MAX_SWEEPS: usize = 60;

/// SVD result: `A = U·Σ·Vᵀ`.
#[derive(Debug)]
pub struct SvdDecomposition {
    /// Left singular vectors (m×n, orthonormal columns).
    pub u: Matrix,
    /// Singular values in descending order.
    pub sigma: Array1<f64>,
    /// Transposed right singular vectors (n×n).
    pub vt: Matrix,
}

impl Matrix {
    /// One-sided Jacobi SVD, cached per matrix. Requires m ≥ n.
    pub fn svd(&self) -> Result<&SvdDecomposition> {
        if let Some(f) = self.catalog().svd.get() {
            return Ok(f);
        }
        let f = factorize(self)?;
        Ok(self.catalog().svd.insert(f))
    }
}

impl SvdDecomposition {
    /// Σ as a diagonal matrix.
    pub fn sigma_matrix(&self) -> Matrix {
        Matrix::diagonal(&self.sigma)
    }

    /// Numerical rank: count of singular values above tolerance.
    pub fn rank(&self) -> usize {
        let tol = self.u.epsilon();
        self.sigma.iter().filter(|&&s| s > tol).count()
    }

    /// Least-squares solve `x = V·Σ⁺·Uᵀ·b`; singular values within tolerance
    /// of zero are treated as zero (their components are dropped).
    pub fn solve(&self, b: &Array1<f64>) -> Result<Array1<f64>> {
        let m = self.u.nrows();
        let n = self.vt.nrows();
        if b.len() != m {
            return Err(MatrixError::LengthMismatch {
                op: "svd solve",
                expected: m,
                got: b.len(),
            });
        }
        let tol = self.u.epsilon();
        let u = self.u.data();
        let vt = self.vt.data();

        let mut x = Array1::zeros(n);
        for i in 0..n {
            if self.sigma[i] <= tol {
                continue;
            }
            let mut ui_b = 0.0;
            for j in 0..m {
                ui_b += u[[j, i]] * b[j];
            }
            let w = ui_b / self.sigma[i];
            for k in 0..n {
                x[k] += vt[[i, k]] * w;
            }
        }
        Ok(x)
    }
}

fn factorize(a: &Matrix) -> Result<SvdDecomposition> {
    let (m, n) = a.shape();
    if m < n {
        return Err(MatrixError::InvalidParameter {
            what: "svd requires at least as many rows as columns",
        });
    }
    let tol = a.epsilon().max(1e-14);
    let mut u = a.data().clone();
    let mut v: Array2<f64> = Array2::eye(n);

    for sweep in 0..MAX_SWEEPS {
        let mut max_cos = 0.0f64;
        for p in 0..n.saturating_sub(1) {
            for q in (p + 1)..n {
                let mut alpha = 0.0;
                let mut beta = 0.0;
                let mut gamma = 0.0;
                for i in 0..m {
                    alpha += u[[i, p]] * u[[i, p]];
                    beta += u[[i, q]] * u[[i, q]];
                    gamma += u[[i, p]] * u[[i, q]];
                }
                let denom = (alpha * beta).sqrt();
                if gamma.abs() <= tol * denom {
                    continue;
                }
                max_cos = max_cos.max(gamma.abs() / denom);

                // Jacobi rotation that orthogonalizes columns p and q.
                let zeta = (beta - alpha) / (2.0 * gamma);
                let t = zeta.signum() / (zeta.abs() + (1.0 + zeta * zeta).sqrt());
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = c * t;

                for i in 0..m {
                    let up = u[[i, p]];
                    let uq = u[[i, q]];
                    u[[i, p]] = c * up - s * uq;
                    u[[i, q]] = s * up + c * uq;
                }
                for i in 0..n {
                    let vp = v[[i, p]];
                    let vq = v[[i, q]];
                    v[[i, p]] = c * vp - s * vq;
                    v[[i, q]] = s * vp + c * vq;
                }
            }
        }
        if max_cos <= tol {
            log::debug!("one-sided jacobi svd converged after {} sweeps", sweep);
            break;
        }
    }

    // Singular values are the column norms; normalize the kept columns.
    let mut order: Vec<usize> = (0..n).collect();
    let mut norms = vec![0.0f64; n];
    for (j, norm) in norms.iter_mut().enumerate() {
        let mut sum = 0.0;
        for i in 0..m {
            sum += u[[i, j]] * u[[i, j]];
        }
        *norm = sum.sqrt();
    }
    order.sort_by(|&x, &y| norms[y].total_cmp(&norms[x]));

    let mut u_sorted: Array2<f64> = Array2::zeros((m, n));
    let mut vt_sorted: Array2<f64> = Array2::zeros((n, n));
    let mut sigma = Array1::zeros(n);
    for (dst, &src) in order.iter().enumerate() {
        sigma[dst] = norms[src];
        if norms[src] > tol {
            for i in 0..m {
                u_sorted[[i, dst]] = u[[i, src]] / norms[src];
            }
        }
        for i in 0..n {
            vt_sorted[[dst, i]] = v[[i, src]];
        }
    }

    Ok(SvdDecomposition {
        u: a.derived(u_sorted),
        sigma,
        vt: a.derived(vt_sorted),
    })
}
