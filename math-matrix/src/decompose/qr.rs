//! QR factorization via Householder reflections.
//!
//! Valid for any m×n matrix: `A = Q·R` with `Q` orthogonal (m×m) and `R`
//! upper-triangular (m×n). Q is orthogonal by construction — it is a product
//! of reflections — so `QᵀQ = I` holds to tolerance without any correction
//! pass.

use ndarray::{Array1, Array2};

use crate::decompose::back_substitution;
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

/// QR factorization result: `A = Q·R`.
#[derive(Debug)]
pub struct QrDecomposition {
    /// Orthogonal factor (m×m).
    pub q: Matrix,
    /// Upper-triangular factor (m×n).
    pub r: Matrix,
}

impl Matrix {
    /// Householder QR factorization, cached per matrix.
    pub fn qr(&self) -> Result<&QrDecomposition> {
        if let Some(f) = self.catalog().qr.get() {
            return Ok(f);
        }
        let f = factorize(self)?;
        Ok(self.catalog().qr.insert(f))
    }
}

impl QrDecomposition {
    /// Solve `Ax = b` as `x = R⁻¹·Qᵀ·b` (least-squares solution when m > n).
    ///
    /// A zero diagonal entry of `R` means the matrix is rank-deficient and is
    /// reported as [`MatrixError::ZeroPivot`].
    pub fn solve(&self, b: &Array1<f64>) -> Result<Array1<f64>> {
        let m = self.q.nrows();
        let n = self.r.ncols();
        if b.len() != m {
            return Err(MatrixError::LengthMismatch {
                op: "qr solve",
                expected: m,
                got: b.len(),
            });
        }
        if m < n {
            return Err(MatrixError::InvalidParameter {
                what: "qr solve requires at least as many rows as columns",
            });
        }

        // First n entries of Qᵀb.
        let q = self.q.data();
        let mut qtb = Array1::zeros(n);
        for i in 0..n {
            let mut sum = 0.0;
            for j in 0..m {
                sum += q[[j, i]] * b[j];
            }
            qtb[i] = sum;
        }

        let r_top = self.r.data().slice(ndarray::s![0..n, 0..n]).to_owned();
        back_substitution(&r_top, &qtb, self.r.epsilon())
    }
}

fn factorize(a: &Matrix) -> Result<QrDecomposition> {
    let (m, n) = a.shape();
    let eps = a.epsilon();
    let mut r = a.data().clone();
    let mut q: Array2<f64> = Array2::eye(m);

    let steps = n.min(m.saturating_sub(1));
    for k in 0..steps {
        // Householder vector for column k below the diagonal.
        let mut norm_sq = 0.0;
        for i in k..m {
            norm_sq += r[[i, k]] * r[[i, k]];
        }
        let norm = norm_sq.sqrt();
        if norm <= eps {
            // Column already zero below the pivot; nothing to reflect.
            continue;
        }

        // Sign chosen opposite to the pivot to avoid cancellation.
        let alpha = if r[[k, k]] > 0.0 { -norm } else { norm };
        let mut v = vec![0.0; m];
        v[k] = r[[k, k]] - alpha;
        for i in (k + 1)..m {
            v[i] = r[[i, k]];
        }
        let vtv: f64 = v.iter().map(|x| x * x).sum();
        if vtv <= f64::MIN_POSITIVE {
            continue;
        }

        // R ← H·R on the trailing columns.
        for j in (k + 1)..n {
            let mut s = 0.0;
            for i in k..m {
                s += v[i] * r[[i, j]];
            }
            let factor = 2.0 * s / vtv;
            for i in k..m {
                r[[i, j]] -= factor * v[i];
            }
        }
        r[[k, k]] = alpha;
        for i in (k + 1)..m {
            r[[i, k]] = 0.0;
        }

        // Q ← Q·H, accumulating A = Q·R.
        for i in 0..m {
            let mut s = 0.0;
            for j in k..m {
                s += q[[i, j]] * v[j];
            }
            let factor = 2.0 * s / vtv;
            for j in k..m {
                q[[i, j]] -= factor * v[j];
            }
        }
    }

    log::trace!("QR of {}x{} matrix via {} reflections", m, n, steps);
    Ok(QrDecomposition {
        q: a.derived(q),
        r: a.derived(r),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn sample() -> Matrix {
        Matrix::from_rows(vec![
            vec![12.0, -51.0, 4.0],
            vec![6.0, 167.0, -68.0],
            vec![-4.0, 24.0, -41.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_a_equals_qr() {
        let a = sample();
        let f = a.qr().unwrap();
        let qr = f.q.matmul(&f.r).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(qr[(i, j)], a[(i, j)], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_q_is_orthogonal() {
        let a = sample();
        let f = a.qr().unwrap();
        let qtq = f.q.transpose().matmul(&f.q).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(qtq[(i, j)], expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_r_is_upper_triangular() {
        let a = sample();
        let f = a.qr().unwrap();
        for i in 0..3 {
            for j in 0..i {
                assert_relative_eq!(f.r[(i, j)], 0.0, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_qr_rectangular() {
        let a = Matrix::from_rows(vec![
            vec![1.0, 2.0],
            vec![3.0, 4.0],
            vec![5.0, 6.0],
            vec![7.0, 8.0],
        ])
        .unwrap();
        let f = a.qr().unwrap();
        assert_eq!(f.q.shape(), (4, 4));
        assert_eq!(f.r.shape(), (4, 2));
        let qr = f.q.matmul(&f.r).unwrap();
        for i in 0..4 {
            for j in 0..2 {
                assert_relative_eq!(qr[(i, j)], a[(i, j)], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_qr_solve() {
        let a = sample();
        let b = array![1.0, 2.0, 3.0];
        let x = a.qr().unwrap().solve(&b).unwrap();
        let ax = a.mul_vector(&x).unwrap();
        for i in 0..3 {
            assert_relative_eq!(ax[i], b[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_qr_least_squares() {
        // Overdetermined system: x = 1, fitted exactly since b is in range.
        let a = Matrix::from_rows(vec![vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let b = array![2.0, 4.0, 6.0];
        let x = a.qr().unwrap().solve(&b).unwrap();
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_qr_rank_deficient_solve_fails() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
        let f = a.qr().unwrap();
        let err = f.solve(&array![1.0, 2.0]).unwrap_err();
        assert!(err.is_singularity_error());
    }
}
