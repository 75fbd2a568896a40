//! LU factorization (Doolittle with partial pivoting).
//!
//! Factors a square matrix as `P·A = L·U` where `L` is unit lower-triangular,
//! `U` is upper-triangular and `P` is the row-permutation matrix produced by
//! partial pivoting. A column with no pivot above tolerance is reported as
//! [`MatrixError::ZeroPivot`] — degenerate input never produces NaNs.

use ndarray::{Array1, Array2};

use crate::decompose::{back_substitution, forward_substitution};
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

/// LU factorization result: `P·A = L·U`.
#[derive(Debug)]
pub struct LuDecomposition {
    /// Unit lower-triangular factor.
    pub l: Matrix,
    /// Upper-triangular factor.
    pub u: Matrix,
    /// Row-permutation matrix.
    pub p: Matrix,
}

impl Matrix {
    /// Doolittle LU factorization with partial pivoting, cached per matrix.
    pub fn lu(&self) -> Result<&LuDecomposition> {
        if let Some(f) = self.catalog().lu.get() {
            return Ok(f);
        }
        let f = factorize(self)?;
        Ok(self.catalog().lu.insert(f))
    }
}

impl LuDecomposition {
    /// Solve `Ax = b` via `L(Ux) = Pb`: permute, then forward and back
    /// substitution.
    pub fn solve(&self, b: &Array1<f64>) -> Result<Array1<f64>> {
        let n = self.u.nrows();
        if b.len() != n {
            return Err(MatrixError::LengthMismatch {
                op: "lu solve",
                expected: n,
                got: b.len(),
            });
        }
        let pb = self.p.mul_vector(b)?;
        let y = forward_substitution(self.l.data(), &pb, true, self.l.epsilon())?;
        back_substitution(self.u.data(), &y, self.u.epsilon())
    }
}

fn factorize(a: &Matrix) -> Result<LuDecomposition> {
    if !a.is_square() {
        return Err(MatrixError::NotSquare {
            rows: a.nrows(),
            cols: a.ncols(),
        });
    }
    let n = a.nrows();
    let eps = a.epsilon();
    let mut u = a.data().clone();
    let mut l: Array2<f64> = Array2::eye(n);
    let mut perm: Vec<usize> = (0..n).collect();

    for k in 0..n {
        // Partial pivoting, earliest row on ties (same rule as REF).
        let mut best = k;
        let mut best_val = u[[k, k]].abs();
        for i in (k + 1)..n {
            let v = u[[i, k]].abs();
            if v > best_val {
                best = i;
                best_val = v;
            }
        }
        if best_val <= eps {
            return Err(MatrixError::ZeroPivot { column: k });
        }
        if best != k {
            for j in 0..n {
                u.swap([k, j], [best, j]);
            }
            // Only the already-computed multiplier columns move with the row.
            for j in 0..k {
                l.swap([k, j], [best, j]);
            }
            perm.swap(k, best);
        }

        let pivot = u[[k, k]];
        for i in (k + 1)..n {
            let factor = u[[i, k]] / pivot;
            l[[i, k]] = factor;
            for j in k..n {
                u[[i, j]] -= factor * u[[k, j]];
            }
            u[[i, k]] = 0.0;
        }
    }

    // perm[i] is the original row now in position i, so P[i, perm[i]] = 1.
    let mut p: Array2<f64> = Array2::zeros((n, n));
    for (i, &orig) in perm.iter().enumerate() {
        p[[i, orig]] = 1.0;
    }

    Ok(LuDecomposition {
        l: a.derived(l),
        u: a.derived(u),
        p: a.derived(p),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn sample() -> Matrix {
        Matrix::from_rows(vec![
            vec![2.0, 1.0, 1.0],
            vec![4.0, -6.0, 0.0],
            vec![-2.0, 7.0, 2.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_pa_equals_lu() {
        let a = sample();
        let f = a.lu().unwrap();
        let pa = f.p.matmul(&a).unwrap();
        let lu = f.l.matmul(&f.u).unwrap();
        assert!(pa.approx_eq(&lu));
    }

    #[test]
    fn test_factor_structure() {
        let a = sample();
        let f = a.lu().unwrap();
        assert!(f.l.is_lower_triangular());
        assert!(f.u.is_upper_triangular());
        for i in 0..3 {
            assert_relative_eq!(f.l[(i, i)], 1.0);
        }
        // P is a permutation, hence orthogonal.
        let ppt = f.p.matmul(f.p.transpose()).unwrap();
        assert!(ppt.is_identity());
    }

    #[test]
    fn test_lu_solve() {
        let a = sample();
        let b = array![5.0, -2.0, 9.0];
        let x = a.lu().unwrap().solve(&b).unwrap();
        let ax = a.mul_vector(&x).unwrap();
        for i in 0..3 {
            assert_relative_eq!(ax[i], b[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_lu_not_square() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        assert!(matches!(
            a.lu().unwrap_err(),
            MatrixError::NotSquare { rows: 1, cols: 3 }
        ));
    }

    #[test]
    fn test_lu_singular_reports_zero_pivot() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
        let err = a.lu().unwrap_err();
        assert!(err.is_singularity_error());
    }

    #[test]
    fn test_lu_is_cached() {
        let a = sample();
        let first = a.lu().unwrap();
        let second = a.lu().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_lu_solve_length_mismatch() {
        let a = sample();
        let b = array![1.0, 2.0];
        assert!(a.lu().unwrap().solve(&b).is_err());
    }
}
