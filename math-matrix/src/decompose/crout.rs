//! Crout factorization.
//!
//! LDU-style alternative to Doolittle: `A = L·U` where `L` absorbs the
//! diagonal (general lower-triangular) and `U` is unit upper-triangular.
//! No pivoting is performed; a zero diagonal entry of `L` is reported as
//! [`MatrixError::ZeroPivot`].

use ndarray::{Array1, Array2};

use crate::decompose::{back_substitution, forward_substitution};
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

/// Crout factorization result: `A = L·U` with unit upper-triangular `U`.
#[derive(Debug)]
pub struct CroutDecomposition {
    /// Lower-triangular factor carrying the diagonal.
    pub l: Matrix,
    /// Unit upper-triangular factor.
    pub u: Matrix,
}

impl Matrix {
    /// Crout factorization, cached per matrix. Requires a square matrix.
    pub fn crout(&self) -> Result<&CroutDecomposition> {
        if let Some(f) = self.catalog().crout.get() {
            return Ok(f);
        }
        let f = factorize(self)?;
        Ok(self.catalog().crout.insert(f))
    }
}

impl CroutDecomposition {
    /// Solve `Ax = b` via `L(Ux) = b`: forward then back substitution.
    pub fn solve(&self, b: &Array1<f64>) -> Result<Array1<f64>> {
        let n = self.l.nrows();
        if b.len() != n {
            return Err(MatrixError::LengthMismatch {
                op: "crout solve",
                expected: n,
                got: b.len(),
            });
        }
        let y = forward_substitution(self.l.data(), b, false, self.l.epsilon())?;
        back_substitution(self.u.data(), &y, self.u.epsilon())
    }
}

fn factorize(a: &Matrix) -> Result<CroutDecomposition> {
    if !a.is_square() {
        return Err(MatrixError::NotSquare {
            rows: a.nrows(),
            cols: a.ncols(),
        });
    }
    let n = a.nrows();
    let eps = a.epsilon();
    let data = a.data();
    let mut l: Array2<f64> = Array2::zeros((n, n));
    let mut u: Array2<f64> = Array2::eye(n);

    for j in 0..n {
        for i in j..n {
            let mut sum = data[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * u[[k, j]];
            }
            l[[i, j]] = sum;
        }
        if l[[j, j]].abs() <= eps {
            return Err(MatrixError::ZeroPivot { column: j });
        }
        for i in (j + 1)..n {
            let mut sum = data[[j, i]];
            for k in 0..j {
                sum -= l[[j, k]] * u[[k, i]];
            }
            u[[j, i]] = sum / l[[j, j]];
        }
    }

    Ok(CroutDecomposition {
        l: a.derived(l),
        u: a.derived(u),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn sample() -> Matrix {
        Matrix::from_rows(vec![
            vec![25.0, 5.0, 1.0],
            vec![64.0, 8.0, 1.0],
            vec![144.0, 12.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_a_equals_lu() {
        let a = sample();
        let f = a.crout().unwrap();
        let lu = f.l.matmul(&f.u).unwrap();
        let diff = lu.sub(&a).unwrap();
        for v in diff.data().iter() {
            assert_relative_eq!(*v, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_factor_structure() {
        let a = sample();
        let f = a.crout().unwrap();
        assert!(f.l.is_lower_triangular());
        assert!(f.u.is_upper_triangular());
        // U carries a unit diagonal, L absorbs the normalization.
        for i in 0..3 {
            assert_relative_eq!(f.u[(i, i)], 1.0);
        }
    }

    #[test]
    fn test_crout_solve() {
        let a = sample();
        let b = array![106.0, 177.0, 279.0];
        let x = a.crout().unwrap().solve(&b).unwrap();
        let ax = a.mul_vector(&x).unwrap();
        for i in 0..3 {
            assert_relative_eq!(ax[i], b[i], epsilon = 1e-8);
        }
    }

    #[test]
    fn test_crout_zero_pivot() {
        // Leading entry zero and no pivoting: reported, not NaN.
        let a = Matrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let err = a.crout().unwrap_err();
        assert!(matches!(err, MatrixError::ZeroPivot { column: 0 }));
    }

    #[test]
    fn test_crout_not_square() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
        assert!(a.crout().unwrap_err().is_shape_error());
    }
}
