//! Canonical matrix constructors.
//!
//! Identity, zero, diagonal, permutation, exchange, random and Hilbert
//! matrices. The elimination and factorization engines use these internally
//! (identity for augmentation, permutation for LU pivoting).

use ndarray::{Array1, Array2};
use rand::Rng;

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

impl Matrix {
    /// The n×n identity matrix.
    pub fn identity(n: usize) -> Matrix {
        Matrix::from_array(Array2::eye(n))
    }

    /// The m×n zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::from_array(Array2::zeros((rows, cols)))
    }

    /// The m×n matrix of ones.
    pub fn ones(rows: usize, cols: usize) -> Matrix {
        Matrix::from_array(Array2::from_elem((rows, cols), 1.0))
    }

    /// A square matrix with `d` on the diagonal and zeros elsewhere.
    pub fn diagonal(d: &Array1<f64>) -> Matrix {
        Matrix::from_array(Array2::from_diag(d))
    }

    /// The permutation matrix sending row `i` to row `perm[i]`, i.e.
    /// `P[i, perm[i]] = 1`. `perm` must be a permutation of `0..n`.
    pub fn permutation(perm: &[usize]) -> Result<Matrix> {
        let n = perm.len();
        let mut seen = vec![false; n];
        for &p in perm {
            if p >= n || seen[p] {
                return Err(MatrixError::InvalidParameter {
                    what: "permutation indices must be a bijection of 0..n",
                });
            }
            seen[p] = true;
        }
        let mut data = Array2::zeros((n, n));
        for (i, &p) in perm.iter().enumerate() {
            data[[i, p]] = 1.0;
        }
        Ok(Matrix::from_array(data))
    }

    /// The n×n exchange matrix (ones on the anti-diagonal).
    pub fn exchange(n: usize) -> Matrix {
        let mut data = Array2::zeros((n, n));
        for i in 0..n {
            data[[i, n - 1 - i]] = 1.0;
        }
        Matrix::from_array(data)
    }

    /// An m×n matrix with entries drawn uniformly from [0, 1).
    pub fn random(rows: usize, cols: usize) -> Matrix {
        let mut rng = rand::thread_rng();
        let data = Array2::from_shape_fn((rows, cols), |_| rng.gen_range(0.0..1.0));
        Matrix::from_array(data)
    }

    /// The n×n Hilbert matrix, `H[i][j] = 1 / (i + j + 1)`.
    pub fn hilbert(n: usize) -> Matrix {
        let data = Array2::from_shape_fn((n, n), |(i, j)| 1.0 / ((i + j + 1) as f64));
        Matrix::from_array(data)
    }
}
