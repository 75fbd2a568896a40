//! Row reduction engine: REF and RREF via Gaussian elimination.
//!
//! Forward elimination uses partial pivoting: at each pivot column the
//! remaining row with the largest absolute value is selected, and ties keep
//! the earliest row (strict `>` comparison). The swap count is recorded since
//! the determinant sign depends on it. Columns whose remaining candidates are
//! all within ε of zero are skipped, which lets singular and non-square
//! matrices reduce cleanly: rows of zeros sink to the bottom.

use ndarray::{Array1, Array2};

use crate::matrix::Matrix;

/// Result of forward Gaussian elimination.
///
/// `matrix` is in row echelon form; `row_swaps` counts the row exchanges
/// performed by partial pivoting.
#[derive(Debug)]
pub struct RowEchelon {
    /// The matrix in row echelon form.
    pub matrix: Matrix,
    /// Number of row exchanges performed during elimination.
    pub row_swaps: usize,
}

impl Matrix {
    /// Row echelon form with swap count, computed once and cached.
    ///
    /// Pivot selection is partial pivoting with earliest-row tie-breaking,
    /// so `row_swaps` (and the determinant sign derived from it) is
    /// deterministic.
    pub fn row_echelon(&self) -> &RowEchelon {
        self.catalog()
            .row_echelon
            .get_or_insert_with(|| reduce_to_ref(self))
    }

    /// Reduced row echelon form, computed once and cached.
    ///
    /// Every pivot is normalized to 1 and is the sole nonzero entry of its
    /// column.
    pub fn rref(&self) -> &Matrix {
        self.catalog()
            .rref
            .get_or_insert_with(|| reduce_to_rref(&self.row_echelon().matrix))
    }

    /// Per-row pivot column of this matrix (intended for echelon forms):
    /// the column of the first entry above ε, or `None` for a zero row.
    pub(crate) fn pivot_columns(&self) -> Vec<Option<usize>> {
        let (rows, cols) = self.shape();
        let mut pivots = Vec::with_capacity(rows);
        for i in 0..rows {
            pivots.push((0..cols).find(|&j| !self.approx_zero(self[(i, j)])));
        }
        pivots
    }
}

fn reduce_to_ref(m: &Matrix) -> RowEchelon {
    let (rows, cols) = m.shape();
    let eps = m.epsilon();
    let mut a = m.data().clone();
    let mut row_swaps = 0usize;
    let mut pivot_row = 0usize;

    for col in 0..cols {
        if pivot_row >= rows {
            break;
        }

        // Partial pivoting: largest |value| among remaining rows, earliest
        // row on ties.
        let mut best = pivot_row;
        let mut best_val = a[[pivot_row, col]].abs();
        for r in (pivot_row + 1)..rows {
            let v = a[[r, col]].abs();
            if v > best_val {
                best = r;
                best_val = v;
            }
        }
        if best_val <= eps {
            // No usable pivot in this column; skip it.
            continue;
        }
        if best != pivot_row {
            swap_rows(&mut a, pivot_row, best);
            row_swaps += 1;
        }

        let pivot = a[[pivot_row, col]];
        for r in (pivot_row + 1)..rows {
            let entry = a[[r, col]];
            if entry.abs() <= eps {
                a[[r, col]] = 0.0;
                continue;
            }
            let factor = entry / pivot;
            for c in col..cols {
                a[[r, c]] -= factor * a[[pivot_row, c]];
            }
            a[[r, col]] = 0.0;
        }
        pivot_row += 1;
    }

    log::trace!(
        "REF of {}x{} matrix: {} pivot rows, {} swaps",
        rows,
        cols,
        pivot_row,
        row_swaps
    );
    RowEchelon {
        matrix: m.derived(a),
        row_swaps,
    }
}

fn swap_rows(a: &mut Array2<f64>, r1: usize, r2: usize) {
    for c in 0..a.ncols() {
        a.swap([r1, c], [r2, c]);
    }
}

fn reduce_to_rref(echelon: &Matrix) -> Matrix {
    let (rows, cols) = echelon.shape();
    let eps = echelon.epsilon();
    let mut a = echelon.data().clone();

    for r in 0..rows {
        let Some(pivot_col) = (0..cols).find(|&j| a[[r, j]].abs() > eps) else {
            continue;
        };

        // Normalize the pivot row.
        let pivot = a[[r, pivot_col]];
        for c in pivot_col..cols {
            a[[r, c]] /= pivot;
        }
        a[[r, pivot_col]] = 1.0;

        // Eliminate the pivot column everywhere else, rows above included.
        for r2 in 0..rows {
            if r2 == r {
                continue;
            }
            let factor = a[[r2, pivot_col]];
            if factor.abs() <= eps {
                a[[r2, pivot_col]] = 0.0;
                continue;
            }
            for c in pivot_col..cols {
                a[[r2, c]] -= factor * a[[r, c]];
            }
            a[[r2, pivot_col]] = 0.0;
        }
    }

    echelon.derived(a)
}

/// Basis of the null space of `m`, one unit-normalized vector per free
/// column of the RREF. An invertible matrix yields an empty basis.
pub(crate) fn null_space(m: &Matrix) -> Vec<Array1<f64>> {
    let r = m.rref();
    let (rows, cols) = r.shape();
    let pivots = r.pivot_columns();

    // pivot_of[j] = row whose pivot sits in column j.
    let mut pivot_of: Vec<Option<usize>> = vec![None; cols];
    for (row, pivot) in pivots.iter().enumerate() {
        if let Some(col) = pivot {
            pivot_of[*col] = Some(row);
        }
    }

    let mut basis = Vec::new();
    for free in 0..cols {
        if pivot_of[free].is_some() {
            continue;
        }
        let mut v = Array1::zeros(cols);
        v[free] = 1.0;
        for col in 0..cols {
            if let Some(row) = pivot_of[col] {
                if row < rows {
                    v[col] = -r[(row, free)];
                }
            }
        }
        let norm = v.dot(&v).sqrt();
        if norm > 0.0 {
            v.mapv_inplace(|x| x / norm);
        }
        basis.push(v);
    }
    basis
}
