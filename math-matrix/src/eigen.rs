//! Eigenvalue and eigenvector extraction.
//!
//! Three real-valued strategies behind a closed enum: triangular matrices
//! read their diagonal, matrices below 5×5 solve the characteristic
//! polynomial in closed form (Faddeev–LeVerrier coefficients, exact root
//! formulas through degree 4), and symmetric matrices use cyclic Jacobi
//! rotations. A complex conjugate root pair is reported as
//! [`MatrixError::EigenUnsupported`] — this engine never fabricates real
//! approximations of complex spectra. Eigenvectors come from the null space
//! of `A − λI`.

use ndarray::{Array1, Array2};

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::reduce::null_space;

const JACOBI_MAX_SWEEPS: usize = 100;

/// Eigenvalue algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EigenMethod {
    /// Read the diagonal of a triangular matrix.
    Triangular,
    /// Closed-form roots of the characteristic polynomial (n < 5).
    CharacteristicPolynomial,
    /// Cyclic Jacobi rotations (symmetric matrices).
    Jacobi,
}

impl Matrix {
    /// Eigenvalues, sorted by descending absolute value.
    ///
    /// With `None` the algorithm is chosen automatically: triangular →
    /// diagonal, n < 5 → characteristic polynomial, symmetric → Jacobi;
    /// anything else is [`MatrixError::EigenUnsupported`]. An explicit
    /// method dispatches directly and validates its own precondition.
    pub fn eigenvalues(&self, method: Option<EigenMethod>) -> Result<Vec<f64>> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.nrows(),
                cols: self.ncols(),
            });
        }
        match method {
            Some(EigenMethod::Triangular) => {
                if !self.is_triangular() {
                    return Err(MatrixError::EigenUnsupported {
                        reason: "triangular method requires a triangular matrix",
                    });
                }
                Ok(self.diagonal_eigenvalues())
            }
            Some(EigenMethod::CharacteristicPolynomial) => {
                if self.nrows() >= 5 {
                    return Err(MatrixError::EigenUnsupported {
                        reason: "closed-form polynomial roots exist only below 5x5",
                    });
                }
                self.polynomial_eigenvalues()
            }
            Some(EigenMethod::Jacobi) => {
                if !self.is_symmetric() {
                    return Err(MatrixError::NotSymmetric);
                }
                Ok(self.jacobi_eigenvalues())
            }
            None => {
                if self.is_triangular() {
                    log::debug!("eigenvalues: triangular shortcut");
                    Ok(self.diagonal_eigenvalues())
                } else if self.nrows() < 5 {
                    log::debug!("eigenvalues: characteristic polynomial");
                    self.polynomial_eigenvalues()
                } else if self.is_symmetric() {
                    log::debug!("eigenvalues: jacobi iteration");
                    Ok(self.jacobi_eigenvalues())
                } else {
                    Err(MatrixError::EigenUnsupported {
                        reason: "matrix is neither triangular nor symmetric and too large for closed-form roots",
                    })
                }
            }
        }
    }

    /// Eigenvectors paired with [`Matrix::eigenvalues`], each a unit vector
    /// from the null space of `A − λI`.
    pub fn eigenvectors(&self, method: Option<EigenMethod>) -> Result<Vec<Array1<f64>>> {
        let values = self.eigenvalues(method)?;
        let n = self.nrows();

        // Eigenvalues carry rounding from the root finder, so the null-space
        // reduction runs with a relaxed zero tolerance.
        let inf_norm = self
            .data()
            .iter()
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        let relaxed = self.epsilon().max(1e-8 * (1.0 + inf_norm));

        let mut vectors = Vec::with_capacity(values.len());
        for (idx, &lambda) in values.iter().enumerate() {
            // Position of this eigenvalue within its multiplicity group.
            let occurrence = values[..idx]
                .iter()
                .filter(|&&prev| (prev - lambda).abs() <= relaxed)
                .count();

            let mut shifted = self.data().clone();
            for i in 0..n {
                shifted[[i, i]] -= lambda;
            }
            let basis = null_space(&Matrix::from_array(shifted).with_epsilon(relaxed)?);
            if basis.is_empty() {
                return Err(MatrixError::EigenUnsupported {
                    reason: "no null-space vector found for an eigenvalue",
                });
            }
            let pick = occurrence.min(basis.len() - 1);
            vectors.push(basis[pick].clone());
        }
        Ok(vectors)
    }

    fn diagonal_eigenvalues(&self) -> Vec<f64> {
        let mut values: Vec<f64> = self.data().diag().to_vec();
        values.sort_by(|a, b| b.abs().total_cmp(&a.abs()));
        values
    }

    fn polynomial_eigenvalues(&self) -> Result<Vec<f64>> {
        let n = self.nrows();
        let coeffs = characteristic_polynomial(self.data());
        let mut roots = match n {
            0 => Vec::new(),
            1 => vec![-coeffs[1]],
            2 => match solve_quadratic(coeffs[1], coeffs[2]) {
                Some((r1, r2)) => vec![r1, r2],
                None => {
                    return Err(MatrixError::EigenUnsupported {
                        reason: "characteristic polynomial has a complex root pair",
                    })
                }
            },
            3 => {
                let r = real_roots_cubic(coeffs[1], coeffs[2], coeffs[3]);
                if r.len() < 3 {
                    return Err(MatrixError::EigenUnsupported {
                        reason: "characteristic polynomial has a complex root pair",
                    });
                }
                r
            }
            _ => match real_roots_quartic(coeffs[1], coeffs[2], coeffs[3], coeffs[4]) {
                Some(r) => r,
                None => {
                    return Err(MatrixError::EigenUnsupported {
                        reason: "characteristic polynomial has a complex root pair",
                    })
                }
            },
        };
        roots.sort_by(|a, b| b.abs().total_cmp(&a.abs()));
        Ok(roots)
    }

    fn jacobi_eigenvalues(&self) -> Vec<f64> {
        let n = self.nrows();
        let tol = self.epsilon().max(1e-14);
        let mut a = self.data().clone();
        let fro = a.iter().map(|v| v * v).sum::<f64>().sqrt();

        for sweep in 0..JACOBI_MAX_SWEEPS {
            let mut off = 0.0;
            for p in 0..n {
                for q in (p + 1)..n {
                    off += 2.0 * a[[p, q]] * a[[p, q]];
                }
            }
            if off.sqrt() <= tol * (1.0 + fro) {
                log::debug!("jacobi converged after {} sweeps", sweep);
                break;
            }

            for p in 0..n.saturating_sub(1) {
                for q in (p + 1)..n {
                    let apq = a[[p, q]];
                    if apq.abs() <= f64::MIN_POSITIVE {
                        continue;
                    }
                    let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                    let t = theta.signum() / (theta.abs() + (1.0 + theta * theta).sqrt());
                    let c = 1.0 / (1.0 + t * t).sqrt();
                    let s = t * c;

                    // A ← GᵀAG for the rotation G in the (p, q) plane.
                    for k in 0..n {
                        let akp = a[[k, p]];
                        let akq = a[[k, q]];
                        a[[k, p]] = c * akp - s * akq;
                        a[[k, q]] = s * akp + c * akq;
                    }
                    for k in 0..n {
                        let apk = a[[p, k]];
                        let aqk = a[[q, k]];
                        a[[p, k]] = c * apk - s * aqk;
                        a[[q, k]] = s * apk + c * aqk;
                    }
                }
            }
        }

        let mut values: Vec<f64> = a.diag().to_vec();
        values.sort_by(|x, y| y.abs().total_cmp(&x.abs()));
        values
    }
}

/// Coefficients `[1, c₁, …, cₙ]` of `λⁿ + c₁λⁿ⁻¹ + … + cₙ` via
/// Faddeev–LeVerrier.
fn characteristic_polynomial(a: &Array2<f64>) -> Vec<f64> {
    let n = a.nrows();
    let mut coeffs = Vec::with_capacity(n + 1);
    coeffs.push(1.0);
    if n == 0 {
        return coeffs;
    }

    let mut m = a.clone();
    for k in 1..=n {
        let ck = -m.diag().sum() / k as f64;
        coeffs.push(ck);
        if k < n {
            let mut shifted = m.clone();
            for i in 0..n {
                shifted[[i, i]] += ck;
            }
            m = a.dot(&shifted);
        }
    }
    coeffs
}

/// Real roots of `y² + py + q`, or `None` for a complex pair.
fn solve_quadratic(p: f64, q: f64) -> Option<(f64, f64)> {
    let disc = p * p - 4.0 * q;
    let scale = p * p + 4.0 * q.abs() + f64::MIN_POSITIVE;
    if disc < -1e-10 * scale {
        return None;
    }
    let root = disc.max(0.0).sqrt();
    Some(((-p + root) / 2.0, (-p - root) / 2.0))
}

/// Real roots (with multiplicity) of `y³ + ay² + by + c`. Returns one root
/// when the other two form a complex pair.
fn real_roots_cubic(a: f64, b: f64, c: f64) -> Vec<f64> {
    let shift = -a / 3.0;
    let p = b - a * a / 3.0;
    let q = 2.0 * a * a * a / 27.0 - a * b / 3.0 + c;

    let half_q = q / 2.0;
    let third_p = p / 3.0;
    let disc = half_q * half_q + third_p * third_p * third_p;
    let scale = half_q * half_q + (third_p * third_p * third_p).abs() + f64::MIN_POSITIVE;

    if disc > 1e-10 * scale {
        // One real root, Cardano.
        let s = disc.sqrt();
        let t = (-half_q + s).cbrt() + (-half_q - s).cbrt();
        vec![t + shift]
    } else if disc >= -1e-10 * scale {
        // Repeated roots.
        if p.abs() <= f64::EPSILON.sqrt() * (1.0 + a.abs() + b.abs() + c.abs()) {
            vec![shift; 3]
        } else {
            let single = 3.0 * q / p;
            let double = -1.5 * q / p;
            vec![single + shift, double + shift, double + shift]
        }
    } else {
        // Three distinct real roots, trigonometric form (p < 0 here).
        let m = 2.0 * (-p / 3.0).sqrt();
        let arg = ((3.0 * q) / (2.0 * p)) * (-3.0 / p).sqrt();
        let phi = arg.clamp(-1.0, 1.0).acos() / 3.0;
        (0..3)
            .map(|k| m * (phi - 2.0 * std::f64::consts::PI * k as f64 / 3.0).cos() + shift)
            .collect()
    }
}

/// Real roots of `y⁴ + ay³ + by² + cy + d` via Ferrari's quadratic split,
/// or `None` when any pair is complex.
fn real_roots_quartic(a: f64, b: f64, c: f64, d: f64) -> Option<Vec<f64>> {
    let shift = -a / 4.0;
    let a2 = a * a;
    let p = b - 3.0 * a2 / 8.0;
    let q = c - a * b / 2.0 + a2 * a / 8.0;
    let r = d - a * c / 4.0 + a2 * b / 16.0 - 3.0 * a2 * a2 / 256.0;
    let scale = 1.0 + p.abs() + q.abs() + r.abs();

    if q.abs() <= 1e-10 * scale {
        // Biquadratic: z² + pz + r with z = y².
        let (z1, z2) = solve_quadratic(p, r)?;
        let mut roots = Vec::with_capacity(4);
        for z in [z1, z2] {
            if z < -1e-10 * scale {
                return None;
            }
            let y = z.max(0.0).sqrt();
            roots.push(y + shift);
            roots.push(-y + shift);
        }
        return Some(roots);
    }

    // Split y⁴ + py² + qy + r = (y² + sy + u)(y² - sy + w): s² solves the
    // resolvent cubic, which always has a positive real root when q ≠ 0.
    let resolvent = real_roots_cubic(2.0 * p, p * p - 4.0 * r, -q * q);
    let z = resolvent.iter().fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
    if !(z > 0.0) {
        return None;
    }
    let s = z.sqrt();
    let u = (p + z - q / s) / 2.0;
    let w = (p + z + q / s) / 2.0;

    let (y1, y2) = solve_quadratic(s, u)?;
    let (y3, y4) = solve_quadratic(-s, w)?;
    Some(vec![y1 + shift, y2 + shift, y3 + shift, y4 + shift])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_values(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_relative_eq!(*a, *e, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_triangular_shortcut() {
        let a = Matrix::from_rows(vec![
            vec![3.0, 1.0, 4.0],
            vec![0.0, -5.0, 2.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();
        // Sorted by descending absolute value.
        assert_values(&a.eigenvalues(None).unwrap(), &[-5.0, 3.0, 1.0]);
    }

    #[test]
    fn test_identity_eigenvalues_all_one() {
        for n in [1, 3, 6] {
            let i = Matrix::identity(n);
            let values = i.eigenvalues(None).unwrap();
            assert_values(&values, &vec![1.0; n]);
        }
    }

    #[test]
    fn test_2x2_symmetric_closed_form() {
        let a = Matrix::from_rows(vec![vec![2.0, 1.0], vec![1.0, 2.0]]).unwrap();
        assert_values(&a.eigenvalues(None).unwrap(), &[3.0, 1.0]);
    }

    #[test]
    fn test_3x3_closed_form() {
        // Symmetric block: eigenvalues 5, 3, 1.
        let a = Matrix::from_rows(vec![
            vec![2.0, 1.0, 0.0],
            vec![1.0, 2.0, 0.0],
            vec![0.0, 0.0, 5.0],
        ])
        .unwrap();
        assert_values(&a.eigenvalues(None).unwrap(), &[5.0, 3.0, 1.0]);
    }

    #[test]
    fn test_4x4_quartic_path() {
        // Two symmetric blocks: eigenvalues {3, 1} and {7, 3}.
        let a = Matrix::from_rows(vec![
            vec![2.0, 1.0, 0.0, 0.0],
            vec![1.0, 2.0, 0.0, 0.0],
            vec![0.0, 0.0, 5.0, 2.0],
            vec![0.0, 0.0, 2.0, 5.0],
        ])
        .unwrap();
        let values = a
            .eigenvalues(Some(EigenMethod::CharacteristicPolynomial))
            .unwrap();
        assert_values(&values, &[7.0, 3.0, 3.0, 1.0]);
    }

    #[test]
    fn test_rotation_matrix_unsupported() {
        // 90° rotation: eigenvalues ±i.
        let a = Matrix::from_rows(vec![vec![0.0, -1.0], vec![1.0, 0.0]]).unwrap();
        let err = a.eigenvalues(None).unwrap_err();
        assert!(matches!(err, MatrixError::EigenUnsupported { .. }));
    }

    #[test]
    fn test_jacobi_matches_closed_form() {
        let a = Matrix::from_rows(vec![
            vec![4.0, 1.0, 1.0],
            vec![1.0, 4.0, 1.0],
            vec![1.0, 1.0, 4.0],
        ])
        .unwrap();
        let jacobi = a.eigenvalues(Some(EigenMethod::Jacobi)).unwrap();
        // Known spectrum: 6, 3, 3.
        assert_values(&jacobi, &[6.0, 3.0, 3.0]);
    }

    #[test]
    fn test_jacobi_rejects_non_symmetric() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert!(matches!(
            a.eigenvalues(Some(EigenMethod::Jacobi)).unwrap_err(),
            MatrixError::NotSymmetric
        ));
    }

    #[test]
    fn test_explicit_triangular_rejects_dense() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert!(a.eigenvalues(Some(EigenMethod::Triangular)).is_err());
    }

    #[test]
    fn test_polynomial_method_rejects_large() {
        let a = Matrix::identity(5);
        assert!(a
            .eigenvalues(Some(EigenMethod::CharacteristicPolynomial))
            .is_err());
    }

    #[test]
    fn test_eigenvalues_not_square() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        assert!(a.eigenvalues(None).unwrap_err().is_shape_error());
    }

    #[test]
    fn test_eigenvectors_diagonal() {
        let a = Matrix::diagonal(&ndarray::array![2.0, 5.0]);
        let values = a.eigenvalues(None).unwrap();
        let vectors = a.eigenvectors(None).unwrap();
        assert_values(&values, &[5.0, 2.0]);
        // λ=5 → e₁, λ=2 → e₀ (up to sign).
        assert_relative_eq!(vectors[0][1].abs(), 1.0, epsilon = 1e-8);
        assert_relative_eq!(vectors[1][0].abs(), 1.0, epsilon = 1e-8);
    }

    #[test]
    fn test_eigenvector_property() {
        let a = Matrix::from_rows(vec![vec![2.0, 1.0], vec![1.0, 2.0]]).unwrap();
        let values = a.eigenvalues(None).unwrap();
        let vectors = a.eigenvectors(None).unwrap();
        for (lambda, v) in values.iter().zip(&vectors) {
            let av = a.mul_vector(v).unwrap();
            for i in 0..2 {
                assert_relative_eq!(av[i], lambda * v[i], epsilon = 1e-7);
            }
        }
    }

    #[test]
    fn test_eigenvectors_with_repeated_eigenvalue() {
        let a = Matrix::from_rows(vec![
            vec![4.0, 1.0, 1.0],
            vec![1.0, 4.0, 1.0],
            vec![1.0, 1.0, 4.0],
        ])
        .unwrap();
        let values = a.eigenvalues(Some(EigenMethod::Jacobi)).unwrap();
        let vectors = a.eigenvectors(Some(EigenMethod::Jacobi)).unwrap();
        assert_eq!(vectors.len(), 3);
        // The two λ=3 eigenvectors span a 2-dimensional space and must be
        // distinct basis vectors.
        let dot = vectors[1].dot(&vectors[2]).abs();
        assert!(dot < 0.999, "repeated eigenvalue produced duplicate vectors");
        for (lambda, v) in values.iter().zip(&vectors) {
            let av = a.mul_vector(v).unwrap();
            for i in 0..3 {
                assert_relative_eq!(av[i], lambda * v[i], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_characteristic_polynomial_coefficients() {
        // A = [[2,1],[1,2]] → λ² − 4λ + 3.
        let a = ndarray::array![[2.0, 1.0], [1.0, 2.0]];
        let coeffs = characteristic_polynomial(&a);
        assert_values(&coeffs, &[1.0, -4.0, 3.0]);
    }

    #[test]
    fn test_cubic_three_real_roots() {
        // (y-1)(y-2)(y-3) = y³ - 6y² + 11y - 6
        let mut roots = real_roots_cubic(-6.0, 11.0, -6.0);
        roots.sort_by(|a, b| a.total_cmp(b));
        assert_values(&roots, &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_cubic_single_real_root() {
        // y³ - 1 has one real root.
        let roots = real_roots_cubic(0.0, 0.0, -1.0);
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_quartic_real_roots() {
        // (y²-1)(y²-4) = y⁴ - 5y² + 4 (biquadratic path)
        let mut roots = real_roots_quartic(0.0, -5.0, 0.0, 4.0).unwrap();
        roots.sort_by(|a, b| a.total_cmp(b));
        assert_values(&roots, &[-2.0, -1.0, 1.0, 2.0]);

        // (y-1)(y-2)(y-3)(y-4) = y⁴ -10y³ +35y² -50y +24 (general path)
        let mut roots = real_roots_quartic(-10.0, 35.0, -50.0, 24.0).unwrap();
        roots.sort_by(|a, b| a.total_cmp(b));
        assert_values(&roots, &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_quartic_complex_pair_detected() {
        // y⁴ + 1 has no real roots.
        assert!(real_roots_quartic(0.0, 0.0, 0.0, 1.0).is_none());
    }
}
