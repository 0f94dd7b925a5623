use log::{trace, warn};
use ndarray::{Array1, ArrayBase, Data, Ix2};

use crate::error::{Error, Result};
use crate::outcome::Outcome;

/// A start vector whose image is this small, relative to the largest matrix
/// entry, is treated as lying in the null space.
const NULL_IMAGE: f64 = 1e-10;

/// Power-iteration settings for the dominant eigenpair of a symmetric matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerIteration {
    pub max_iter: usize,
    /// Stop once successive unit vectors are closer than this.
    pub tolerance: f64,
}

impl Default for PowerIteration {
    fn default() -> Self {
        PowerIteration {
            max_iter: 100,
            tolerance: 1e-5,
        }
    }
}

/// Eigenvalue, unit eigenvector and how well they satisfy `Mv = λv`.
#[derive(Debug, Clone, PartialEq)]
pub struct Eigenpair {
    pub value: f64,
    pub vector: Array1<f64>,
    /// `‖Mv − λv‖` for the returned pair.
    pub residual: f64,
    pub iterations: usize,
}

fn norm(v: &Array1<f64>) -> f64 {
    v.dot(v).sqrt()
}

pub(crate) fn check_square<S: Data<Elem = f64>>(m: &ArrayBase<S, Ix2>) -> Result<usize> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(Error::NotSquare { rows, cols });
    }
    if rows == 0 {
        return Err(Error::EmptyInput);
    }
    Ok(rows)
}

impl PowerIteration {
    /// Dominant eigenpair of the symmetric matrix `m`.
    ///
    /// Iteration starts from the all-ones vector. If `m` maps it to zero the
    /// standard basis vectors are tried in order. The eigenvalue is the
    /// Rayleigh quotient `vᵗMv`. Running out of iterations is not an error:
    /// the last estimate comes back as [`Outcome::Exhausted`], and its
    /// residual tells how far off it is.
    pub fn dominant<S>(&self, m: &ArrayBase<S, Ix2>) -> Result<Outcome<Eigenpair>>
    where
        S: Data<Elem = f64>,
    {
        let n = check_square(m)?;
        let scale = m.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));

        let start = std::iter::once(Array1::<f64>::ones(n))
            .chain((0..n).map(|i| {
                let mut e = Array1::<f64>::zeros(n);
                e[i] = 1.0;
                e
            }))
            .find(|s| norm(&m.dot(s)) > NULL_IMAGE * scale * norm(s));

        let Some(v) = start else {
            // Every start vector is annihilated: m is numerically zero.
            let vector = Array1::<f64>::ones(n) / (n as f64).sqrt();
            return Ok(Outcome::Converged(Eigenpair {
                value: 0.0,
                vector,
                residual: 0.0,
                iterations: 0,
            }));
        };
        self.dominant_from(m, v)
    }

    /// Power iteration on `m` starting from `start` instead of all-ones.
    pub fn dominant_from<S>(&self, m: &ArrayBase<S, Ix2>, start: Array1<f64>) -> Result<Outcome<Eigenpair>>
    where
        S: Data<Elem = f64>,
    {
        let n = check_square(m)?;
        if start.len() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: start.len(),
            });
        }
        let mut v = start;
        let mut converged = false;
        let mut iterations = 0;
        while iterations < self.max_iter {
            iterations += 1;
            let y = m.dot(&v);
            let y_norm = norm(&y);
            if y_norm == 0.0 {
                converged = true;
                break;
            }
            let candidate = y / y_norm;
            let shift = norm(&(&v - &candidate));
            v = candidate;
            trace!("power iteration {}: shift {:e}", iterations, shift);
            if shift < self.tolerance {
                converged = true;
                break;
            }
        }

        let v_norm = norm(&v);
        if v_norm != 1.0 && v_norm > 0.0 {
            v /= v_norm;
        }
        let mv = m.dot(&v);
        let value = v.dot(&mv);
        let residual = norm(&(&mv - &(&v * value)));
        let pair = Eigenpair {
            value,
            vector: v,
            residual,
            iterations,
        };

        if converged {
            Ok(Outcome::Converged(pair))
        } else {
            warn!(
                "power iteration stopped after {} iterations (residual {:e})",
                iterations, pair.residual
            );
            Ok(Outcome::Exhausted(pair))
        }
    }
}
