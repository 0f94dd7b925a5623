use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Axis, Data, Ix2};

use crate::error::Result;
use crate::outcome::Outcome;
use crate::power::{check_square, Eigenpair, PowerIteration};

/// Builds an eigenvector matrix by repeated power iteration and deflation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deflation {
    pub power: PowerIteration,
    /// Eigenvalues below this are treated as zero and end the decomposition.
    pub eigenvalue_floor: f64,
}

impl Default for Deflation {
    fn default() -> Self {
        Deflation {
            power: PowerIteration::default(),
            eigenvalue_floor: 1e-5,
        }
    }
}

/// Unit eigenvectors stored as columns, ordered by non-increasing eigenvalue.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenMatrix {
    vectors: Array2<f64>,
    values: Array1<f64>,
    residuals: Array1<f64>,
    exhausted: usize,
}

impl EigenMatrix {
    /// D × C matrix whose columns are the eigenvectors.
    pub fn vectors(&self) -> &Array2<f64> {
        &self.vectors
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// `‖Mv − λv‖` of each column against the matrix it was extracted from.
    pub fn residuals(&self) -> &Array1<f64> {
        &self.residuals
    }

    pub fn column(&self, i: usize) -> ArrayView1<'_, f64> {
        self.vectors.column(i)
    }

    /// Number of eigenvectors kept.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Dimension of the space the eigenvectors live in.
    pub fn dim(&self) -> usize {
        self.vectors.nrows()
    }

    /// Columns whose power iteration ran out of budget.
    pub fn exhausted_columns(&self) -> usize {
        self.exhausted
    }
}

impl Deflation {
    /// Eigen-decomposes the symmetric matrix `m`.
    ///
    /// `m` is copied once into a working matrix; after each eigenpair
    /// `(λ, v)` is found the working matrix becomes `M − λvvᵗ`. Extraction
    /// stops once no start vector yields an eigenvalue above the floor, or
    /// when the working matrix has no entry above it.
    pub fn decompose<S>(&self, m: &ArrayBase<S, Ix2>) -> Result<EigenMatrix>
    where
        S: Data<Elem = f64>,
    {
        let d = check_square(m)?;
        let mut working = m.to_owned();
        let mut pairs = Vec::with_capacity(d);
        let mut exhausted = 0;

        for i in 0..d {
            let largest = working.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
            if largest < self.eigenvalue_floor {
                debug!("working matrix vanished after {} eigenpairs", i);
                break;
            }

            let Some(outcome) = self.dominant_above_floor(&working)? else {
                debug!("no eigenvalue above floor; stopping at {} columns", i);
                break;
            };
            if !outcome.is_converged() {
                exhausted += 1;
            }
            let pair = outcome.into_inner();

            let v = pair.vector.view().insert_axis(Axis(1));
            working.scaled_add(-pair.value, &v.dot(&v.t()));
            pairs.push(pair);
        }

        if exhausted > 0 {
            warn!("{} of {} eigenpairs did not converge", exhausted, pairs.len());
        }

        // Power iteration from a fixed start can surface a smaller eigenvalue first.
        pairs.sort_by(|a, b| b.value.total_cmp(&a.value));

        let c = pairs.len();
        let mut vectors = Array2::<f64>::zeros((d, c));
        for (mut col, pair) in vectors.axis_iter_mut(Axis(1)).zip(pairs.iter()) {
            col.assign(&pair.vector);
        }
        Ok(EigenMatrix {
            vectors,
            values: pairs.iter().map(|p| p.value).collect(),
            residuals: pairs.iter().map(|p| p.residual).collect(),
            exhausted,
        })
    }

    /// Largest eigenpair of `working` whose eigenvalue clears the floor.
    ///
    /// The all-ones start can sit on a tiny eigenvector while a large one
    /// remains, so the columns of `working` (largest norm first) are tried as
    /// further starts. `None` means no start reached the floor.
    fn dominant_above_floor(&self, working: &Array2<f64>) -> Result<Option<Outcome<Eigenpair>>> {
        let outcome = self.power.dominant(working)?;
        if outcome.value().value >= self.eigenvalue_floor {
            return Ok(Some(outcome));
        }
        debug!(
            "all-ones start gave eigenvalue {:e}; retrying from matrix columns",
            outcome.value().value
        );

        let mut columns: Vec<(f64, Array1<f64>)> = working
            .axis_iter(Axis(1))
            .map(|c| (c.dot(&c).sqrt(), c.to_owned()))
            .filter(|(n, _)| *n >= self.eigenvalue_floor)
            .collect();
        columns.sort_by(|a, b| b.0.total_cmp(&a.0));

        for (_, start) in columns {
            let outcome = self.power.dominant_from(working, start)?;
            if outcome.value().value >= self.eigenvalue_floor {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_orthonormal(eig: &EigenMatrix) {
        for i in 0..eig.len() {
            for j in 0..eig.len() {
                let dot = eig.column(i).dot(&eig.column(j));
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-3, "columns {i},{j}: {dot}");
            }
        }
    }

    #[test]
    fn diagonal_matrix_deflates_in_order() {
        let eig = Deflation::default().decompose(&array![[3.0, 0.0], [0.0, 1.0]]).unwrap();
        assert_eq!(eig.len(), 2);
        assert!((eig.values()[0] - 3.0).abs() < 1e-4);
        assert!((eig.values()[1] - 1.0).abs() < 1e-4);
        assert!((eig.column(0)[0].abs() - 1.0).abs() < 1e-3);
        assert!((eig.column(1)[1].abs() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn identity_yields_full_basis() {
        let eig = Deflation::default().decompose(&Array2::<f64>::eye(3)).unwrap();
        assert_eq!(eig.len(), 3);
        assert_orthonormal(&eig);
    }

    #[test]
    fn rank_deficient_matrix_drops_null_columns() {
        // Rank one: u uᵗ with u = (1, 2, 2).
        let u = array![1.0, 2.0, 2.0];
        let m = u.view().insert_axis(Axis(1)).dot(&u.view().insert_axis(Axis(0)));
        let eig = Deflation::default().decompose(&m).unwrap();
        assert_eq!(eig.len(), 1);
        assert_eq!(eig.dim(), 3);
        assert!((eig.values()[0] - 9.0).abs() < 1e-6);
    }

    #[test]
    fn ones_orthogonal_to_top_axis_is_reordered() {
        // Eigenvalues 1 along (1, 1) and 2 along (1, -1).
        let m = array![[1.5, -0.5], [-0.5, 1.5]];
        let eig = Deflation::default().decompose(&m).unwrap();
        assert_eq!(eig.len(), 2);
        assert!((eig.values()[0] - 2.0).abs() < 1e-4);
        assert!((eig.values()[1] - 1.0).abs() < 1e-4);
        assert_orthonormal(&eig);
    }

    #[test]
    fn ones_on_a_tiny_axis_does_not_hide_the_large_one() {
        // Eigenvalue 1e-6 along (1, 1) and 5 along (1, -1).
        let m = array![[2.5 + 5e-7, -2.5 + 5e-7], [-2.5 + 5e-7, 2.5 + 5e-7]];
        let eig = Deflation::default().decompose(&m).unwrap();
        assert_eq!(eig.len(), 1);
        assert!((eig.values()[0] - 5.0).abs() < 1e-4);
        assert!((eig.column(0)[0] + eig.column(0)[1]).abs() < 1e-4);
        assert_orthonormal(&eig);
    }

    #[test]
    fn zero_matrix_is_empty() {
        let eig = Deflation::default().decompose(&Array2::<f64>::zeros((2, 2))).unwrap();
        assert!(eig.is_empty());
        assert_eq!(eig.vectors().dim(), (2, 0));
    }

    #[test]
    fn symmetric_matrix_columns_are_orthonormal() {
        let m = array![
            [10.0, 0.5, 0.3, 0.1],
            [0.5, 6.0, 0.4, 0.2],
            [0.3, 0.4, 3.0, 0.3],
            [0.1, 0.2, 0.3, 1.0]
        ];
        let eig = Deflation::default().decompose(&m).unwrap();
        assert_eq!(eig.len(), 4);
        assert_orthonormal(&eig);
        let values = eig.values();
        assert!(values.windows(2).into_iter().all(|w| w[0] >= w[1]));
        assert!(eig.residuals()[0] < 1e-3);
    }
}
