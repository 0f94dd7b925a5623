//! Principal axes of a point matrix, built on [`Deflation`].

use log::debug;
use ndarray::{s, Array1, Array2, ArrayBase, Axis, Data, Ix2};

use crate::deflation::{Deflation, EigenMatrix};
use crate::error::{Error, Result};

/// `XᵗX` for a point matrix with one point per row (D × D, symmetric).
pub fn gram_matrix<S>(x: &ArrayBase<S, Ix2>) -> Array2<f64>
where
    S: Data<Elem = f64>,
{
    x.t().dot(x)
}

/// Eigenvectors of the Gram matrix of `x`, without centring.
pub fn gram_eigen_matrix<S>(x: &ArrayBase<S, Ix2>) -> Result<EigenMatrix>
where
    S: Data<Elem = f64>,
{
    if x.is_empty() {
        return Err(Error::EmptyInput);
    }
    Deflation::default().decompose(&gram_matrix(x))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pca {
    /// Subtract the column means before forming the Gram matrix.
    pub center: bool,
    pub deflation: Deflation,
}

impl Default for Pca {
    fn default() -> Self {
        Pca {
            center: true,
            deflation: Deflation::default(),
        }
    }
}

/// Fitted principal axes.
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalComponents {
    mean: Array1<f64>,
    eigen: EigenMatrix,
    n_points: usize,
}

impl Pca {
    pub fn fit<S>(&self, x: &ArrayBase<S, Ix2>) -> Result<PrincipalComponents>
    where
        S: Data<Elem = f64>,
    {
        let (n_points, n_features) = x.dim();
        if n_points == 0 || n_features == 0 {
            return Err(Error::EmptyInput);
        }
        let mean = if self.center {
            x.mean_axis(Axis(0)).ok_or(Error::EmptyInput)?
        } else {
            Array1::zeros(n_features)
        };
        let centered = x - &mean;
        let eigen = self.deflation.decompose(&gram_matrix(&centered))?;
        debug!(
            "fitted {} of {} principal axes on {} points",
            eigen.len(),
            n_features,
            n_points
        );
        Ok(PrincipalComponents {
            mean,
            eigen,
            n_points,
        })
    }
}

impl PrincipalComponents {
    pub fn components(&self) -> &EigenMatrix {
        &self.eigen
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn n_components(&self) -> usize {
        self.eigen.len()
    }

    /// Variance captured along each axis (eigenvalue over point count).
    pub fn explained_variance(&self) -> Array1<f64> {
        self.eigen.values() / self.n_points as f64
    }

    /// Share of the total captured variance carried by each axis.
    pub fn explained_variance_ratio(&self) -> Array1<f64> {
        let total = self.eigen.values().sum();
        if total > 0.0 {
            self.eigen.values() / total
        } else {
            Array1::zeros(self.eigen.len())
        }
    }

    /// Coordinates of `x` along the first `n_components` axes.
    ///
    /// Asking for more axes than were kept yields all of them.
    pub fn project<S>(&self, x: &ArrayBase<S, Ix2>, n_components: usize) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        if x.ncols() != self.eigen.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.eigen.dim(),
                found: x.ncols(),
            });
        }
        let c = n_components.min(self.eigen.len());
        let axes = self.eigen.vectors().slice(s![.., ..c]);
        Ok((x - &self.mean).dot(&axes))
    }

    /// Maps projected coordinates back into the original space.
    pub fn reconstruct<S>(&self, projected: &ArrayBase<S, Ix2>) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        let c = projected.ncols();
        if c > self.eigen.len() {
            return Err(Error::DimensionMismatch {
                expected: self.eigen.len(),
                found: c,
            });
        }
        let axes = self.eigen.vectors().slice(s![.., ..c]);
        Ok(projected.dot(&axes.t()) + &self.mean)
    }
}
