use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};
use rand::Rng;

use crate::distance::{centroid, sq_dist};
use crate::error::{Error, Result};
use crate::outcome::Outcome;
use crate::seeding::kmeans_plus_plus;

/// Default assignment-pass budget.
pub const DEFAULT_MAX_ITER: usize = 200;

/// Standard K-Means clustering with k-means++ seeding.
#[derive(Debug, Clone)]
pub struct KMeans {
    pub n_clusters: usize,
    pub max_iter: usize,
}

/// A finished (or budget-exhausted) clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// One centroid per row.
    pub centroids: Array2<f64>,
    /// Centroid index of every input point, in input order.
    pub labels: Array1<usize>,
    /// Number of assignment passes performed, including the confirming one.
    pub iterations: usize,
}

impl Clustering {
    /// Replacement matrix: every point swapped for its centroid.
    pub fn quantized(&self) -> Array2<f64> {
        let indices = self.labels.to_vec();
        self.centroids.select(Axis(0), &indices)
    }

    /// Number of points assigned to each centroid.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut counts = vec![0; self.centroids.nrows()];
        self.labels.iter().for_each(|&label| counts[label] += 1);
        counts
    }
}

impl KMeans {
    /// Creates a new KMeans instance with the default iteration budget.
    pub fn new(n_clusters: usize) -> Self {
        KMeans {
            n_clusters,
            max_iter: DEFAULT_MAX_ITER,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    fn validate<S: Data<Elem = f64>>(&self, x: &ArrayBase<S, Ix2>) -> Result<()> {
        let n_samples = x.len_of(Axis(0));
        if n_samples == 0 || x.len_of(Axis(1)) == 0 {
            return Err(Error::EmptyInput);
        }
        if self.n_clusters < 2 || self.n_clusters > n_samples {
            return Err(Error::InvalidClusterCount {
                requested: self.n_clusters,
                n_points: n_samples,
            });
        }
        Ok(())
    }

    /// Fits the model to the data and returns centroids and labels.
    ///
    /// Runs until an assignment pass reproduces the previous assignment, or
    /// until `max_iter` passes have run, in which case the last assignment and
    /// the centroids it was made against are returned as [`Outcome::Exhausted`].
    ///
    /// A centroid left without points keeps its previous coordinates.
    pub fn fit<S, R>(&self, x: &ArrayBase<S, Ix2>, rng: &mut R) -> Result<Outcome<Clustering>>
    where
        S: Data<Elem = f64>,
        R: Rng + ?Sized,
    {
        self.validate(x)?;
        let mut centroids =
            kmeans_plus_plus(x, self.n_clusters, rng).ok_or(Error::InvalidClusterCount {
                requested: self.n_clusters,
                n_points: x.nrows(),
            })?;
        let mut labels: Option<Array1<usize>> = None;

        for iteration in 1..=self.max_iter {
            let new_labels = assign_labels(x, &centroids);
            if labels.as_ref() == Some(&new_labels) {
                debug!("k-means converged after {} passes", iteration);
                return Ok(Outcome::Converged(Clustering {
                    centroids,
                    labels: new_labels,
                    iterations: iteration,
                }));
            }

            let changed = labels.as_ref().map_or(new_labels.len(), |old| {
                old.iter().zip(new_labels.iter()).filter(|(a, b)| a != b).count()
            });
            debug!("k-means pass {}: {} points reassigned", iteration, changed);

            if iteration == self.max_iter {
                // Keep the centroids this assignment was made against.
                labels = Some(new_labels);
                break;
            }
            self.recenter(x, &new_labels, &mut centroids)?;
            labels = Some(new_labels);
        }

        warn!(
            "k-means did not converge within {} passes; returning last assignment",
            self.max_iter
        );
        let labels = labels.unwrap_or_else(|| assign_labels(x, &centroids));
        Ok(Outcome::Exhausted(Clustering {
            centroids,
            labels,
            iterations: self.max_iter,
        }))
    }

    /// Clusters `x` and replaces every row with its centroid.
    pub fn quantize<S, R>(&self, x: &ArrayBase<S, Ix2>, rng: &mut R) -> Result<Outcome<Array2<f64>>>
    where
        S: Data<Elem = f64>,
        R: Rng + ?Sized,
    {
        Ok(self.fit(x, rng)?.map(|c| c.quantized()))
    }

    /// Predicts the closest centroid for each sample in `x`.
    pub fn predict<S1, S2>(
        &self,
        x: &ArrayBase<S1, Ix2>,
        centroids: &ArrayBase<S2, Ix2>,
    ) -> Result<Array1<usize>>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
    {
        if x.ncols() != centroids.ncols() {
            return Err(Error::DimensionMismatch {
                expected: centroids.ncols(),
                found: x.ncols(),
            });
        }
        if centroids.nrows() == 0 {
            return Err(Error::EmptyInput);
        }
        Ok(assign_labels(x, centroids))
    }

    /// Moves every centroid to the mean of its members.
    fn recenter<S>(
        &self,
        x: &ArrayBase<S, Ix2>,
        labels: &Array1<usize>,
        centroids: &mut Array2<f64>,
    ) -> Result<()>
    where
        S: Data<Elem = f64>,
    {
        for (j, mut c) in centroids.axis_iter_mut(Axis(0)).enumerate() {
            let members: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter(|&(_, &label)| label == j)
                .map(|(idx, _)| idx)
                .collect();
            match centroid(&x.select(Axis(0), &members)) {
                Ok(mean) => c.assign(&mean),
                Err(Error::EmptyGroup) => debug!("cluster {} is empty; keeping its centroid", j),
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// Assigns each sample to its closest centroid; the lowest index wins ties.
fn assign_labels<S1, S2>(x: &ArrayBase<S1, Ix2>, centroids: &ArrayBase<S2, Ix2>) -> Array1<usize>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    x.axis_iter(Axis(0))
        .map(|p| {
            let mut min_dist = f64::INFINITY;
            let mut min_j = 0;
            for (j, c) in centroids.axis_iter(Axis(0)).enumerate() {
                let dist = sq_dist(&p, &c);
                if dist < min_dist {
                    min_dist = dist;
                    min_j = j;
                }
            }
            min_j
        })
        .collect()
}
