//! Color quantization and principal-axis reduction for pixel data.
//!
//! Two independent pipelines operate on a point matrix (one point per row,
//! one dimension per column):
//!
//! - [`KMeans`] seeds centroids with a farthest-point k-means++ variant and
//!   iterates assignment/recentering until the assignment is stable.
//! - [`Deflation`] extracts eigenpairs of a symmetric matrix one at a time with
//!   [`PowerIteration`], and [`Pca`] uses it to find principal axes.
//!
//! Iteration-bounded algorithms return an [`Outcome`] so callers can tell a
//! converged result from a best effort.

pub mod deflation;
pub mod distance;
pub mod error;
pub mod kmeans;
pub mod outcome;
pub mod pca;
pub mod power;
pub mod raster;
pub mod seeding;

pub use deflation::{Deflation, EigenMatrix};
pub use distance::{centroid, squared_distance};
pub use error::{Error, Result};
pub use kmeans::{Clustering, KMeans};
pub use outcome::Outcome;
pub use pca::{gram_eigen_matrix, gram_matrix, Pca, PrincipalComponents};
pub use power::{Eigenpair, PowerIteration};
pub use seeding::kmeans_plus_plus;
