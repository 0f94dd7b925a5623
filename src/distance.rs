use ndarray::{Array1, ArrayBase, Axis, Data, Ix1, Ix2};

use crate::error::{Error, Result};

/// Squared Euclidean distance between two points of equal dimension.
pub fn squared_distance<S1, S2>(p: &ArrayBase<S1, Ix1>, q: &ArrayBase<S2, Ix1>) -> Result<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    if p.len() != q.len() {
        return Err(Error::DimensionMismatch {
            expected: p.len(),
            found: q.len(),
        });
    }
    Ok(sq_dist(p, q))
}

/// Unchecked variant for callers that already validated the shapes.
pub(crate) fn sq_dist<S1, S2>(p: &ArrayBase<S1, Ix1>, q: &ArrayBase<S2, Ix1>) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    p.iter().zip(q.iter()).map(|(a, b)| (a - b) * (a - b)).sum()
}

/// Per-dimension arithmetic mean of a group of points (one point per row).
pub fn centroid<S>(points: &ArrayBase<S, Ix2>) -> Result<Array1<f64>>
where
    S: Data<Elem = f64>,
{
    points.mean_axis(Axis(0)).ok_or(Error::EmptyGroup)
}
