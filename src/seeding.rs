use log::trace;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};
use rand::Rng;

use crate::distance::sq_dist;

/// Picks `k` well-separated starting centroids from the rows of `x`.
///
/// The first centroid is drawn uniformly from the first `min(k, n)` rows.
/// Every further centroid is the point farthest (by squared distance) from
/// its nearest already-chosen centroid; ties go to the lowest row index.
///
/// Returns `None` when `k < 2` or `k` exceeds the number of rows. The
/// centroids are copies, so mutating them never touches `x`.
pub fn kmeans_plus_plus<S, R>(x: &ArrayBase<S, Ix2>, k: usize, rng: &mut R) -> Option<Array2<f64>>
where
    S: Data<Elem = f64>,
    R: Rng + ?Sized,
{
    let n_samples = x.len_of(Axis(0));
    let n_features = x.len_of(Axis(1));
    if k < 2 || k > n_samples {
        return None;
    }

    let mut centroids = Array2::<f64>::zeros((k, n_features));
    let first = rng.gen_range(0..k.min(n_samples));
    centroids.row_mut(0).assign(&x.row(first));
    trace!("seed 0 <- row {}", first);

    // Distance from every point to its nearest chosen centroid so far.
    let mut nearest: Array1<f64> = x
        .axis_iter(Axis(0))
        .map(|p| sq_dist(&p, &centroids.row(0)))
        .collect();

    for c in 1..k {
        let mut best = 0;
        let mut best_dist = f64::NEG_INFINITY;
        for (i, &d) in nearest.iter().enumerate() {
            if d > best_dist {
                best_dist = d;
                best = i;
            }
        }
        centroids.row_mut(c).assign(&x.row(best));
        trace!("seed {} <- row {} (distance {})", c, best, best_dist);

        let chosen = centroids.row(c);
        nearest
            .iter_mut()
            .zip(x.axis_iter(Axis(0)))
            .for_each(|(d, p)| *d = d.min(sq_dist(&p, &chosen)));
    }

    Some(centroids)
}
