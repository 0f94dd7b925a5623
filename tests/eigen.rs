use ndarray::{array, Array1, Array2, Axis};
use ndarray_rand::RandomExt;
use palettekit::{gram_matrix, Deflation, EigenMatrix, Error, Pca, PowerIteration};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::StandardNormal;

/// Points whose columns have standard deviations 3, 2, 1 and 0.5.
fn anisotropic(n: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let x = Array2::<f64>::random_using((n, 4), StandardNormal, &mut rng);
    x * &array![3.0, 2.0, 1.0, 0.5]
}

fn covariance(x: &Array2<f64>) -> Array2<f64> {
    gram_matrix(x) / x.nrows() as f64
}

fn norm(v: &Array1<f64>) -> f64 {
    v.dot(v).sqrt()
}

fn assert_orthonormal(eig: &EigenMatrix) {
    let product = eig.vectors().t().dot(eig.vectors());
    for ((i, j), &v) in product.indexed_iter() {
        let expected = if i == j { 1.0 } else { 0.0 };
        assert!((v - expected).abs() < 1e-3, "entry ({i}, {j}) = {v}");
    }
}

#[test]
fn diagonal_matrix_deflates_to_both_axes() {
    let m = array![[3.0, 0.0], [0.0, 1.0]];
    let first = PowerIteration::default().dominant(&m).unwrap().into_inner();
    assert!((first.value - 3.0).abs() < 1e-4);
    assert!((first.vector[0].abs() - 1.0).abs() < 1e-3);

    let eig = Deflation::default().decompose(&m).unwrap();
    assert_eq!(eig.len(), 2);
    assert!((eig.values()[1] - 1.0).abs() < 1e-4);
    assert!(eig.column(1)[0].abs() < 1e-3);
    assert!((eig.column(1)[1].abs() - 1.0).abs() < 1e-3);
}

#[test]
fn columns_are_orthonormal_for_symmetric_matrices() {
    for seed in 0..5 {
        let m = covariance(&anisotropic(300, seed));
        let eig = Deflation::default().decompose(&m).unwrap();
        assert_eq!(eig.len(), 4);
        assert_orthonormal(&eig);
        assert!(eig.values().windows(2).into_iter().all(|w| w[0] >= w[1]));
    }
}

#[test]
fn dominant_pair_satisfies_eigen_equation() {
    let m = covariance(&anisotropic(300, 9));
    let pair = PowerIteration::default().dominant(&m).unwrap().into_inner();
    let residual = norm(&(m.dot(&pair.vector) - &pair.vector * pair.value));
    assert!(residual < 1e-3, "residual {residual}");
    assert!((residual - pair.residual).abs() < 1e-9);
}

#[test]
fn projected_variance_is_non_increasing() {
    let x = anisotropic(500, 4);
    let pcs = Pca::default().fit(&x).unwrap();
    let projected = pcs.project(&x, 4).unwrap();
    let variances = projected.var_axis(Axis(0), 0.0);
    assert!(variances.windows(2).into_iter().all(|w| w[0] + 1e-9 >= w[1]));
    for (v, e) in variances.iter().zip(pcs.explained_variance().iter()) {
        assert!((v - e).abs() < 1e-3 * e.max(1.0));
    }
    let total: f64 = pcs.explained_variance_ratio().sum();
    assert!((total - 1.0).abs() < 1e-12);
}

#[test]
fn fewer_axes_lose_some_detail() {
    let x = anisotropic(200, 2);
    let pcs = Pca::default().fit(&x).unwrap();
    let err = |c: usize| {
        let back = pcs.reconstruct(&pcs.project(&x, c).unwrap()).unwrap();
        (&x - &back).mapv(|v| v * v).sum()
    };
    assert!(err(1) > err(2));
    assert!(err(2) > err(3));
    assert!(err(4) < 1e-3 * err(1));
}

#[test]
fn non_square_matrix_is_rejected() {
    let m = Array2::<f64>::zeros((3, 2));
    assert_eq!(
        Deflation::default().decompose(&m).unwrap_err(),
        Error::NotSquare { rows: 3, cols: 2 }
    );
}
