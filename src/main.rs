use ndarray::{Array1, Array2, Array3, Axis};
use ndarray_rand::RandomExt;
use palettekit::raster::{distinct_colors, pixels_to_points, points_to_pixels};
use palettekit::{KMeans, Pca};
use rand::distributions::Uniform;
use rand::prelude::*;
use rand_distr::Normal;

/// Synthetic RGB image: each pixel is one of `n_colors` base colors plus noise.
fn generate_image(height: usize, width: usize, n_colors: usize, rng: &mut StdRng) -> Array3<f64> {
    let palette = Array2::random_using((n_colors, 3), Uniform::new(0.0_f64, 1.0), rng);
    let noise = Normal::new(0.0, 0.02).expect("valid noise parameters");
    let pick = Uniform::new(0, n_colors);

    let mut image = Array3::<f64>::zeros((height, width, 3));
    for mut pixel in image.lanes_mut(Axis(2)) {
        let base = palette.row(pick.sample(rng));
        for (p, &b) in pixel.iter_mut().zip(base.iter()) {
            *p = (b + noise.sample(rng)).clamp(0.0, 1.0);
        }
    }
    image
}

fn mean_squared_error(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    (a - b).mapv(|v| v * v).mean().unwrap_or(0.0)
}

fn main() {
    env_logger::init();

    // Parameters for data generation
    let height = 120;
    let width = 160;
    let n_colors = 6; // Colors used to paint the image
    let n_clusters = 8; // Palette size after quantization

    let mut rng = StdRng::seed_from_u64(42);
    println!("Generating {}x{} image from {} base colors...", height, width, n_colors);
    let image = generate_image(height, width, n_colors, &mut rng);
    let points = match pixels_to_points(&image) {
        Ok(points) => points,
        Err(e) => {
            eprintln!("cannot flatten image: {}", e);
            std::process::exit(1);
        }
    };
    println!("Distinct colors before: {}", distinct_colors(&points));

    println!("Starting K-Means quantization with k = {}...", n_clusters);
    let kmeans = KMeans::new(n_clusters);
    let outcome = match kmeans.fit(&points, &mut rng) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("clustering failed: {}", e);
            std::process::exit(1);
        }
    };
    let converged = outcome.is_converged();
    let clustering = outcome.into_inner();
    println!(
        "Clustering {} after {} passes.",
        if converged { "converged" } else { "stopped" },
        clustering.iterations
    );
    let quantized = clustering.quantized();
    println!("Distinct colors after: {}", distinct_colors(&quantized));
    println!("Quantization MSE: {:.6}", mean_squared_error(&points, &quantized));
    println!("Final Centroids:\n{:.3}", clustering.centroids);
    println!("Cluster Assignment Counts:");
    for (cluster_id, count) in clustering.cluster_sizes().iter().enumerate() {
        println!("Cluster {}: {} points", cluster_id, count);
    }

    match points_to_pixels(&quantized, height, width) {
        Ok(raster) => println!("Quantized raster shape: {:?}", raster.dim()),
        Err(e) => eprintln!("cannot rebuild raster: {}", e),
    }

    println!("Fitting principal axes...");
    let pcs = match Pca::default().fit(&points) {
        Ok(pcs) => pcs,
        Err(e) => {
            eprintln!("principal axes failed: {}", e);
            std::process::exit(1);
        }
    };
    let ratio: Array1<f64> = pcs.explained_variance_ratio();
    println!("Eigenvalues: {:.3}", pcs.components().values());
    println!("Explained variance ratio: {:.4}", ratio);
    for c in 1..=pcs.n_components() {
        let reduced = pcs
            .project(&points, c)
            .and_then(|projected| pcs.reconstruct(&projected));
        match reduced {
            Ok(restored) => println!(
                "{} component(s): reconstruction MSE {:.6}",
                c,
                mean_squared_error(&points, &restored)
            ),
            Err(e) => eprintln!("projection onto {} components failed: {}", c, e),
        }
    }
}
