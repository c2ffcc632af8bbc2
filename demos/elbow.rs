//! Elbow and silhouette analysis of synthetic blobs
//!
//! Run with: RUST_LOG=debug cargo run --example elbow --release

use kmeanseval::{EvaluatorConfig, KMeansEvaluator, MetricKind, Reduction, TextChart};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Generate synthetic data: 4 clusters in 2D
    let n_samples = 400;
    let n_features = 2;
    let centers = [[-5.0f32, -5.0], [0.0, 5.0], [5.0, -5.0], [8.0, 6.0]];

    println!(
        "Generating {} samples around {} centers...\n",
        n_samples,
        centers.len()
    );

    let noise = Array2::random((n_samples, n_features), Uniform::new(-1.0f32, 1.0));
    let mut data = Array2::<f32>::zeros((n_samples, n_features));
    for i in 0..n_samples {
        let center = centers[i % centers.len()];
        data[[i, 0]] = center[0] + noise[[i, 0]];
        data[[i, 1]] = center[1] + noise[[i, 1]];
    }

    let config = EvaluatorConfig::new(2..=8).with_seed(42);
    let mut evaluator = KMeansEvaluator::with_config(data.view(), config);
    let mut sink = TextChart::stdout();

    evaluator.get_metrics(MetricKind::Wss)?;
    evaluator.plot_elbow(&mut sink)?;

    let scores = evaluator.get_metrics(MetricKind::AvgSilhouette)?;
    let best = scores
        .points(Reduction::Mean)
        .into_iter()
        .max_by(|a, b| a.1.total_cmp(&b.1));
    evaluator.plot_avg_silhouette_scores(&mut sink)?;

    if let Some((k, score)) = best {
        println!("Highest average silhouette: k = {} ({:.4})\n", k, score);

        // Per-cluster view of the winning k only
        let per_point = evaluator.compute(&[k], MetricKind::Silhouette)?;
        evaluator.plot(&per_point, &mut sink)?;
    }

    Ok(())
}
