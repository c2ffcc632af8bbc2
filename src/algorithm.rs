use crate::config::KMeansConfig;
use crate::distance::{compute_centroid_shift, find_nearest_centroids, squared_euclidean};
use crate::error::KMeansError;
use log::{debug, trace, warn};
use ndarray::{Array1, Array2, ArrayView2};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Result of one k-means run
pub struct KMeansRun {
    pub centroids: Array2<f32>,
    pub labels: Array1<usize>,
    pub inertia: f64,
    pub n_iterations: usize,
}

/// Run k-means `config.n_init` times and keep the run with the lowest inertia.
///
/// Run `i` is seeded with `config.seed + i`, so the outcome is fully determined
/// by the data, `k` and the configuration.
pub fn kmeans_best_of(
    data: &ArrayView2<f32>,
    k: usize,
    config: &KMeansConfig,
) -> Result<KMeansRun, KMeansError> {
    let n_samples = data.nrows();

    if k == 0 {
        return Err(KMeansError::InvalidK(
            "k must be greater than 0".to_string(),
        ));
    }

    if n_samples < k {
        return Err(KMeansError::InsufficientData(format!(
            "Number of samples ({}) is less than k ({})",
            n_samples, k
        )));
    }

    let n_init = config.n_init.max(1);
    let mut best: Option<KMeansRun> = None;
    for init in 0..n_init {
        let seed = config.seed.wrapping_add(init as u64);
        let run = kmeans_lloyd(data, k, config, seed);

        debug!(
            "k-means run {}/{} (k={}): inertia = {:.6}, {} iterations",
            init + 1,
            n_init,
            k,
            run.inertia,
            run.n_iterations
        );

        let improved = best
            .as_ref()
            .map_or(true, |current| run.inertia < current.inertia);
        if improved {
            best = Some(run);
        }
    }

    best.ok_or_else(|| KMeansError::InvalidK("n_init must be greater than 0".to_string()))
}

/// Single seeded run: k-means++ seeding followed by Lloyd iterations.
///
/// The returned labels are the final assignment step and the centroids are the
/// means of those labels, so the inertia is exactly the WSS of the labels.
pub fn kmeans_lloyd(
    data: &ArrayView2<f32>,
    k: usize,
    config: &KMeansConfig,
    seed: u64,
) -> KMeansRun {
    let n_samples = data.nrows();
    let n_features = data.ncols();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut centroids = initialize_centroids(data, k, &mut rng);

    let mut labels = Array1::zeros(n_samples);
    let mut n_iterations = 0;

    for iteration in 0..config.max_iters {
        n_iterations = iteration + 1;

        labels = find_nearest_centroids(data, &centroids.view());

        // Accumulate cluster sums and counts
        let mut cluster_sums: Array2<f64> = Array2::zeros((k, n_features));
        let mut cluster_counts = vec![0usize; k];
        for (i, &label) in labels.iter().enumerate() {
            cluster_counts[label] += 1;
            for j in 0..n_features {
                cluster_sums[[label, j]] += data[[i, j]] as f64;
            }
        }

        // Compute new centroids
        let prev_centroids = centroids.clone();
        let mut empty_clusters = Vec::new();

        for cluster_idx in 0..k {
            let count = cluster_counts[cluster_idx];
            if count > 0 {
                for j in 0..n_features {
                    centroids[[cluster_idx, j]] =
                        (cluster_sums[[cluster_idx, j]] / count as f64) as f32;
                }
            } else {
                empty_clusters.push(cluster_idx);
            }
        }

        let shift = compute_centroid_shift(&prev_centroids.view(), &centroids.view());
        trace!(
            "  Iteration {}/{}: shift = {:.6}",
            iteration + 1,
            config.max_iters,
            shift
        );

        // An empty cluster is reseeded and forces another assignment step
        if !empty_clusters.is_empty() {
            warn!(
                "Reseeding {} empty clusters at iteration {} (k={})",
                empty_clusters.len(),
                iteration + 1,
                k
            );
            reseed_empty_clusters(data, &mut centroids, &empty_clusters, &mut rng);
            continue;
        }

        if config.tol >= 0.0 && shift < config.tol {
            trace!(
                "  Converged after {} iterations (shift {:.6} < tol {:.6})",
                iteration + 1,
                shift,
                config.tol
            );
            break;
        }
    }

    let inertia: f64 = labels
        .iter()
        .enumerate()
        .map(|(i, &label)| squared_euclidean(&data.row(i), &centroids.row(label)))
        .sum();

    KMeansRun {
        centroids,
        labels,
        inertia,
        n_iterations,
    }
}

/// k-means++ seeding: the first centroid is a uniformly random point, every next
/// one is drawn with probability proportional to its squared distance to the
/// closest centroid chosen so far.
fn initialize_centroids(data: &ArrayView2<f32>, k: usize, rng: &mut ChaCha8Rng) -> Array2<f32> {
    let n_samples = data.nrows();
    let n_features = data.ncols();

    let mut centroids = Array2::zeros((k, n_features));
    let first = rng.gen_range(0..n_samples);
    centroids.row_mut(0).assign(&data.row(first));

    let mut min_dists: Vec<f64> = (0..n_samples)
        .map(|i| squared_euclidean(&data.row(i), &data.row(first)))
        .collect();

    for centroid_idx in 1..k {
        // All-zero weights mean every point already sits on a centroid
        let chosen = match WeightedIndex::new(&min_dists) {
            Ok(weights) => weights.sample(rng),
            Err(_) => rng.gen_range(0..n_samples),
        };
        centroids.row_mut(centroid_idx).assign(&data.row(chosen));

        for (i, dist) in min_dists.iter_mut().enumerate() {
            let d = squared_euclidean(&data.row(i), &data.row(chosen));
            if d < *dist {
                *dist = d;
            }
        }
    }

    centroids
}

/// Move each empty cluster onto a randomly chosen data point
fn reseed_empty_clusters(
    data: &ArrayView2<f32>,
    centroids: &mut Array2<f32>,
    empty_clusters: &[usize],
    rng: &mut ChaCha8Rng,
) {
    let indices: Vec<usize> = (0..data.nrows()).collect();
    let chosen: Vec<usize> = indices
        .choose_multiple(rng, empty_clusters.len())
        .cloned()
        .collect();

    for (&cluster_idx, &data_idx) in empty_clusters.iter().zip(chosen.iter()) {
        centroids.row_mut(cluster_idx).assign(&data.row(data_idx));
    }
}
