use ndarray::{Array1, ArrayView1, ArrayView2};
use rayon::prelude::*;

/// Squared Euclidean distance between two points, accumulated in f64
#[inline]
pub fn squared_euclidean(a: &ArrayView1<f32>, b: &ArrayView1<f32>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum()
}

/// Euclidean distance between two points
#[inline]
pub fn euclidean(a: &ArrayView1<f32>, b: &ArrayView1<f32>) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// Find the nearest centroid for each data point
///
/// Distances are accumulated in f64 from the raw coordinates, so points far from
/// the origin keep their resolution. Ties go to the lowest centroid index.
///
/// # Arguments
/// * `data` - Data points (n_data, n_features)
/// * `centroids` - All centroids (k, n_features)
///
/// # Returns
/// * `labels` - Cluster assignments for each data point (n_data,)
pub fn find_nearest_centroids(
    data: &ArrayView2<f32>,
    centroids: &ArrayView2<f32>,
) -> Array1<usize> {
    let labels: Vec<usize> = (0..data.nrows())
        .into_par_iter()
        .map(|i| {
            let x = data.row(i);
            let mut best_label = 0;
            let mut best_dist = f64::INFINITY;

            for (j, centroid) in centroids.outer_iter().enumerate() {
                let dist = squared_euclidean(&x, &centroid);
                if dist < best_dist {
                    best_dist = dist;
                    best_label = j;
                }
            }
            best_label
        })
        .collect();

    Array1::from_vec(labels)
}

/// Compute centroid shift (sum of L2 norms of centroid movements)
pub fn compute_centroid_shift(
    old_centroids: &ArrayView2<f32>,
    new_centroids: &ArrayView2<f32>,
) -> f64 {
    old_centroids
        .outer_iter()
        .zip(new_centroids.outer_iter())
        .map(|(old_c, new_c)| euclidean(&old_c, &new_c))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_find_nearest_centroids() {
        let data = array![[0.0f32, 0.0], [10.0, 10.0], [5.0, 5.0]];
        let centroids = array![[0.0f32, 0.0], [10.0, 10.0]];

        let labels = find_nearest_centroids(&data.view(), &centroids.view());

        assert_eq!(labels[0], 0);
        assert_eq!(labels[1], 1);
        // (5,5) is equidistant, the first centroid wins
        assert_eq!(labels[2], 0);
    }

    #[test]
    fn test_centroid_shift() {
        let old = array![[0.0f32, 0.0], [1.0, 1.0]];
        let new = array![[1.0f32, 0.0], [1.0, 1.0]];

        let shift = compute_centroid_shift(&old.view(), &new.view());
        assert_relative_eq!(shift, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_find_nearest_centroids_far_from_origin() {
        // Unit gaps at 1e4 from the origin
        let data = array![[10000.0f32, 0.0], [10000.0, 1.0], [10010.0, 0.0], [10010.0, 1.0]];
        let labels = find_nearest_centroids(&data.view(), &data.view());

        assert_eq!(labels, array![0, 1, 2, 3]);
    }

    #[test]
    fn test_euclidean() {
        let a = array![0.0f32, 0.0];
        let b = array![3.0f32, 4.0];
        assert_relative_eq!(euclidean(&a.view(), &b.view()), 5.0, epsilon = 1e-12);
        assert_eq!(squared_euclidean(&a.view(), &a.view()), 0.0);
    }
}
