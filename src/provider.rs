//! The clustering seam.
//!
//! The evaluator never clusters on its own. For every candidate `k` it asks a
//! [`ClusteringProvider`] for a [`ClusterAssignment`] and derives its metrics from
//! that. The built-in provider is [`KMeans`](crate::KMeans); tests and callers can
//! plug in anything else, including a plain closure:
//!
//! ```
//! use kmeanseval::{BoxError, ClusterAssignment, ClusteringProvider};
//! use ndarray::{array, Array1, Array2, ArrayView2};
//!
//! // Puts every point in cluster 0 with the origin as the only centroid
//! let provider = |data: ArrayView2<f32>, k: usize| -> Result<ClusterAssignment, BoxError> {
//!     Ok(ClusterAssignment::new(
//!         Array1::zeros(data.nrows()),
//!         Array2::zeros((k, data.ncols())),
//!     ))
//! };
//!
//! let data = array![[1.0f32, 0.0], [0.0, 1.0]];
//! let assignment = provider.fit(data.view(), 1).unwrap();
//! assert_eq!(assignment.k(), 1);
//! ```

use crate::error::{BoxError, EvalError, Result};
use ndarray::{Array1, Array2, ArrayView2};

/// Labels and centroids produced by one clustering run
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    /// Cluster label of each point, in `0..k`
    pub labels: Array1<usize>,

    /// One centroid per cluster, shape (k, n_features)
    pub centroids: Array2<f32>,
}

impl ClusterAssignment {
    pub fn new(labels: Array1<usize>, centroids: Array2<f32>) -> Self {
        Self { labels, centroids }
    }

    /// Number of clusters
    pub fn k(&self) -> usize {
        self.centroids.nrows()
    }

    /// Number of points assigned to each cluster
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.k()];
        for &label in self.labels.iter() {
            if let Some(size) = sizes.get_mut(label) {
                *size += 1;
            }
        }
        sizes
    }

    /// Check that this assignment describes `data` partitioned into `k` clusters.
    pub(crate) fn validate(&self, data: &ArrayView2<f32>, k: usize) -> Result<()> {
        let invalid = |reason: String| EvalError::InvalidAssignment { k, reason };

        if self.labels.len() != data.nrows() {
            return Err(invalid(format!(
                "expected {} labels, got {}",
                data.nrows(),
                self.labels.len()
            )));
        }

        if self.centroids.nrows() != k {
            return Err(invalid(format!(
                "expected {} centroids, got {}",
                k,
                self.centroids.nrows()
            )));
        }

        if self.centroids.ncols() != data.ncols() {
            return Err(invalid(format!(
                "expected centroids with {} features, got {}",
                data.ncols(),
                self.centroids.ncols()
            )));
        }

        if let Some(&label) = self.labels.iter().find(|&&label| label >= k) {
            return Err(invalid(format!("label {} is out of range", label)));
        }

        Ok(())
    }
}

/// Something that partitions a dataset into `k` clusters.
///
/// Implementations should be deterministic for a fixed configuration so that
/// metrics computed for different `k` are comparable.
pub trait ClusteringProvider {
    /// Cluster `data` (one point per row) into `k` clusters.
    fn fit(
        &self,
        data: ArrayView2<f32>,
        k: usize,
    ) -> std::result::Result<ClusterAssignment, BoxError>;
}

impl<F> ClusteringProvider for F
where
    F: Fn(ArrayView2<f32>, usize) -> std::result::Result<ClusterAssignment, BoxError>,
{
    fn fit(
        &self,
        data: ArrayView2<f32>,
        k: usize,
    ) -> std::result::Result<ClusterAssignment, BoxError> {
        self(data, k)
    }
}

impl ClusteringProvider for Box<dyn ClusteringProvider + '_> {
    fn fit(
        &self,
        data: ArrayView2<f32>,
        k: usize,
    ) -> std::result::Result<ClusterAssignment, BoxError> {
        (**self).fit(data, k)
    }
}
