use crate::algorithm::kmeans_best_of;
use crate::config::KMeansConfig;
use crate::error::{BoxError, KMeansError};
use crate::provider::{ClusterAssignment, ClusteringProvider};
use ndarray::ArrayView2;

/// The built-in clustering provider: seeded k-means++ with Lloyd iterations.
///
/// It keeps no fitted state, so one instance serves every `k` of an evaluation.
///
/// # Example
///
/// ```
/// use kmeanseval::{KMeans, KMeansConfig};
/// use ndarray::array;
///
/// let data = array![[0.0f32, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]];
///
/// let kmeans = KMeans::with_config(KMeansConfig::default().with_seed(42));
/// let assignment = kmeans.fit_predict(&data.view(), 2).unwrap();
///
/// assert_eq!(assignment.labels[0], assignment.labels[1]);
/// assert_ne!(assignment.labels[0], assignment.labels[2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct KMeans {
    config: KMeansConfig,
}

impl KMeans {
    /// Create a new KMeans instance with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new KMeans instance with custom configuration.
    pub fn with_config(config: KMeansConfig) -> Self {
        Self { config }
    }

    /// Cluster `data` into `k` clusters and return labels and centroids.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `k` is 0
    /// - Number of samples is less than k
    pub fn fit_predict(
        &self,
        data: &ArrayView2<f32>,
        k: usize,
    ) -> Result<ClusterAssignment, KMeansError> {
        let run = kmeans_best_of(data, k, &self.config)?;
        Ok(ClusterAssignment::new(run.labels, run.centroids))
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }
}

impl ClusteringProvider for KMeans {
    fn fit(&self, data: ArrayView2<f32>, k: usize) -> Result<ClusterAssignment, BoxError> {
        Ok(self.fit_predict(&data, k)?)
    }
}
