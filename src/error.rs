use crate::metrics::MetricKind;
use thiserror::Error;

/// Boxed error raised by a collaborator (clustering provider or chart sink).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type used by the evaluator.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Error types for the evaluator
#[derive(Error, Debug)]
pub enum EvalError {
    /// The dataset has no points
    #[error("Empty dataset: at least one point is required")]
    EmptyDataset,

    /// The k range is empty or holds a value the requested metric cannot use
    #[error("Invalid k range: {0}")]
    InvalidRange(String),

    /// The metric name does not match any supported metric
    #[error("Unsupported metric: {0:?} (expected \"wss\", \"silhouette_sample\" or \"silhouette_score\")")]
    UnsupportedMetric(String),

    /// A plot was requested before the matching series was computed
    #[error("No {0} series computed yet. Call get_metrics() first.")]
    NoSeries(MetricKind),

    /// The clustering provider returned labels or centroids that do not fit the data
    #[error("Invalid cluster assignment for k = {k}: {reason}")]
    InvalidAssignment { k: usize, reason: String },

    /// Failure raised by the clustering provider
    #[error(transparent)]
    Clustering(BoxError),

    /// Failure raised by the chart sink
    #[error(transparent)]
    Render(BoxError),
}

/// Error types for the built-in k-means provider
#[derive(Error, Debug)]
pub enum KMeansError {
    /// The number of clusters k is invalid (must be > 0)
    #[error("Invalid k value: {0}")]
    InvalidK(String),

    /// Not enough data points for the requested number of clusters
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}
