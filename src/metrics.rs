//! Cluster-quality metrics.
//!
//! Every metric is a pure function of the dataset and one cluster assignment.
//!
//! ## Within-cluster sum of squares
//!
//! ```text
//! WSS = Σ_i ||x_i - μ_label(i)||²
//! ```
//!
//! For a fixed dataset it tends to shrink as `k` grows, and reaches 0 once every
//! point has its own centroid. An elbow plot shows where the gains flatten out.
//!
//! ## Silhouette
//!
//! For point `i` with mean distance `a` to the other members of its cluster and
//! smallest mean distance `b` to the members of any other cluster:
//!
//! ```text
//! s(i) = (b - a) / max(a, b)
//! ```
//!
//! `s(i)` is 0 when the point's cluster is a singleton. Values lie in `[-1, 1]`,
//! higher meaning better separated.

use crate::distance::{euclidean, squared_euclidean};
use crate::error::{EvalError, Result};
use crate::provider::ClusterAssignment;
use ndarray::{Array1, ArrayView1, ArrayView2};
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;

/// The metrics the evaluator can compute for every k
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKind {
    /// Within-cluster sum of squared errors
    Wss,
    /// Per-point silhouette coefficients
    Silhouette,
    /// Mean silhouette coefficient over all points
    AvgSilhouette,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [
        MetricKind::Wss,
        MetricKind::Silhouette,
        MetricKind::AvgSilhouette,
    ];

    /// Canonical name, also accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        match self {
            MetricKind::Wss => "wss",
            MetricKind::Silhouette => "silhouette_sample",
            MetricKind::AvgSilhouette => "silhouette_score",
        }
    }

    /// Human-readable title used for chart axes
    pub fn title(self) -> &'static str {
        match self {
            MetricKind::Wss => "Within-cluster-sum of squared errors",
            MetricKind::Silhouette => "Silhouette coefficient values",
            MetricKind::AvgSilhouette => "Average silhouette score",
        }
    }

    /// Whether the metric is undefined for a single cluster
    pub fn requires_multiple_clusters(self) -> bool {
        matches!(self, MetricKind::Silhouette | MetricKind::AvgSilhouette)
    }

    /// Compute this metric for one assignment
    pub fn evaluate(
        self,
        data: &ArrayView2<f32>,
        assignment: &ClusterAssignment,
    ) -> Result<MetricValue> {
        let value = match self {
            MetricKind::Wss => MetricValue::Scalar(wss(data, assignment)?),
            MetricKind::Silhouette => MetricValue::Samples(SilhouetteSamples::new(
                silhouette_samples(data, &assignment.labels.view())?,
                assignment.labels.clone(),
            )),
            MetricKind::AvgSilhouette => {
                MetricValue::Scalar(silhouette_score(data, &assignment.labels.view())?)
            }
        };
        Ok(value)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetricKind {
    type Err = EvalError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wss" => Ok(MetricKind::Wss),
            "silhouette_sample" | "silhouette_samples" | "silhouette" => {
                Ok(MetricKind::Silhouette)
            }
            "silhouette_score" | "avg_silhouette" => Ok(MetricKind::AvgSilhouette),
            _ => Err(EvalError::UnsupportedMetric(s.to_string())),
        }
    }
}

/// Value of one metric for one k
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Scalar(f64),
    Samples(SilhouetteSamples),
}

impl MetricValue {
    /// The scalar value, or `None` for per-point samples
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            MetricValue::Scalar(value) => Some(*value),
            MetricValue::Samples(_) => None,
        }
    }

    /// The per-point samples, or `None` for a scalar value
    pub fn as_samples(&self) -> Option<&SilhouetteSamples> {
        match self {
            MetricValue::Scalar(_) => None,
            MetricValue::Samples(samples) => Some(samples),
        }
    }
}

/// Ways to reduce per-point silhouette values to a single number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Mean,
    Min,
    Max,
    Median,
}

/// Per-point silhouette coefficients together with the labels they were computed for
#[derive(Debug, Clone, PartialEq)]
pub struct SilhouetteSamples {
    values: Array1<f64>,
    labels: Array1<usize>,
}

impl SilhouetteSamples {
    pub fn new(values: Array1<f64>, labels: Array1<usize>) -> Self {
        Self { values, labels }
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn labels(&self) -> &Array1<usize> {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of clusters, taken as the highest label plus one
    pub fn n_clusters(&self) -> usize {
        self.labels.iter().max().map_or(0, |&max| max + 1)
    }

    /// Mean over all points (the silhouette score)
    pub fn mean(&self) -> f64 {
        self.reduce(Reduction::Mean)
    }

    /// Values of the members of `cluster`, sorted ascending
    pub fn cluster_values(&self, cluster: usize) -> Vec<f64> {
        let mut values: Vec<f64> = self
            .values
            .iter()
            .zip(self.labels.iter())
            .filter(|(_, &label)| label == cluster)
            .map(|(&value, _)| value)
            .collect();
        values.sort_by(f64::total_cmp);
        values
    }

    /// Mean value per cluster; `None` for clusters without members
    pub fn cluster_means(&self) -> Vec<Option<f64>> {
        (0..self.n_clusters())
            .map(|cluster| {
                let values = self.cluster_values(cluster);
                if values.is_empty() {
                    None
                } else {
                    Some(values.iter().sum::<f64>() / values.len() as f64)
                }
            })
            .collect()
    }

    /// Reduce all values to one number. Returns 0 for empty samples.
    pub fn reduce(&self, reduction: Reduction) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }

        match reduction {
            Reduction::Mean => self.values.sum() / self.values.len() as f64,
            Reduction::Min => self.values.iter().copied().fold(f64::INFINITY, f64::min),
            Reduction::Max => self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Reduction::Median => {
                let mut sorted = self.values.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
        }
    }
}

/// One (k, value) pair of a series
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEntry {
    pub k: usize,
    pub value: MetricValue,
}

/// Values of one metric over a k range, in the order the range was given
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    kind: MetricKind,
    entries: Vec<MetricEntry>,
}

impl MetricSeries {
    pub fn new(kind: MetricKind, entries: Vec<MetricEntry>) -> Self {
        Self { kind, entries }
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn entries(&self) -> &[MetricEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The k values, in order
    pub fn ks(&self) -> Vec<usize> {
        self.entries.iter().map(|entry| entry.k).collect()
    }

    /// The first entry for `k`
    pub fn get(&self, k: usize) -> Option<&MetricValue> {
        self.entries
            .iter()
            .find(|entry| entry.k == k)
            .map(|entry| &entry.value)
    }

    /// `(k, value)` pairs for scalar metrics; per-point samples are reduced with `reduction`
    pub fn points(&self, reduction: Reduction) -> Vec<(usize, f64)> {
        self.entries
            .iter()
            .map(|entry| {
                let value = match &entry.value {
                    MetricValue::Scalar(value) => *value,
                    MetricValue::Samples(samples) => samples.reduce(reduction),
                };
                (entry.k, value)
            })
            .collect()
    }
}

/// Within-cluster sum of squared distances between each point and its centroid
///
/// # Errors
///
/// [`EvalError::InvalidAssignment`] if `assignment` has a label per point that is
/// not a row of its centroids, or centroids of another dimension than `data`.
pub fn wss(data: &ArrayView2<f32>, assignment: &ClusterAssignment) -> Result<f64> {
    assignment.validate(data, assignment.k())?;

    // Summed in row order so equal inputs give bit-identical results
    Ok(data
        .outer_iter()
        .zip(assignment.labels.iter())
        .map(|(point, &label)| squared_euclidean(&point, &assignment.centroids.row(label)))
        .sum())
}

/// Silhouette coefficient of every point, using Euclidean distances.
///
/// Labels need not be contiguous: empty clusters are ignored when looking for
/// the nearest other cluster. A point gets 0 when its cluster is a singleton,
/// when no other non-empty cluster exists, or when `max(a, b)` is 0.
///
/// Distances are computed row by row, so memory stays linear in the number of
/// points.
///
/// # Errors
///
/// [`EvalError::InvalidAssignment`] if there is not exactly one label per point.
pub fn silhouette_samples(
    data: &ArrayView2<f32>,
    labels: &ArrayView1<usize>,
) -> Result<Array1<f64>> {
    let n = data.nrows();
    let n_clusters = labels.iter().max().map_or(0, |&max| max + 1);

    if labels.len() != n {
        return Err(EvalError::InvalidAssignment {
            k: n_clusters,
            reason: format!("expected {} labels, got {}", n, labels.len()),
        });
    }

    let mut cluster_sizes = vec![0usize; n_clusters];
    for &label in labels.iter() {
        cluster_sizes[label] += 1;
    }

    let values: Vec<f64> = (0..n)
        .into_par_iter()
        .map(|i| {
            let own = labels[i];
            if cluster_sizes[own] <= 1 {
                return 0.0;
            }

            // Sum of distances from point i to every cluster
            let xi = data.row(i);
            let mut sums = vec![0.0f64; n_clusters];
            for (j, (xj, &label)) in data.outer_iter().zip(labels.iter()).enumerate() {
                if j != i {
                    sums[label] += euclidean(&xi, &xj);
                }
            }

            let a = sums[own] / (cluster_sizes[own] - 1) as f64;
            let b = (0..n_clusters)
                .filter(|&c| c != own && cluster_sizes[c] > 0)
                .map(|c| sums[c] / cluster_sizes[c] as f64)
                .fold(f64::INFINITY, f64::min);

            if !b.is_finite() {
                return 0.0;
            }

            let denom = a.max(b);
            if denom > 0.0 {
                ((b - a) / denom).clamp(-1.0, 1.0)
            } else {
                0.0
            }
        })
        .collect();

    Ok(Array1::from_vec(values))
}

/// Mean silhouette coefficient over all points
///
/// # Errors
///
/// Same as [`silhouette_samples`].
pub fn silhouette_score(data: &ArrayView2<f32>, labels: &ArrayView1<usize>) -> Result<f64> {
    let samples = silhouette_samples(data, labels)?;
    Ok(SilhouetteSamples::new(samples, labels.to_owned()).mean())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    fn four_points() -> Array2<f32> {
        array![[0.0f32, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]]
    }

    fn columns() -> ClusterAssignment {
        ClusterAssignment::new(array![0, 0, 1, 1], array![[0.0f32, 0.5], [10.0, 0.5]])
    }

    #[test]
    fn test_wss_two_columns() {
        let data = four_points();
        assert_relative_eq!(wss(&data.view(), &columns()).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wss_single_cluster() {
        let data = four_points();
        let assignment = ClusterAssignment::new(array![0, 0, 0, 0], array![[5.0f32, 0.5]]);
        // 4 * (25 + 0.25)
        assert_relative_eq!(wss(&data.view(), &assignment).unwrap(), 101.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wss_every_point_own_cluster() {
        let data = four_points();
        let assignment = ClusterAssignment::new(array![0, 1, 2, 3], data.clone());
        assert_eq!(wss(&data.view(), &assignment).unwrap(), 0.0);
    }

    #[test]
    fn test_silhouette_two_columns() {
        let data = four_points();
        let samples = silhouette_samples(&data.view(), &columns().labels.view()).unwrap();

        // a = 1, b = (10 + sqrt(101)) / 2
        let b = (10.0 + 101.0f64.sqrt()) / 2.0;
        let expected = (b - 1.0) / b;
        for &s in samples.iter() {
            assert_relative_eq!(s, expected, epsilon = 1e-9);
        }
        assert!(expected > 0.85);
    }

    #[test]
    fn test_silhouette_singleton_is_zero() {
        let data = array![[0.0f32], [1.0], [2.0], [50.0]];
        let samples = silhouette_samples(&data.view(), &array![0, 0, 0, 1].view()).unwrap();
        assert_eq!(samples[3], 0.0);
        assert!(samples[0] > 0.0);
    }

    #[test]
    fn test_silhouette_bad_assignment_is_negative() {
        let data = four_points();
        // Rows instead of columns: neighbours across the gap share a cluster
        let labels = array![0, 1, 0, 1];
        let samples = silhouette_samples(&data.view(), &labels.view()).unwrap();
        for &s in samples.iter() {
            assert!(s < 0.0);
            assert!(s >= -1.0);
        }
    }

    #[test]
    fn test_silhouette_skips_empty_clusters() {
        let data = four_points();
        let labels = array![0, 0, 2, 2];
        let sparse = silhouette_samples(&data.view(), &labels.view()).unwrap();
        let dense = silhouette_samples(&data.view(), &columns().labels.view()).unwrap();
        assert_eq!(sparse, dense);
    }

    #[test]
    fn test_silhouette_single_cluster_is_zero() {
        let data = four_points();
        let samples = silhouette_samples(&data.view(), &array![0, 0, 0, 0].view()).unwrap();
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_silhouette_duplicate_points() {
        let data = array![[1.0f32, 1.0], [1.0, 1.0], [1.0, 1.0], [1.0, 1.0]];
        let samples = silhouette_samples(&data.view(), &array![0, 0, 1, 1].view()).unwrap();
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_silhouette_score_is_mean() {
        let data = array![[0.0f32], [1.0], [2.0], [50.0], [52.0]];
        let labels = array![0, 0, 0, 1, 1];
        let samples = silhouette_samples(&data.view(), &labels.view()).unwrap();
        let score = silhouette_score(&data.view(), &labels.view()).unwrap();
        assert_relative_eq!(score, samples.mean().unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn test_mismatched_labels_are_rejected() {
        let data = four_points();

        let centroids = array![[0.0f32, 0.5], [10.0, 0.5]];

        let short = ClusterAssignment::new(array![0, 0, 1], centroids.clone());
        assert!(matches!(
            wss(&data.view(), &short),
            Err(EvalError::InvalidAssignment { .. })
        ));

        let out_of_range = ClusterAssignment::new(array![0, 0, 1, 2], centroids);
        assert!(matches!(
            wss(&data.view(), &out_of_range),
            Err(EvalError::InvalidAssignment { k: 2, .. })
        ));

        let labels = array![0, 1];
        assert!(matches!(
            silhouette_samples(&data.view(), &labels.view()),
            Err(EvalError::InvalidAssignment { .. })
        ));
        assert!(silhouette_score(&data.view(), &labels.view()).is_err());
    }

    #[test]
    fn test_silhouette_far_from_origin() {
        let shifted = four_points().mapv(|v| v + 10000.0);
        let labels = columns().labels;

        let expected = silhouette_samples(&four_points().view(), &labels.view()).unwrap();
        let samples = silhouette_samples(&shifted.view(), &labels.view()).unwrap();
        for (&s, &e) in samples.iter().zip(expected.iter()) {
            assert_relative_eq!(s, e, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_reductions() {
        let samples = SilhouetteSamples::new(array![0.5, -0.25, 1.0, 0.25], array![1, 0, 1, 0]);

        assert_relative_eq!(samples.reduce(Reduction::Mean), 0.375);
        assert_eq!(samples.reduce(Reduction::Min), -0.25);
        assert_eq!(samples.reduce(Reduction::Max), 1.0);
        assert_relative_eq!(samples.reduce(Reduction::Median), 0.375);
        assert_eq!(samples.n_clusters(), 2);
        assert_eq!(samples.cluster_values(1), vec![0.5, 1.0]);
        assert_eq!(samples.cluster_values(0), vec![-0.25, 0.25]);
        assert_eq!(samples.cluster_means(), vec![Some(0.0), Some(0.75)]);
    }

    #[test]
    fn test_series_points() {
        let samples = SilhouetteSamples::new(array![0.5, 1.0], array![0, 1]);
        let series = MetricSeries::new(
            MetricKind::Silhouette,
            vec![
                MetricEntry {
                    k: 3,
                    value: MetricValue::Samples(samples.clone()),
                },
                MetricEntry {
                    k: 2,
                    value: MetricValue::Samples(samples),
                },
            ],
        );

        assert_eq!(series.ks(), vec![3, 2]);
        assert_eq!(series.points(Reduction::Max), vec![(3, 1.0), (2, 1.0)]);
        assert!(series.get(2).and_then(MetricValue::as_samples).is_some());
        assert!(series.get(4).is_none());
    }

    #[test]
    fn test_metric_kind_from_str() {
        assert_eq!("wss".parse::<MetricKind>().unwrap(), MetricKind::Wss);
        assert_eq!(
            "silhouette_sample".parse::<MetricKind>().unwrap(),
            MetricKind::Silhouette
        );
        assert_eq!(
            "Silhouette_Score".parse::<MetricKind>().unwrap(),
            MetricKind::AvgSilhouette
        );
        assert!(matches!(
            "inertia".parse::<MetricKind>(),
            Err(EvalError::UnsupportedMetric(name)) if name == "inertia"
        ));
    }

    #[test]
    fn test_metric_kind_names_round_trip() {
        for kind in MetricKind::ALL {
            assert_eq!(kind.to_string().parse::<MetricKind>().unwrap(), kind);
        }
        assert!(!MetricKind::Wss.requires_multiple_clusters());
        assert!(MetricKind::AvgSilhouette.requires_multiple_clusters());
    }
}
