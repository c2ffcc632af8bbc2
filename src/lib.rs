//! # kmeanseval
//!
//! Pick the number of clusters for k-means by comparing cluster-quality metrics
//! over a range of candidate `k` values.
//!
//! ## Features
//!
//! - **Elbow method**: within-cluster sum of squared errors (WSS) for every k
//! - **Silhouette analysis**: per-point silhouette coefficients and their average
//! - **Pluggable clustering**: the built-in seeded k-means++ provider can be swapped
//!   for any [`ClusteringProvider`], including a closure
//! - **Pluggable charts**: series are turned into [`Chart`] values and handed to a
//!   [`ChartSink`]; [`TextChart`] prints them, [`RecordingSink`] keeps them
//! - **ndarray compatible**: datasets are `ArrayView2<f32>`, one point per row
//!
//! ## Example
//!
//! ```rust
//! use kmeanseval::{EvaluatorConfig, KMeansEvaluator, MetricKind, TextChart};
//! use ndarray::array;
//!
//! let data = array![
//!     [0.0f32, 0.0],
//!     [0.0, 1.0],
//!     [10.0, 0.0],
//!     [10.0, 1.0],
//! ];
//!
//! let config = EvaluatorConfig::new([2, 3, 4]).with_seed(42);
//! let mut evaluator = KMeansEvaluator::with_config(data.view(), config);
//!
//! let scores = evaluator.get_metrics(MetricKind::AvgSilhouette).unwrap();
//! let best = scores
//!     .points(kmeanseval::Reduction::Mean)
//!     .into_iter()
//!     .max_by(|a, b| a.1.total_cmp(&b.1))
//!     .unwrap();
//! assert_eq!(best.0, 2);
//!
//! let mut sink = TextChart::new(Vec::new());
//! evaluator.plot_avg_silhouette_scores(&mut sink).unwrap();
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: one `info` line per computed series,
//! `debug` lines per k and per k-means restart, `trace` lines per Lloyd iteration.
//! Install any logger (for example `env_logger`) to see them.

mod algorithm;
mod chart;
mod config;
mod distance;
mod error;
mod evaluator;
mod kmeans;
mod metrics;
mod provider;
mod text_chart;

pub use chart::{
    charts_for, Chart, ChartSink, ClusterBand, LineChart, RecordingSink, SilhouettePanel,
    BAND_GAP,
};
pub use config::{EvaluatorConfig, FigureStyle, KMeansConfig};
pub use error::{BoxError, EvalError, KMeansError, Result};
pub use evaluator::KMeansEvaluator;
pub use kmeans::KMeans;
pub use metrics::{
    silhouette_samples, silhouette_score, wss, MetricEntry, MetricKind, MetricSeries,
    MetricValue, Reduction, SilhouetteSamples,
};
pub use provider::{ClusterAssignment, ClusteringProvider};
pub use text_chart::TextChart;
