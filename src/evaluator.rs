use crate::chart::{charts_for, ChartSink};
use crate::config::{EvaluatorConfig, FigureStyle};
use crate::error::{EvalError, Result};
use crate::kmeans::KMeans;
use crate::metrics::{MetricEntry, MetricKind, MetricSeries};
use crate::provider::ClusteringProvider;
use log::{debug, info};
use ndarray::ArrayView2;
use std::collections::BTreeMap;

/// Computes WSS and silhouette metrics of k-means clusterings over a range of k,
/// to help pick the number of clusters.
///
/// The evaluator borrows the dataset (one point per row) and never modifies it.
/// [`compute`](Self::compute) is stateless; [`get_metrics`](Self::get_metrics)
/// additionally remembers the latest series of each metric so that the
/// `plot_*` methods can render it.
///
/// # Example
///
/// ```
/// use kmeanseval::{EvaluatorConfig, KMeansEvaluator, MetricKind, RecordingSink};
/// use ndarray::array;
///
/// let data = array![[0.0f32, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]];
/// let mut evaluator = KMeansEvaluator::with_config(data.view(), EvaluatorConfig::new([1, 2, 4]));
///
/// let wss = evaluator.get_metrics(MetricKind::Wss).unwrap();
/// assert_eq!(wss.ks(), vec![1, 2, 4]);
///
/// let mut sink = RecordingSink::new();
/// evaluator.plot_elbow(&mut sink).unwrap();
/// assert_eq!(sink.len(), 1);
/// ```
pub struct KMeansEvaluator<'a, P = KMeans> {
    data: ArrayView2<'a, f32>,
    k_range: Vec<usize>,
    provider: P,
    line_style: FigureStyle,
    panel_style: FigureStyle,
    latest: BTreeMap<MetricKind, MetricSeries>,
}

impl<'a> KMeansEvaluator<'a, KMeans> {
    /// Evaluate k = 2 through 10 with the default k-means provider.
    pub fn new(data: ArrayView2<'a, f32>) -> Self {
        Self::with_config(data, EvaluatorConfig::default())
    }

    /// Evaluate with the k range and k-means parameters of `config`.
    pub fn with_config(data: ArrayView2<'a, f32>, config: EvaluatorConfig) -> Self {
        let provider = KMeans::with_config(config.kmeans);
        Self {
            data,
            k_range: config.k_range,
            provider,
            line_style: config.line_style,
            panel_style: config.panel_style,
            latest: BTreeMap::new(),
        }
    }
}

impl<'a, P: ClusteringProvider> KMeansEvaluator<'a, P> {
    /// Evaluate with a custom clustering provider.
    pub fn with_provider<I>(data: ArrayView2<'a, f32>, k_range: I, provider: P) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Self {
            data,
            k_range: k_range.into_iter().collect(),
            provider,
            line_style: FigureStyle::line(),
            panel_style: FigureStyle::panel(),
            latest: BTreeMap::new(),
        }
    }

    /// Set the chart styles used by the `plot_*` methods.
    pub fn with_styles(mut self, line_style: FigureStyle, panel_style: FigureStyle) -> Self {
        self.line_style = line_style;
        self.panel_style = panel_style;
        self
    }

    pub fn data(&self) -> &ArrayView2<'a, f32> {
        &self.data
    }

    /// The default k range
    pub fn k_range(&self) -> &[usize] {
        &self.k_range
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Compute `kind` for every k of `k_range`, in order.
    ///
    /// The provider is called once per k. Nothing is returned unless every k
    /// succeeds.
    ///
    /// # Errors
    ///
    /// - [`EvalError::EmptyDataset`] if the dataset has no points
    /// - [`EvalError::InvalidRange`] if `k_range` is empty, holds a 0, or holds a 1
    ///   for a silhouette metric
    /// - [`EvalError::Clustering`] with the provider's own error
    /// - [`EvalError::InvalidAssignment`] if the provider's output does not fit the data
    pub fn compute(&self, k_range: &[usize], kind: MetricKind) -> Result<MetricSeries> {
        self.validate(k_range, kind)?;

        info!(
            "Computing {} for {} values of k ({} points, {} features)",
            kind,
            k_range.len(),
            self.data.nrows(),
            self.data.ncols()
        );

        let mut entries = Vec::with_capacity(k_range.len());
        for &k in k_range {
            let assignment = self
                .provider
                .fit(self.data.view(), k)
                .map_err(EvalError::Clustering)?;
            assignment.validate(&self.data, k)?;

            let value = kind.evaluate(&self.data, &assignment)?;
            match value.as_scalar() {
                Some(scalar) => debug!("k = {}: {} = {:.6}", k, kind, scalar),
                None => debug!("k = {}: {} computed for {} points", k, kind, self.data.nrows()),
            }

            entries.push(MetricEntry { k, value });
        }

        Ok(MetricSeries::new(kind, entries))
    }

    /// [`compute`](Self::compute) over the default k range.
    pub fn compute_default(&self, kind: MetricKind) -> Result<MetricSeries> {
        self.compute(&self.k_range, kind)
    }

    /// Compute `kind` over the default k range and keep the series for plotting.
    pub fn get_metrics(&mut self, kind: MetricKind) -> Result<&MetricSeries> {
        let series = self.compute_default(kind)?;
        self.latest.insert(kind, series);
        self.latest(kind).ok_or(EvalError::NoSeries(kind))
    }

    /// The series stored by the last [`get_metrics`](Self::get_metrics) call for `kind`
    pub fn latest(&self, kind: MetricKind) -> Option<&MetricSeries> {
        self.latest.get(&kind)
    }

    /// Render `series` with this evaluator's chart styles.
    ///
    /// WSS and average silhouette become one line chart; per-point silhouette
    /// becomes one panel per k. The sink's errors are returned as they are.
    pub fn plot<S: ChartSink + ?Sized>(&self, series: &MetricSeries, sink: &mut S) -> Result<()> {
        for chart in charts_for(series, self.line_style, self.panel_style) {
            sink.render(&chart).map_err(EvalError::Render)?;
        }
        Ok(())
    }

    /// Elbow plot of the latest WSS series.
    pub fn plot_elbow<S: ChartSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        self.plot_latest(MetricKind::Wss, sink)
    }

    /// Line chart of the latest average silhouette series.
    pub fn plot_avg_silhouette_scores<S: ChartSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        self.plot_latest(MetricKind::AvgSilhouette, sink)
    }

    /// One silhouette panel per k of the latest per-point silhouette series.
    pub fn plot_silhouette_scores<S: ChartSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        self.plot_latest(MetricKind::Silhouette, sink)
    }

    fn plot_latest<S: ChartSink + ?Sized>(&self, kind: MetricKind, sink: &mut S) -> Result<()> {
        let series = self.latest(kind).ok_or(EvalError::NoSeries(kind))?;
        self.plot(series, sink)
    }

    fn validate(&self, k_range: &[usize], kind: MetricKind) -> Result<()> {
        if self.data.nrows() == 0 {
            return Err(EvalError::EmptyDataset);
        }

        if k_range.is_empty() {
            return Err(EvalError::InvalidRange("k range is empty".to_string()));
        }

        if k_range.contains(&0) {
            return Err(EvalError::InvalidRange(
                "every k must be at least 1".to_string(),
            ));
        }

        if kind.requires_multiple_clusters() {
            if let Some(&k) = k_range.iter().find(|&&k| k < 2) {
                return Err(EvalError::InvalidRange(format!(
                    "{} is undefined for k = {}, every k must be at least 2",
                    kind, k
                )));
            }
        }

        Ok(())
    }
}
