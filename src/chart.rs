//! Chart model and the sink seam.
//!
//! The evaluator does not draw. It turns a [`MetricSeries`] into [`Chart`] values
//! and hands each one to a [`ChartSink`]. [`TextChart`](crate::TextChart) writes
//! them as text; [`RecordingSink`] keeps them for inspection.

use crate::config::FigureStyle;
use crate::error::BoxError;
use crate::metrics::{MetricKind, MetricSeries, MetricValue, Reduction, SilhouetteSamples};

/// Blank rows between two cluster bands of a silhouette panel
pub const BAND_GAP: usize = 10;

/// Something that displays or stores charts
pub trait ChartSink {
    fn render(&mut self, chart: &Chart) -> Result<(), BoxError>;
}

impl<S: ChartSink + ?Sized> ChartSink for &mut S {
    fn render(&mut self, chart: &Chart) -> Result<(), BoxError> {
        (**self).render(chart)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    /// Metric value against k
    Line(LineChart),
    /// Sorted per-point silhouette values of one k, grouped by cluster
    Silhouette(SilhouettePanel),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
    pub style: FigureStyle,
}

/// The members of one cluster, drawn between rows `y_lower..y_upper`
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterBand {
    pub cluster: usize,
    pub y_lower: usize,
    pub y_upper: usize,
    /// Silhouette values, ascending
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SilhouettePanel {
    pub k: usize,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_range: (f64, f64),
    pub y_max: usize,
    /// Mean silhouette over all points, drawn as a vertical marker
    pub average: f64,
    pub bands: Vec<ClusterBand>,
    pub style: FigureStyle,
}

impl LineChart {
    /// Line chart of a scalar series. Per-point values are averaged.
    pub fn from_series(series: &MetricSeries, style: FigureStyle) -> Self {
        let kind = series.kind();
        let ks = series.ks();
        let title = match (ks.first(), ks.last()) {
            (Some(first), Some(last)) => {
                format!("{} for K = {} through {}", kind.title(), first, last)
            }
            _ => kind.title().to_string(),
        };

        Self {
            title,
            x_label: "k".to_string(),
            y_label: kind.title().to_string(),
            points: series
                .points(Reduction::Mean)
                .into_iter()
                .map(|(k, value)| (k as f64, value))
                .collect(),
            style,
        }
    }
}

impl SilhouettePanel {
    /// Lay out the silhouette values of one k. Bands are stacked from the bottom
    /// in label order with [`BAND_GAP`] blank rows below each of them.
    pub fn new(k: usize, samples: &SilhouetteSamples, style: FigureStyle) -> Self {
        let mut bands = Vec::with_capacity(k);
        let mut y_lower = BAND_GAP;

        for cluster in 0..k {
            let values = samples.cluster_values(cluster);
            let y_upper = y_lower + values.len();
            bands.push(ClusterBand {
                cluster,
                y_lower,
                y_upper,
                values,
            });
            y_lower = y_upper + BAND_GAP;
        }

        Self {
            k,
            title: format!("Silhouette plot for the various clusters for k = {}", k),
            x_label: MetricKind::Silhouette.title().to_string(),
            y_label: "Cluster label".to_string(),
            x_range: (-1.0, 1.0),
            y_max: samples.len() + (k + 1) * BAND_GAP,
            average: samples.mean(),
            bands,
            style,
        }
    }
}

/// Turn a series into the charts that display it: one line chart for scalar
/// metrics, one silhouette panel per k for per-point values.
pub fn charts_for(
    series: &MetricSeries,
    line_style: FigureStyle,
    panel_style: FigureStyle,
) -> Vec<Chart> {
    match series.kind() {
        MetricKind::Wss | MetricKind::AvgSilhouette => {
            vec![Chart::Line(LineChart::from_series(series, line_style))]
        }
        MetricKind::Silhouette => series
            .entries()
            .iter()
            .filter_map(|entry| match &entry.value {
                MetricValue::Samples(samples) => Some(Chart::Silhouette(SilhouettePanel::new(
                    entry.k,
                    samples,
                    panel_style,
                ))),
                MetricValue::Scalar(_) => None,
            })
            .collect(),
    }
}

/// Keeps every rendered chart in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub charts: Vec<Chart>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

impl ChartSink for RecordingSink {
    fn render(&mut self, chart: &Chart) -> Result<(), BoxError> {
        self.charts.push(chart.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricEntry;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn wss_series() -> MetricSeries {
        MetricSeries::new(
            MetricKind::Wss,
            vec![
                MetricEntry {
                    k: 2,
                    value: MetricValue::Scalar(10.0),
                },
                MetricEntry {
                    k: 3,
                    value: MetricValue::Scalar(4.0),
                },
            ],
        )
    }

    #[test]
    fn test_line_chart_from_series() {
        let chart = LineChart::from_series(&wss_series(), FigureStyle::line());

        assert_eq!(
            chart.title,
            "Within-cluster-sum of squared errors for K = 2 through 3"
        );
        assert_eq!(chart.x_label, "k");
        assert_eq!(chart.points, vec![(2.0, 10.0), (3.0, 4.0)]);
    }

    #[test]
    fn test_silhouette_panel_layout() {
        let samples = SilhouetteSamples::new(array![0.9, 0.5, 0.7, -0.1], array![1, 0, 1, 1]);
        let panel = SilhouettePanel::new(3, &samples, FigureStyle::panel());

        assert_eq!(panel.y_max, 4 + 4 * BAND_GAP);
        assert_eq!(panel.bands.len(), 3);

        assert_eq!((panel.bands[0].y_lower, panel.bands[0].y_upper), (10, 11));
        assert_eq!((panel.bands[1].y_lower, panel.bands[1].y_upper), (21, 24));
        assert_eq!(panel.bands[1].values, vec![-0.1, 0.7, 0.9]);
        // Empty cluster still takes its gap
        assert_eq!((panel.bands[2].y_lower, panel.bands[2].y_upper), (34, 34));

        assert_relative_eq!(panel.average, 0.5, epsilon = 1e-12);
        assert_eq!(panel.title, "Silhouette plot for the various clusters for k = 3");
    }

    #[test]
    fn test_charts_for_silhouette_series() {
        let samples = SilhouetteSamples::new(array![0.5, 0.5], array![0, 1]);
        let series = MetricSeries::new(
            MetricKind::Silhouette,
            vec![
                MetricEntry {
                    k: 2,
                    value: MetricValue::Samples(samples.clone()),
                },
                MetricEntry {
                    k: 2,
                    value: MetricValue::Samples(samples),
                },
            ],
        );

        let charts = charts_for(&series, FigureStyle::line(), FigureStyle::panel());
        assert_eq!(charts.len(), 2);
        assert!(charts.iter().all(|c| matches!(c, Chart::Silhouette(_))));
    }

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::new();
        for chart in charts_for(&wss_series(), FigureStyle::line(), FigureStyle::panel()) {
            sink.render(&chart).unwrap();
        }
        assert_eq!(sink.len(), 1);
    }
}
