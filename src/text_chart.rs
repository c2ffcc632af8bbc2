use crate::chart::{Chart, ChartSink, LineChart, SilhouettePanel};
use crate::error::BoxError;
use std::io::{self, Write};

/// Bar width used for a figure 16 units wide
const BASE_BAR_WIDTH: f64 = 40.0;

/// Renders charts as plain text.
///
/// Line charts become one row per point with a bar proportional to the value.
/// Silhouette panels become one row per cluster with the band's min, mean and max
/// and a bar for the mean on a `[-1, 1]` axis.
///
/// ```
/// use kmeanseval::{ChartSink, FigureStyle, LineChart, Chart, TextChart};
///
/// let chart = Chart::Line(LineChart {
///     title: "WSS".to_string(),
///     x_label: "k".to_string(),
///     y_label: "wss".to_string(),
///     points: vec![(1.0, 4.0), (2.0, 1.0)],
///     style: FigureStyle::line(),
/// });
///
/// let mut sink = TextChart::new(Vec::new());
/// sink.render(&chart).unwrap();
/// let text = String::from_utf8(sink.into_inner()).unwrap();
/// assert!(text.starts_with("WSS"));
/// ```
pub struct TextChart<W> {
    out: W,
}

impl TextChart<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextChart<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn bar_width(style_width: f64) -> usize {
        ((BASE_BAR_WIDTH * style_width / 16.0).round() as usize).max(10)
    }

    fn write_line(&mut self, chart: &LineChart) -> io::Result<()> {
        writeln!(self.out, "{}", chart.title)?;
        writeln!(self.out, "{:>6} | {}", chart.x_label, chart.y_label)?;

        let width = Self::bar_width(chart.style.width);
        let max = chart
            .points
            .iter()
            .map(|&(_, y)| y.abs())
            .fold(0.0f64, f64::max);

        for &(x, y) in &chart.points {
            let filled = if max > 0.0 {
                ((y.abs() / max) * width as f64).round() as usize
            } else {
                0
            };
            writeln!(
                self.out,
                "{:>6} | {:>14.6} {}",
                x,
                y,
                "#".repeat(filled.min(width))
            )?;
        }
        writeln!(self.out)
    }

    fn write_panel(&mut self, panel: &SilhouettePanel) -> io::Result<()> {
        writeln!(self.out, "{}", panel.title)?;
        writeln!(
            self.out,
            "{} (average {:.4}, range {} to {})",
            panel.x_label, panel.average, panel.x_range.0, panel.x_range.1
        )?;

        // Half of the bar is the negative side of the axis
        let half = Self::bar_width(panel.style.width) / 2;

        for band in &panel.bands {
            if band.values.is_empty() {
                writeln!(self.out, "{:>6} | (empty)", band.cluster)?;
                continue;
            }

            let n = band.values.len();
            let mean = band.values.iter().sum::<f64>() / n as f64;
            let filled = ((mean.abs().min(1.0)) * half as f64).round() as usize;
            let (negative, positive) = if mean < 0.0 {
                (
                    format!("{:>width$}", "-".repeat(filled), width = half),
                    String::new(),
                )
            } else {
                (" ".repeat(half), "+".repeat(filled))
            };

            writeln!(
                self.out,
                "{:>6} | {}|{:<width$} n={} min={:.3} mean={:.3} max={:.3}",
                band.cluster,
                negative,
                positive,
                n,
                band.values[0],
                mean,
                band.values[n - 1],
                width = half
            )?;
        }
        writeln!(self.out)
    }
}

impl<W: Write> ChartSink for TextChart<W> {
    fn render(&mut self, chart: &Chart) -> Result<(), BoxError> {
        match chart {
            Chart::Line(line) => self.write_line(line)?,
            Chart::Silhouette(panel) => self.write_panel(panel)?,
        }
        self.out.flush()?;
        Ok(())
    }
}
