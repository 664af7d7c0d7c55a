//! Line charts of result tables.
//!
//! Chart construction (slicing, sorting, labels, file names) is kept apart
//! from drawing so the slicing rules can be checked without a renderer.

use crate::error::{HarnessError, HarnessResult};
use crate::measure::CounterVariant;
use crate::sweep::{CounterRow, PipelineRow};
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One x/y series with its labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// Output file name, relative to the figures directory.
    pub file_name: String,
    /// Chart title.
    pub title: String,
    /// X axis label.
    pub x_label: String,
    /// Y axis label.
    pub y_label: String,
    /// Points in drawing order.
    pub points: Vec<(f64, f64)>,
}

/// Draws a [`LineChart`] to an image file.
pub trait ChartBackend {
    /// Render `chart` to `path`, replacing any existing file.
    fn render(&self, chart: &LineChart, path: &Path) -> HarnessResult<()>;
}

/// SVG renderer backed by plotters.
#[derive(Debug, Clone, Copy)]
pub struct SvgBackend {
    size: (u32, u32),
}

impl Default for SvgBackend {
    fn default() -> Self {
        Self { size: (960, 640) }
    }
}

impl SvgBackend {
    /// Create a renderer producing `width × height` images.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
        }
    }
}

impl ChartBackend for SvgBackend {
    fn render(&self, chart: &LineChart, path: &Path) -> HarnessResult<()> {
        draw_svg(chart, path, self.size).map_err(|e| HarnessError::Render {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

fn draw_svg(
    chart: &LineChart,
    path: &Path,
    size: (u32, u32),
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_range, y_range) = axis_ranges(&chart.points);
    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 20))
        .margin(16)
        .x_label_area_size(44)
        .y_label_area_size(64)
        .build_cartesian_2d(x_range, y_range)?;

    ctx.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .draw()?;

    ctx.draw_series(LineSeries::new(chart.points.iter().copied(), &BLUE))?;
    ctx.draw_series(
        chart
            .points
            .iter()
            .map(|&point| Circle::new(point, 4, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

/// X range padded by 5% (±1 for a single x value); Y range from zero (or the
/// lowest negative value) to 10% above the maximum.
fn axis_ranges(points: &[(f64, f64)]) -> (Range<f64>, Range<f64>) {
    let (x_min, x_max, y_min, y_max) = points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0f64, 0.0f64),
        |(x_lo, x_hi, y_lo, y_hi), &(x, y)| (x_lo.min(x), x_hi.max(x), y_lo.min(y), y_hi.max(y)),
    );

    let x_range = if x_max > x_min {
        let pad = (x_max - x_min) * 0.05;
        (x_min - pad)..(x_max + pad)
    } else {
        (x_min - 1.0)..(x_max + 1.0)
    };

    let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };
    (x_range, y_min..y_top)
}

/// Values held fixed in the pipeline charts.
///
/// Unset fields default to the first row of the table (the first
/// combination of the sweep).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSlice {
    /// Messages value for both charts.
    pub messages: Option<u64>,
    /// Pause value for the time-vs-buffer chart.
    pub pause_us: Option<u64>,
}

impl PipelineSlice {
    /// Fix both values explicitly.
    pub fn fixed(messages: u64, pause_us: u64) -> Self {
        Self {
            messages: Some(messages),
            pause_us: Some(pause_us),
        }
    }

    /// `(messages, pause_us)` after defaulting to the first row, or `None`
    /// for an empty table.
    pub fn resolve(&self, rows: &[PipelineRow]) -> Option<(u64, u64)> {
        let first = rows.first()?;
        Some((
            self.messages.unwrap_or(first.messages),
            self.pause_us.unwrap_or(first.pause_us),
        ))
    }
}

/// One chart per counter variant: variant time vs thread count.
pub fn counter_charts(rows: &[CounterRow]) -> Vec<LineChart> {
    CounterVariant::ALL
        .iter()
        .map(|&variant| LineChart {
            file_name: format!("p1_{}.svg", variant.column()),
            title: format!("P1 counter: {variant} vs threads"),
            x_label: "Threads (T)".to_string(),
            y_label: "Time (ms)".to_string(),
            points: rows
                .iter()
                .map(|row| (f64::from(row.threads), row.get(variant)))
                .collect(),
        })
        .collect()
}

/// The two pipeline charts for `slice`: time vs buffer, then time vs pause.
///
/// The pause chart holds the buffer at the smallest capacity in the table.
/// Returns `None` for an empty table.
pub fn pipeline_charts(rows: &[PipelineRow], slice: PipelineSlice) -> Option<[LineChart; 2]> {
    let (messages, pause_us) = slice.resolve(rows)?;
    let smallest_buffer = rows.iter().map(|r| r.buffer).min()?;

    let mut by_buffer: Vec<&PipelineRow> = rows
        .iter()
        .filter(|r| r.messages == messages && r.pause_us == pause_us)
        .collect();
    by_buffer.sort_by_key(|r| r.buffer);

    let mut by_pause: Vec<&PipelineRow> = rows
        .iter()
        .filter(|r| r.messages == messages && r.buffer == smallest_buffer)
        .collect();
    by_pause.sort_by_key(|r| r.pause_us);

    Some([
        LineChart {
            file_name: format!("p5_time_vs_buffer_m{messages}_p{pause_us}.svg"),
            title: format!(
                "P5 pipeline: time vs buffer (messages={messages}, pause_us={pause_us})"
            ),
            x_label: "Buffer size".to_string(),
            y_label: "Total time (ms)".to_string(),
            points: by_buffer
                .iter()
                .map(|r| (r.buffer as f64, r.time_ms))
                .collect(),
        },
        LineChart {
            file_name: format!("p5_time_vs_pause_m{messages}_b{smallest_buffer}.svg"),
            title: format!(
                "P5 pipeline: time vs pause_us (messages={messages}, buffer={smallest_buffer})"
            ),
            x_label: "pause_us".to_string(),
            y_label: "Total time (ms)".to_string(),
            points: by_pause
                .iter()
                .map(|r| (r.pause_us as f64, r.time_ms))
                .collect(),
        },
    ])
}

/// Renders result tables into a figures directory.
#[derive(Debug)]
pub struct PlotRenderer<'a, B> {
    backend: &'a B,
    figs_dir: PathBuf,
}

impl<'a, B: ChartBackend> PlotRenderer<'a, B> {
    /// Create a renderer writing into `figs_dir`.
    pub fn new(backend: &'a B, figs_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            figs_dir: figs_dir.into(),
        }
    }

    /// Render the four counter charts. Returns the written paths.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Render`] for an empty table or a backend failure.
    pub fn plot_counter(&self, rows: &[CounterRow]) -> HarnessResult<Vec<PathBuf>> {
        self.draw_all(&counter_charts(rows))
    }

    /// Render the two pipeline charts for `slice`. Returns the written paths.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Render`] for an empty table, a slice matching
    /// no rows, or a backend failure.
    pub fn plot_pipeline(
        &self,
        rows: &[PipelineRow],
        slice: PipelineSlice,
    ) -> HarnessResult<Vec<PathBuf>> {
        let charts = pipeline_charts(rows, slice).ok_or_else(|| HarnessError::Render {
            path: self.figs_dir.clone(),
            message: "pipeline table is empty".to_string(),
        })?;
        self.draw_all(&charts)
    }

    /// Attempt every chart, then report the first failure, if any.
    fn draw_all(&self, charts: &[LineChart]) -> HarnessResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(charts.len());
        let mut first_err = None;

        for chart in charts {
            match self.draw(chart) {
                Ok(path) => written.push(path),
                Err(err) => {
                    warn!(chart = %chart.file_name, error = %err, "chart not rendered");
                    first_err.get_or_insert(err);
                },
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(written),
        }
    }

    fn draw(&self, chart: &LineChart) -> HarnessResult<PathBuf> {
        let path = self.figs_dir.join(&chart.file_name);
        if chart.points.is_empty() {
            return Err(HarnessError::Render {
                path,
                message: "no rows match the chart slice".to_string(),
            });
        }
        self.backend.render(chart, &path)?;
        info!(path = %path.display(), "figure written");
        Ok(path)
    }
}
