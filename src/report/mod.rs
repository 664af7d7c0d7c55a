//! # Reporting
//!
//! Result tables go to CSV with a fixed header; figures are SVG line charts.
//!
//! Persisting a table is mandatory for a suite to succeed. Rendering is
//! not: callers treat [`HarnessError::Render`](crate::error::HarnessError::Render)
//! as a warning.

mod plot;
mod table;

pub use plot::{
    counter_charts, pipeline_charts, ChartBackend, LineChart, PipelineSlice, PlotRenderer,
    SvgBackend,
};
pub use table::{write_table, TableRow};
