//! Runs both suites end to end: measure, persist, plot.

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::process::ProcessRunner;
use crate::report::{write_table, ChartBackend, PipelineSlice, PlotRenderer};
use crate::sweep::{CounterRow, CounterSweep, PipelineRow, PipelineSweep};
use std::path::PathBuf;
use tracing::{info, warn};

/// File name of the counter table inside the data directory.
pub const COUNTER_TABLE: &str = "p1_times.csv";

/// File name of the pipeline table inside the data directory.
pub const PIPELINE_TABLE: &str = "p5_times.csv";

/// Drives the counter and pipeline suites in order.
#[derive(Debug)]
pub struct Orchestrator<R, B> {
    config: HarnessConfig,
    runner: R,
    backend: B,
}

impl<R: ProcessRunner, B: ChartBackend> Orchestrator<R, B> {
    /// Create an orchestrator for `config`.
    pub fn new(config: HarnessConfig, runner: R, backend: B) -> Self {
        Self {
            config,
            runner,
            backend,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Runner in use.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Path of the counter table.
    pub fn counter_table_path(&self) -> PathBuf {
        self.config.paths.data_dir.join(COUNTER_TABLE)
    }

    /// Path of the pipeline table.
    pub fn pipeline_table_path(&self) -> PathBuf {
        self.config.paths.data_dir.join(PIPELINE_TABLE)
    }

    /// Values held fixed in the pipeline charts.
    ///
    /// Configured values win; otherwise the last messages value and the
    /// first pause value of the sweep axes.
    pub fn pipeline_slice(&self) -> PipelineSlice {
        let pipeline = &self.config.pipeline;
        PipelineSlice {
            messages: pipeline.plot_messages.or(pipeline.messages.last().copied()),
            pause_us: pipeline.plot_pause_us.or(pipeline.pause_us.first().copied()),
        }
    }

    /// Create the data and figures directories. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::CreateDir`] if a directory cannot be created.
    pub fn prepare_dirs(&self) -> HarnessResult<()> {
        for dir in [&self.config.paths.data_dir, &self.config.paths.figs_dir] {
            std::fs::create_dir_all(dir).map_err(|source| HarnessError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Prepare the output directories, then run the counter suite followed
    /// by the pipeline suite.
    ///
    /// # Errors
    ///
    /// Any measurement or persistence failure aborts the run. Render
    /// failures are logged and skipped.
    pub async fn run(&self) -> HarnessResult<()> {
        self.prepare_dirs()?;
        self.run_counter().await?;
        self.run_pipeline().await?;
        info!("all suites complete");
        Ok(())
    }

    /// Measure, persist and plot the counter suite.
    ///
    /// # Errors
    ///
    /// Fails if the sweep fails or the table cannot be written.
    pub async fn run_counter(&self) -> HarnessResult<Vec<CounterRow>> {
        info!(
            binary = %self.config.counter_binary().display(),
            threads = ?self.config.counter.threads,
            reps = self.config.counter.reps,
            "running counter suite"
        );
        let sweep = CounterSweep::new(
            &self.runner,
            self.config.counter_binary(),
            self.config.counter.clone(),
            self.config.runner.timeout(),
        );
        let rows = sweep.run().await?;

        let table = self.counter_table_path();
        write_table(&rows, &table)?;
        info!(path = %table.display(), rows = rows.len(), "counter table saved");

        let renderer = PlotRenderer::new(&self.backend, &self.config.paths.figs_dir);
        tolerate_render(renderer.plot_counter(&rows))?;
        Ok(rows)
    }

    /// Measure, persist and plot the pipeline suite.
    ///
    /// # Errors
    ///
    /// Fails if the sweep fails or the table cannot be written.
    pub async fn run_pipeline(&self) -> HarnessResult<Vec<PipelineRow>> {
        info!(
            binary = %self.config.pipeline_binary().display(),
            messages = ?self.config.pipeline.messages,
            buffers = ?self.config.pipeline.buffers,
            pause_us = ?self.config.pipeline.pause_us,
            reps = self.config.pipeline.reps,
            "running pipeline suite"
        );
        let sweep = PipelineSweep::new(
            &self.runner,
            self.config.pipeline_binary(),
            self.config.pipeline.clone(),
            self.config.runner.timeout(),
        );
        let rows = sweep.run().await?;

        let table = self.pipeline_table_path();
        write_table(&rows, &table)?;
        info!(path = %table.display(), rows = rows.len(), "pipeline table saved");

        let renderer = PlotRenderer::new(&self.backend, &self.config.paths.figs_dir);
        tolerate_render(renderer.plot_pipeline(&rows, self.pipeline_slice()))?;
        Ok(rows)
    }
}

/// Downgrade a render failure to a warning; other errors pass through.
fn tolerate_render(result: HarnessResult<Vec<PathBuf>>) -> HarnessResult<()> {
    match result {
        Ok(_) => Ok(()),
        Err(err) if err.is_render() => {
            warn!(error = %err, "skipping figures");
            Ok(())
        },
        Err(err) => Err(err),
    }
}
