//! P5 pipeline sweep: one row per (messages, buffer, pause_us) combination.

use super::run_checked;
use crate::config::PipelineSweepConfig;
use crate::error::HarnessResult;
use crate::measure::{median, parse_pipeline_elapsed, round_to, RESULT_PRECISION};
use crate::process::{ProbeCommand, ProcessRunner};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Median elapsed time for one parameter combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipelineRow {
    /// Messages pushed through the pipeline.
    pub messages: u64,
    /// Bounded buffer capacity.
    pub buffer: u64,
    /// Per-message pause in microseconds.
    pub pause_us: u64,
    /// Median elapsed time in milliseconds.
    pub time_ms: f64,
}

/// Where a pipeline timing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingSource {
    /// The probe printed a `tiempo=<ms>ms` line.
    Reported,
    /// Measured around the child process, spawn overhead included.
    WallClock,
}

/// One pipeline trial's timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineTiming {
    /// Elapsed milliseconds.
    pub ms: f64,
    /// Origin of `ms`.
    pub source: TimingSource,
}

/// Run one pipeline trial, preferring the probe's own timing line and
/// falling back to wall-clock time around the child when it has none.
///
/// # Errors
///
/// Fails if the probe cannot be run, times out, or exits non-zero. A missing
/// timing line is never an error.
pub async fn parse_or_time<R: ProcessRunner>(
    runner: &R,
    command: &ProbeCommand,
    timeout: Duration,
) -> HarnessResult<PipelineTiming> {
    let started = Instant::now();
    let output = run_checked(runner, command, timeout).await?;
    let wall_ms = started.elapsed().as_secs_f64() * 1000.0;

    Ok(match parse_pipeline_elapsed(&output) {
        Some(ms) => PipelineTiming {
            ms,
            source: TimingSource::Reported,
        },
        None => {
            debug!(command = %command, wall_ms, "no timing line, using wall clock");
            PipelineTiming {
                ms: wall_ms,
                source: TimingSource::WallClock,
            }
        },
    })
}

/// Sweeps the pipeline probe over messages × buffers × pauses.
#[derive(Debug)]
pub struct PipelineSweep<'a, R> {
    runner: &'a R,
    binary: PathBuf,
    config: PipelineSweepConfig,
    timeout: Duration,
}

impl<'a, R: ProcessRunner> PipelineSweep<'a, R> {
    /// Create a sweep invoking `binary` through `runner`.
    pub fn new(
        runner: &'a R,
        binary: impl Into<PathBuf>,
        config: PipelineSweepConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            runner,
            binary: binary.into(),
            config,
            timeout,
        }
    }

    /// `(messages, buffer, pause_us)` in sweep order: messages outermost,
    /// pause innermost.
    pub fn combinations(&self) -> impl Iterator<Item = (u64, u64, u64)> + '_ {
        let config = &self.config;
        config.messages.iter().flat_map(move |&messages| {
            config.buffers.iter().flat_map(move |&buffer| {
                config
                    .pause_us
                    .iter()
                    .map(move |&pause_us| (messages, buffer, pause_us))
            })
        })
    }

    /// Command line for one trial.
    pub fn command(&self, messages: u64, buffer: u64, pause_us: u64) -> ProbeCommand {
        ProbeCommand::new(&self.binary).args([messages, buffer, pause_us])
    }

    /// Run every trial and return one row per combination, in sweep order.
    ///
    /// # Errors
    ///
    /// Fails on the first trial that times out or exits non-zero.
    pub async fn run(&self) -> HarnessResult<Vec<PipelineRow>> {
        let mut rows = Vec::new();

        for (messages, buffer, pause_us) in self.combinations() {
            let command = self.command(messages, buffer, pause_us);
            let mut times = Vec::with_capacity(self.config.reps as usize);

            for rep in 0..self.config.reps {
                let timing = parse_or_time(self.runner, &command, self.timeout).await?;
                debug!(
                    messages,
                    buffer,
                    pause_us,
                    rep,
                    ms = timing.ms,
                    source = ?timing.source,
                    "pipeline trial"
                );
                times.push(timing.ms);
            }

            let row = PipelineRow {
                messages,
                buffer,
                pause_us,
                time_ms: round_to(median(&times), RESULT_PRECISION),
            };
            info!(messages, buffer, pause_us, time_ms = row.time_ms, "pipeline row");
            rows.push(row);
        }

        Ok(rows)
    }
}
