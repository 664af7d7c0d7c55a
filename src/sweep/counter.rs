//! P1 counter sweep: one row per thread count.

use super::run_checked;
use crate::config::CounterSweepConfig;
use crate::error::HarnessResult;
use crate::measure::{median, parse_counter_summary, round_to, CounterVariant, RESULT_PRECISION};
use crate::process::{ProbeCommand, ProcessRunner};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Median timings for one thread count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CounterRow {
    /// Worker threads.
    pub threads: u32,
    /// Unsynchronized counter.
    pub naive_ms: f64,
    /// Mutex counter.
    pub mutex_ms: f64,
    /// Sharded counter.
    pub sharded_ms: f64,
    /// Atomic counter.
    pub atomic_ms: f64,
}

impl CounterRow {
    /// Value of one variant's column.
    pub fn get(&self, variant: CounterVariant) -> f64 {
        match variant {
            CounterVariant::Naive => self.naive_ms,
            CounterVariant::Mutex => self.mutex_ms,
            CounterVariant::Sharded => self.sharded_ms,
            CounterVariant::Atomic => self.atomic_ms,
        }
    }
}

/// Sweeps the counter probe over thread counts.
#[derive(Debug)]
pub struct CounterSweep<'a, R> {
    runner: &'a R,
    binary: PathBuf,
    config: CounterSweepConfig,
    timeout: Duration,
}

impl<'a, R: ProcessRunner> CounterSweep<'a, R> {
    /// Create a sweep invoking `binary` through `runner`.
    pub fn new(
        runner: &'a R,
        binary: impl Into<PathBuf>,
        config: CounterSweepConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            runner,
            binary: binary.into(),
            config,
            timeout,
        }
    }

    /// Command line for one trial.
    pub fn command(&self, threads: u32) -> ProbeCommand {
        ProbeCommand::new(&self.binary).arg(threads).arg(self.config.iters)
    }

    /// Run every trial and return one row per thread count, in sweep order.
    ///
    /// # Errors
    ///
    /// Fails on the first trial that times out, exits non-zero, or prints no
    /// summary line.
    pub async fn run(&self) -> HarnessResult<Vec<CounterRow>> {
        let mut rows = Vec::with_capacity(self.config.threads.len());

        for &threads in &self.config.threads {
            let command = self.command(threads);
            let mut samples: [Vec<f64>; 4] = Default::default();

            for rep in 0..self.config.reps {
                let output = run_checked(self.runner, &command, self.timeout).await?;
                let trial = parse_counter_summary(&output)?;
                debug!(threads, rep, ?trial, "counter trial");
                for (variant, values) in CounterVariant::ALL.iter().zip(samples.iter_mut()) {
                    values.push(trial.get(*variant));
                }
            }

            let [naive, mutex, sharded, atomic] =
                samples.map(|values| round_to(median(&values), RESULT_PRECISION));
            let row = CounterRow {
                threads,
                naive_ms: naive,
                mutex_ms: mutex,
                sharded_ms: sharded,
                atomic_ms: atomic,
            };
            info!(
                threads,
                naive_ms = row.naive_ms,
                mutex_ms = row.mutex_ms,
                sharded_ms = row.sharded_ms,
                atomic_ms = row.atomic_ms,
                "counter row"
            );
            rows.push(row);
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;
    use crate::process::testing::ScriptedRunner;
    use crate::process::ProcessOutput;

    fn summary(naive: f64, mutex: f64, sharded: f64, atomic: f64) -> ProcessOutput {
        ProcessOutput::new(
            0,
            format!(
                "T=1  iters=10\n\nResumen (ms): naive={naive}  mutex={mutex}  sharded={sharded}  atomic={atomic}\n"
            ),
        )
    }

    fn config(threads: Vec<u32>, reps: u32) -> CounterSweepConfig {
        CounterSweepConfig {
            threads,
            iters: 1_000,
            reps,
            ..CounterSweepConfig::default()
        }
    }

    #[tokio::test]
    async fn test_constant_probe_yields_one_row_per_thread_count() {
        let runner = ScriptedRunner::always(ProcessOutput::new(
            0,
            "Resumen (ms): naive=10 mutex=20 sharded=5 atomic=2\n",
        ));
        let sweep = CounterSweep::new(
            &runner,
            "bin/p1_counter",
            config(vec![1, 2], 1),
            Duration::from_secs(5),
        );

        let rows = sweep.run().await.unwrap();

        assert_eq!(
            rows,
            vec![
                CounterRow {
                    threads: 1,
                    naive_ms: 10.0,
                    mutex_ms: 20.0,
                    sharded_ms: 5.0,
                    atomic_ms: 2.0,
                },
                CounterRow {
                    threads: 2,
                    naive_ms: 10.0,
                    mutex_ms: 20.0,
                    sharded_ms: 5.0,
                    atomic_ms: 2.0,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_each_column_is_median_of_reps() {
        let runner = ScriptedRunner::sequence([
            summary(3.0, 30.0, 1.0, 9.0),
            summary(1.0, 10.0, 3.0, 7.0),
            summary(2.0, 20.0, 2.0, 8.0),
        ]);
        let sweep = CounterSweep::new(
            &runner,
            "p1",
            config(vec![4], 3),
            Duration::from_secs(5),
        );

        let rows = sweep.run().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].naive_ms, 2.0);
        assert_eq!(rows[0].mutex_ms, 20.0);
        assert_eq!(rows[0].sharded_ms, 2.0);
        assert_eq!(rows[0].atomic_ms, 8.0);
    }

    #[tokio::test]
    async fn test_medians_rounded_to_four_places() {
        let runner = ScriptedRunner::sequence([
            summary(1.00001, 1.0, 1.0, 1.0),
            summary(1.00004, 1.0, 1.0, 1.0),
        ]);
        let sweep = CounterSweep::new(
            &runner,
            "p1",
            config(vec![1], 2),
            Duration::from_secs(5),
        );

        let rows = sweep.run().await.unwrap();
        assert_eq!(rows[0].naive_ms, 1.0);
    }

    #[tokio::test]
    async fn test_invokes_probe_with_threads_and_iters() {
        let runner = ScriptedRunner::always(summary(1.0, 1.0, 1.0, 1.0));
        let sweep = CounterSweep::new(
            &runner,
            "bin/p1_counter",
            config(vec![1, 8], 2),
            Duration::from_secs(5),
        );

        sweep.run().await.unwrap();

        let calls: Vec<String> = runner.calls().iter().map(ToString::to_string).collect();
        assert_eq!(
            calls,
            [
                "bin/p1_counter 1 1000",
                "bin/p1_counter 1 1000",
                "bin/p1_counter 8 1000",
                "bin/p1_counter 8 1000",
            ]
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_aborts_sweep() {
        let runner = ScriptedRunner::sequence([
            summary(1.0, 1.0, 1.0, 1.0),
            summary(1.0, 1.0, 1.0, 1.0),
            ProcessOutput::new(1, "T debe ser > 0\n"),
        ]);
        let sweep = CounterSweep::new(
            &runner,
            "p1",
            config(vec![1, 2, 4], 1),
            Duration::from_secs(5),
        );

        let err = sweep.run().await.unwrap_err();

        match err {
            HarnessError::ProcessFailure { exit_code, output, .. } => {
                assert_eq!(exit_code, Some(1));
                assert!(output.contains("T debe ser"));
            },
            other => panic!("expected process failure, got {other:?}"),
        }
        assert_eq!(runner.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_summary_is_fatal() {
        let runner = ScriptedRunner::always(ProcessOutput::new(0, "T=1 iters=10\n"));
        let sweep = CounterSweep::new(
            &runner,
            "p1",
            config(vec![1, 2], 3),
            Duration::from_secs(5),
        );

        let err = sweep.run().await.unwrap_err();
        assert!(matches!(err, HarnessError::Parse { .. }));
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_is_fatal() {
        let runner = ScriptedRunner::sequence([summary(1.0, 1.0, 1.0, 1.0)]).then_timeout();
        let sweep = CounterSweep::new(
            &runner,
            "p1",
            config(vec![1, 2], 1),
            Duration::from_millis(10),
        );

        let err = sweep.run().await.unwrap_err();
        assert!(matches!(err, HarnessError::ProcessTimeout { .. }));
    }
}
