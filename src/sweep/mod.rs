//! # Parameter Sweeps
//!
//! Each sweep enumerates the cartesian product of its axes (outer axis
//! first), runs `reps` trials per combination one at a time, and reduces the
//! trials to one median row. Row order always equals enumeration order.
//!
//! A trial that exits non-zero aborts the entire sweep; nothing is retried
//! and no partial table is returned.

mod counter;
mod pipeline;

pub use counter::{CounterRow, CounterSweep};
pub use pipeline::{parse_or_time, PipelineRow, PipelineSweep, PipelineTiming, TimingSource};

use crate::error::{HarnessError, HarnessResult};
use crate::process::{ProbeCommand, ProcessRunner};
use std::time::Duration;
use tracing::error;

/// Run one trial and return its output, failing on a non-zero exit.
///
/// The full output of a failing trial is logged before the error is returned.
pub(crate) async fn run_checked<R: ProcessRunner>(
    runner: &R,
    command: &ProbeCommand,
    timeout: Duration,
) -> HarnessResult<String> {
    let result = runner.run(command, timeout).await?;
    if result.success() {
        return Ok(result.output);
    }

    error!(
        command = %command,
        exit_code = ?result.exit_code,
        "probe failed, output follows:\n{}",
        result.output
    );
    Err(HarnessError::ProcessFailure {
        program: command.to_string(),
        exit_code: result.exit_code,
        output: result.output,
    })
}
