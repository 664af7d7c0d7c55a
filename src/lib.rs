//! # Probe Harness
//!
//! Benchmark orchestration for two external concurrency probes:
//!
//! - **P1 counter**: four counter strategies timed across thread counts.
//! - **P5 pipeline**: a bounded-buffer pipeline timed across message counts,
//!   buffer capacities and per-message pauses.
//!
//! ## Architecture
//!
//! Each suite flows one way through the crate:
//!
//! 1. [`sweep`] enumerates parameter combinations and runs every trial
//!    through a [`process::ProcessRunner`].
//! 2. [`measure`] extracts timings from the probe output and reduces
//!    repeated trials to a median.
//! 3. [`report`] writes the result table as CSV, then renders charts.
//!
//! [`orchestrator::Orchestrator`] wires these together for both suites.
//! Measurement and persistence failures abort the run; chart failures are
//! logged and skipped.

pub mod config;
pub mod error;
pub mod logging;
pub mod measure;
pub mod orchestrator;
pub mod process;
pub mod report;
pub mod sweep;

pub use error::{HarnessError, HarnessResult};
pub use orchestrator::Orchestrator;
