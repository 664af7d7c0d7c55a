//! Configuration type definitions.

use super::error::ConfigResult;
use super::validation::{validate_with, BasicValidator};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure for the harness.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct HarnessConfig {
    /// Probe and artifact locations.
    pub paths: PathsConfig,

    /// Child process settings.
    pub runner: RunnerConfig,

    /// Counter (P1) sweep axes.
    pub counter: CounterSweepConfig,

    /// Pipeline (P5) sweep axes.
    pub pipeline: PipelineSweepConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl HarnessConfig {
    /// Full path of the counter probe executable.
    pub fn counter_binary(&self) -> PathBuf {
        self.paths.bin_dir.join(&self.counter.binary)
    }

    /// Full path of the pipeline probe executable.
    pub fn pipeline_binary(&self) -> PathBuf {
        self.paths.bin_dir.join(&self.pipeline.binary)
    }

    /// Check the sweep bounds with [`BasicValidator`], logging warnings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`](super::ConfigError::ValidationError)
    /// if any bound is violated.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_with(self, &[&BasicValidator])
    }
}

/// Directory layout for probes, tables and figures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the probe executables.
    pub bin_dir: PathBuf,

    /// Directory receiving the CSV tables.
    pub data_dir: PathBuf,

    /// Directory receiving the rendered charts.
    pub figs_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            bin_dir: PathBuf::from("bin"),
            data_dir: PathBuf::from("data"),
            figs_dir: Path::new("docs").join("figs"),
        }
    }
}

impl PathsConfig {
    /// Re-root every relative directory under `root`.
    #[must_use]
    pub fn rooted_at(self, root: &Path) -> Self {
        Self {
            bin_dir: root.join(self.bin_dir),
            data_dir: root.join(self.data_dir),
            figs_dir: root.join(self.figs_dir),
        }
    }
}

/// Child process settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Per-trial timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { timeout_secs: 600 }
    }
}

impl RunnerConfig {
    /// Per-trial timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Counter probe sweep: `threads × iters × reps`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CounterSweepConfig {
    /// Executable name inside `paths.bin_dir`.
    pub binary: String,

    /// Thread counts, in sweep order.
    pub threads: Vec<u32>,

    /// Increments per thread.
    pub iters: u64,

    /// Trials per thread count.
    pub reps: u32,
}

impl Default for CounterSweepConfig {
    fn default() -> Self {
        Self {
            binary: "p1_counter".to_string(),
            threads: vec![1, 2, 4, 8],
            iters: 1_000_000,
            reps: 3,
        }
    }
}

/// Pipeline probe sweep: `messages × buffers × pause_us × reps`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineSweepConfig {
    /// Executable name inside `paths.bin_dir`.
    pub binary: String,

    /// Message counts (outermost axis).
    pub messages: Vec<u64>,

    /// Bounded buffer capacities.
    pub buffers: Vec<u64>,

    /// Per-message pause in microseconds (innermost axis).
    pub pause_us: Vec<u64>,

    /// Trials per combination.
    pub reps: u32,

    /// Messages value held fixed in the charts. Defaults to the last entry of `messages`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_messages: Option<u64>,

    /// Pause held fixed in the buffer chart. Defaults to the first entry of `pause_us`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_pause_us: Option<u64>,
}

impl Default for PipelineSweepConfig {
    fn default() -> Self {
        Self {
            binary: "p5_pipeline".to_string(),
            messages: vec![20_000, 50_000],
            buffers: vec![8, 16, 32, 64, 128],
            pause_us: vec![0, 500, 2_000],
            reps: 3,
            plot_messages: None,
            plot_pause_us: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: LogLevel,

    /// Log format (json, pretty, compact).
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level (most verbose).
    Trace,
    /// Debug level.
    Debug,
    /// Info level (default).
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level (least verbose).
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (machine-readable).
    Json,
    /// Pretty multi-line format.
    Pretty,
    /// Compact single-line format (default).
    #[default]
    Compact,
}
