//! Harness error types and result aliases.

use crate::config::ConfigError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors raised while measuring, persisting or plotting.
///
/// Everything except [`HarnessError::Render`] aborts the running suite.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The probe could not be started.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Reading the probe's output or waiting for it failed.
    #[error("I/O error while running `{program}`: {source}")]
    Io {
        /// Program being run.
        program: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The probe exited unsuccessfully.
    #[error("`{program}` failed ({})", describe_exit(.exit_code))]
    ProcessFailure {
        /// Command line of the failing trial.
        program: String,
        /// Exit code, `None` when terminated by a signal.
        exit_code: Option<i32>,
        /// Merged stdout/stderr of the failing trial.
        output: String,
    },

    /// The probe did not exit within its time budget.
    #[error("`{program}` timed out after {timeout:?}")]
    ProcessTimeout {
        /// Command line of the trial.
        program: String,
        /// Budget that was exceeded.
        timeout: Duration,
    },

    /// The probe's output carried no recognizable summary.
    #[error("no {probe} summary line found in probe output")]
    Parse {
        /// Which probe's format was expected.
        probe: &'static str,
    },

    /// Writing a result table failed.
    #[error("failed to write table '{path}': {source}")]
    Persist {
        /// Destination table.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// An output directory could not be created.
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A chart could not be rendered.
    #[error("failed to render '{path}': {message}")]
    Render {
        /// Destination image.
        path: PathBuf,
        /// Backend or slicing error message.
        message: String,
    },

    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl HarnessError {
    /// Whether this error only affects visualization.
    #[must_use]
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render { .. })
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
