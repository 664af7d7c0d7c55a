//! # Configuration System
//!
//! Settings for the harness: probe locations, sweep axes, the per-trial
//! timeout and logging.
//!
//! The binary runs with [`HarnessConfig::default`] after
//! [`HarnessConfig::validate`]. The types derive serde, so library users can
//! build them from any format; the TOML form of the defaults is:
//!
//! ## Default Configuration
//!
//! ```toml
//! [paths]
//! bin_dir = "bin"
//! data_dir = "data"
//! figs_dir = "docs/figs"
//!
//! [runner]
//! timeout_secs = 600
//!
//! [counter]
//! threads = [1, 2, 4, 8]
//! iters = 1000000
//! reps = 3
//!
//! [pipeline]
//! messages = [20000, 50000]
//! buffers = [8, 16, 32, 64, 128]
//! pause_us = [0, 500, 2000]
//! reps = 3
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! ```

mod error;
mod types;
mod validation;

pub use error::{ConfigError, ConfigResult};
pub use types::{
    CounterSweepConfig, HarnessConfig, LogFormat, LogLevel, LoggingConfig, PathsConfig,
    PipelineSweepConfig, RunnerConfig,
};
pub use validation::{
    validate_with, BasicValidator, ValidationError, ValidationResult, ValidationSeverity,
    Validator,
};
