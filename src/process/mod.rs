//! # Process Runner
//!
//! Launches probe executables, captures their merged output, and enforces
//! a per-invocation timeout.
//!
//! One child is spawned and reaped per call; nothing here runs children
//! concurrently.

mod command;
mod runner;

pub use command::{ProbeCommand, ProcessOutput};
pub use runner::{ProcessRunner, SystemRunner, DEFAULT_TIMEOUT};
