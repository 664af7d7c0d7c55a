//! Probe command lines and their captured results.

use std::fmt;
use std::path::{Path, PathBuf};

/// An executable plus its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ProbeCommand {
    /// Create a command with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one positional argument.
    #[must_use]
    pub fn arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Append several positional arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.args.extend(args.into_iter().map(|a| a.to_string()));
        self
    }

    /// Executable path.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Positional arguments.
    pub fn arguments(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for ProbeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Exit status and merged output of one child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
    /// stdout and stderr interleaved line by line in arrival order.
    pub output: String,
}

impl ProcessOutput {
    /// Output of a child that exited with `code`.
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            output: output.into(),
        }
    }

    /// Whether the child exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}
