//! Extraction of timings from free-form probe output.
//!
//! Probes print progress before their summary, so both extractors scan from
//! the last line backwards and keep the first hit.

use crate::error::{HarnessError, HarnessResult};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static COUNTER_SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Resumen \(ms\):\s*naive=([\d.]+)\s+mutex=([\d.]+)\s+sharded=([\d.]+)\s+atomic=([\d.]+)",
    )
    .unwrap()
});

static PIPELINE_ELAPSED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)tiempo\s*=\s*([\d.]+)\s*ms").unwrap());

/// Last line of `output` for which `extract` yields a value.
pub fn last_match<T>(output: &str, extract: impl FnMut(&str) -> Option<T>) -> Option<T> {
    output.lines().rev().find_map(extract)
}

/// The four counter strategies measured by the P1 probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterVariant {
    /// Unsynchronized increments.
    Naive,
    /// Mutex-guarded increments.
    Mutex,
    /// Per-thread counters reduced at the end.
    Sharded,
    /// Atomic fetch-add.
    Atomic,
}

impl CounterVariant {
    /// All variants in table column order.
    pub const ALL: [CounterVariant; 4] = [Self::Naive, Self::Mutex, Self::Sharded, Self::Atomic];

    /// Result-table column holding this variant.
    pub fn column(self) -> &'static str {
        match self {
            Self::Naive => "naive_ms",
            Self::Mutex => "mutex_ms",
            Self::Sharded => "sharded_ms",
            Self::Atomic => "atomic_ms",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Naive => "Naive",
            Self::Mutex => "Mutex",
            Self::Sharded => "Sharded",
            Self::Atomic => "Atomic",
        }
    }
}

impl fmt::Display for CounterVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Timings reported by one P1 trial, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterTrial {
    /// Unsynchronized counter.
    pub naive_ms: f64,
    /// Mutex counter.
    pub mutex_ms: f64,
    /// Sharded counter.
    pub sharded_ms: f64,
    /// Atomic counter.
    pub atomic_ms: f64,
}

impl CounterTrial {
    /// Timing of one variant.
    pub fn get(&self, variant: CounterVariant) -> f64 {
        match variant {
            CounterVariant::Naive => self.naive_ms,
            CounterVariant::Mutex => self.mutex_ms,
            CounterVariant::Sharded => self.sharded_ms,
            CounterVariant::Atomic => self.atomic_ms,
        }
    }
}

/// Parse the P1 summary line (`Resumen (ms): naive=.. mutex=.. sharded=.. atomic=..`).
///
/// # Errors
///
/// Returns [`HarnessError::Parse`] if no line carries a complete summary.
pub fn parse_counter_summary(output: &str) -> HarnessResult<CounterTrial> {
    last_match(output, |line| {
        let caps = COUNTER_SUMMARY.captures(line)?;
        let field = |i: usize| caps.get(i)?.as_str().parse::<f64>().ok();
        Some(CounterTrial {
            naive_ms: field(1)?,
            mutex_ms: field(2)?,
            sharded_ms: field(3)?,
            atomic_ms: field(4)?,
        })
    })
    .ok_or(HarnessError::Parse { probe: "counter" })
}

/// Parse the P5 elapsed-time line (`tiempo=<ms>ms`, any case), if present.
pub fn parse_pipeline_elapsed(output: &str) -> Option<f64> {
    last_match(output, |line| {
        PIPELINE_ELAPSED
            .captures(line)?
            .get(1)?
            .as_str()
            .parse::<f64>()
            .ok()
    })
}
