//! # Measurement
//!
//! Turning probe output into numbers and repeated numbers into one.
//!
//! - **Parsing**: last-match-wins extraction of the P1 summary and the P5
//!   elapsed-time line.
//! - **Aggregation**: exact median over repeated trials plus the rounding
//!   applied when result rows are built.

pub mod parser;
pub mod stats;

pub use parser::{
    last_match, parse_counter_summary, parse_pipeline_elapsed, CounterTrial, CounterVariant,
};
pub use stats::{median, round_to};

/// Decimal places kept in result tables.
pub const RESULT_PRECISION: u32 = 4;
