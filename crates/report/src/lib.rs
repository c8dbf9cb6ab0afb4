//! Result reporting.
//!
//! Turns finished prover runs into the fixed-format report block and
//! forwards live job output to the console.

#![warn(missing_docs)]

pub mod block;
pub mod console;

pub use block::{find_results_url, JobReport, FAILURE_GLYPH, SUCCESS_GLYPH, DIVIDER_WIDTH};
pub use console::ConsoleReporter;
