//! Prover tool integration.
//!
//! Builds prover command lines and probes the installed prover version.

#![warn(missing_docs)]

pub mod prover;
pub mod version;

pub use prover::{ProverConfig, ToolError};
pub use version::{check_version, parse_version, ProverVersion, MIN_SUPPORTED_MAJOR};
