//! proofrun core data models.
//!
//! Job descriptors, the spec registry, selection tokens, and run outcomes
//! shared by the execution and reporting layers.

#![warn(missing_docs)]

// Identity and descriptors
mod id;
mod job;
mod token;

// Registry
mod preset;
mod registry;

// Results
mod outcome;
mod aggregate;

// Re-exports
pub use id::JobId;
pub use job::JobDescriptor;
pub use token::{SelectionToken, TokenError};

pub use preset::{DEFAULT_CERTORA_DIR, DEFAULT_OPTIONS, PROVER_ARGS_PRESETS};
pub use registry::{RegistryError, RegistryFile, SpecRegistry};

pub use outcome::RunOutcome;
pub use aggregate::AggregateResult;
