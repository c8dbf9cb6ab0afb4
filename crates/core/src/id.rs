//! Identity of a prover job.

use serde::{Deserialize, Serialize};

/// Unique identity of a job: the `(spec, contract)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId {
    /// Spec name
    pub spec: String,
    /// Contract name
    pub contract: String,
}

impl JobId {
    /// Create a new job identity.
    pub fn new(spec: impl Into<String>, contract: impl Into<String>) -> Self {
        Self {
            spec: spec.into(),
            contract: contract.into(),
        }
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.contract, self.spec)
    }
}
