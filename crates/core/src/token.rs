//! Selection tokens: `spec` or `contract:spec`.

use std::str::FromStr;
use crate::job::JobDescriptor;

/// A user supplied request for one or more registered jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionToken {
    raw: String,
    spec: String,
    contract: Option<String>,
}

/// Error returned when a token cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Token holds more than one `:`
    #[error("token '{0}' has more than one ':' separator")]
    TooManySeparators(String),

    /// Spec part is empty
    #[error("token '{0}' does not name a spec")]
    MissingSpec(String),
}

impl SelectionToken {
    /// Token exactly as supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Requested spec name.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Requested contract name, if constrained.
    pub fn contract(&self) -> Option<&str> {
        self.contract.as_deref()
    }

    /// Whether `job` satisfies this token.
    pub fn matches(&self, job: &JobDescriptor) -> bool {
        job.spec == self.spec
            && self.contract.as_deref().map_or(true, |c| c == job.contract)
    }
}

impl FromStr for SelectionToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (contract, spec) = match s.split_once(':') {
            Some((_, rest)) if rest.contains(':') => {
                return Err(TokenError::TooManySeparators(s.to_string()));
            }
            // An empty contract part leaves the contract unconstrained
            Some((contract, spec)) => {
                ((!contract.is_empty()).then(|| contract.to_string()), spec)
            }
            None => (None, s),
        };

        if spec.is_empty() {
            return Err(TokenError::MissingSpec(s.to_string()));
        }

        Ok(Self {
            raw: s.to_string(),
            spec: spec.to_string(),
            contract,
        })
    }
}

impl std::fmt::Display for SelectionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
