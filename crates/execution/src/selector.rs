//! Job selection - resolve user tokens against the registry.

use proofrun_core::{JobDescriptor, SelectionToken, SpecRegistry, TokenError};
use tracing::{debug, error, warn};

/// What the caller asked to run.
#[derive(Debug, Clone, Default)]
pub struct SelectionRequest {
    /// `spec` or `contract:spec` tokens
    pub tokens: Vec<String>,
    /// Select every registered job
    pub all: bool,
}

impl SelectionRequest {
    /// Request for the given tokens.
    pub fn tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            all: false,
        }
    }

    /// Request for the whole registry.
    pub fn all() -> Self {
        Self {
            tokens: Vec::new(),
            all: true,
        }
    }
}

/// A request that cannot be satisfied. Nothing may be dispatched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Token could not be parsed
    #[error(transparent)]
    Malformed(#[from] TokenError),

    /// Tokens that matched no registered job
    #[error("requested spec(s) not found: {}", .0.join(", "))]
    NotFound(Vec<String>),
}

/// Resolves selection requests against a registry.
pub struct JobSelector<'a> {
    registry: &'a SpecRegistry,
}

impl<'a> JobSelector<'a> {
    /// Create a selector over `registry`.
    pub fn new(registry: &'a SpecRegistry) -> Self {
        Self { registry }
    }

    /// Resolve `request` into the ordered, duplicate-free job set.
    pub fn select(&self, request: &SelectionRequest) -> Result<Vec<JobDescriptor>, SelectionError> {
        if request.tokens.is_empty() && !request.all {
            warn!("No specs requested. Did you forget to toggle '--all'?");
            return Ok(Vec::new());
        }

        let tokens = request
            .tokens
            .iter()
            .map(|t| t.parse::<SelectionToken>())
            .collect::<Result<Vec<_>, _>>()?;

        // Every token must name a registered job, with or without --all.
        let unmatched: Vec<String> = tokens
            .iter()
            .filter(|token| !self.registry.jobs().iter().any(|job| token.matches(job)))
            .map(|token| token.to_string())
            .collect();

        if !unmatched.is_empty() {
            for token in &unmatched {
                error!("Requested spec '{}' not found", token);
            }
            return Err(SelectionError::NotFound(unmatched));
        }

        if request.all {
            return Ok(self.registry.jobs().to_vec());
        }

        // Registry identities are unique, so filtering in registry order
        // yields each job at most once.
        let selected: Vec<_> = self
            .registry
            .jobs()
            .iter()
            .filter(|job| tokens.iter().any(|token| token.matches(job)))
            .cloned()
            .collect();

        debug!(count = selected.len(), "selected jobs");
        Ok(selected)
    }
}
