//! Job descriptors - one prover invocation per contract/spec pair.

use serde::{Deserialize, Serialize};
use crate::id::JobId;

/// A registered prover job.
///
/// Descriptors are defined once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    /// Spec name (file stem under `specs/`)
    pub spec: String,

    /// Contract the spec is verified against
    pub contract: String,

    /// Source files handed to the prover, in order
    #[serde(default)]
    pub files: Vec<String>,

    /// Optional run message
    #[serde(default, rename = "msg", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Option strings, each possibly holding several whitespace separated flags
    #[serde(default)]
    pub options: Vec<String>,
}

impl JobDescriptor {
    /// Create a new descriptor with no files, message, or options.
    pub fn new(spec: impl Into<String>, contract: impl Into<String>) -> Self {
        Self {
            spec: spec.into(),
            contract: contract.into(),
            files: Vec::new(),
            message: None,
            options: Vec::new(),
        }
    }

    /// Add a source file.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.files.push(file.into());
        self
    }

    /// Set the run message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Add an option string.
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Identity of this job.
    pub fn id(&self) -> JobId {
        JobId::new(&self.spec, &self.contract)
    }

    /// Option strings split on whitespace, in declaration order.
    pub fn split_options(&self) -> Vec<String> {
        self.options
            .iter()
            .flat_map(|opt| opt.split_whitespace())
            .map(str::to_string)
            .collect()
    }
}
