//! Spec registry - the static, ordered set of known jobs.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::id::JobId;
use crate::job::JobDescriptor;
use crate::preset::{DEFAULT_CERTORA_DIR, DEFAULT_OPTIONS, PROVER_ARGS_PRESETS};

/// Errors raised while building a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed registry file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two jobs share the same identity
    #[error("duplicate job {0}")]
    Duplicate(JobId),

    /// Spec or contract name left empty
    #[error("job with empty spec or contract name: {0}")]
    EmptyName(JobId),
}

/// On-disk registry layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryFile {
    /// Folder holding `specs/` and `harnesses/`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certora_dir: Option<String>,

    /// Jobs in registry order
    pub specs: Vec<JobDescriptor>,
}

/// Ordered, read-only collection of job descriptors.
#[derive(Debug, Clone, Default)]
pub struct SpecRegistry {
    jobs: Vec<JobDescriptor>,
    ids: HashSet<JobId>,
    certora_dir: Option<String>,
}

impl SpecRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job at the end of the registry.
    pub fn register(&mut self, job: JobDescriptor) -> Result<(), RegistryError> {
        let id = job.id();
        if id.spec.is_empty() || id.contract.is_empty() {
            return Err(RegistryError::EmptyName(id));
        }
        if !self.ids.insert(id.clone()) {
            return Err(RegistryError::Duplicate(id));
        }
        self.jobs.push(job);
        Ok(())
    }

    /// Set the folder the registry's relative paths are based on.
    pub fn with_certora_dir(mut self, dir: impl Into<String>) -> Self {
        self.certora_dir = Some(dir.into());
        self
    }

    /// Folder declared by the registry, if any.
    pub fn certora_dir(&self) -> Option<&str> {
        self.certora_dir.as_deref()
    }

    /// All jobs in registry order.
    pub fn jobs(&self) -> &[JobDescriptor] {
        &self.jobs
    }

    /// Look up a job by identity.
    pub fn get(&self, id: &JobId) -> Option<&JobDescriptor> {
        self.jobs.iter().find(|job| job.id() == *id)
    }

    /// Number of registered jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Build a registry from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(json)?;
        let mut registry = Self {
            certora_dir: file.certora_dir,
            ..Self::default()
        };
        for job in file.specs {
            registry.register(job)?;
        }
        Ok(registry)
    }

    /// Load a registry from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let registry = Self::from_json_str(&json)?;
        debug!(path = %path.display(), jobs = registry.len(), "loaded spec registry");
        Ok(registry)
    }

    /// The registry compiled into the binary.
    pub fn builtin() -> Self {
        let dir = DEFAULT_CERTORA_DIR;
        let mut fee_flow = JobDescriptor::new("FeeFlowController", "FeeFlowControllerHarness")
            .with_file(format!("{dir}/harnesses/FeeFlowControllerHarness.sol"))
            .with_message("Test Fee flow controller buying auction")
            .with_option(PROVER_ARGS_PRESETS[0]);
        fee_flow.options.extend(DEFAULT_OPTIONS.iter().map(|o| o.to_string()));

        Self {
            ids: HashSet::from([fee_flow.id()]),
            jobs: vec![fee_flow],
            certora_dir: Some(dir.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_register_keeps_order() {
        let mut registry = SpecRegistry::new();
        registry.register(JobDescriptor::new("B", "Hb")).unwrap();
        registry.register(JobDescriptor::new("A", "Ha")).unwrap();

        let specs: Vec<_> = registry.jobs().iter().map(|j| j.spec.as_str()).collect();
        assert_eq!(specs, vec!["B", "A"]);
        assert!(registry.get(&JobId::new("A", "Ha")).is_some());
        assert!(registry.get(&JobId::new("A", "Hb")).is_none());
    }

    #[test]
    fn test_register_rejects_duplicate_identity() {
        let mut registry = SpecRegistry::new();
        registry.register(JobDescriptor::new("S", "C")).unwrap();
        let err = registry
            .register(JobDescriptor::new("S", "C").with_file("other.sol"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate(id) if id == JobId::new("S", "C")));
        assert_eq!(registry.len(), 1);

        // same spec against another contract is a different job
        registry.register(JobDescriptor::new("S", "D")).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_rejects_empty_names() {
        let mut registry = SpecRegistry::new();
        assert!(matches!(
            registry.register(JobDescriptor::new("", "C")),
            Err(RegistryError::EmptyName(_))
        ));
    }

    #[test]
    fn test_builtin_registry() {
        let registry = SpecRegistry::builtin();
        assert_eq!(registry.len(), 1);

        let job = &registry.jobs()[0];
        assert_eq!(job.spec, "FeeFlowController");
        assert_eq!(job.contract, "FeeFlowControllerHarness");
        assert_eq!(job.options.len(), 1 + DEFAULT_OPTIONS.len());
        assert_eq!(job.options[0], PROVER_ARGS_PRESETS[0]);
        assert_eq!(registry.certora_dir(), Some(DEFAULT_CERTORA_DIR));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "certora_dir": "./certora",
                "specs": [
                    {{"spec": "Vault", "contract": "VaultHarness", "files": ["a.sol"], "options": ["--send_only"]}},
                    {{"spec": "Vault", "contract": "VaultV2Harness", "files": ["b.sol"]}}
                ]
            }}"#
        )
        .unwrap();

        let registry = SpecRegistry::load(file.path()).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.certora_dir(), Some("./certora"));
        assert_eq!(registry.jobs()[1].contract, "VaultV2Harness");
    }

    #[test]
    fn test_load_rejects_duplicates_in_file() {
        let json = r#"{"specs": [{"spec": "S", "contract": "C"}, {"spec": "S", "contract": "C"}]}"#;
        assert!(matches!(
            SpecRegistry::from_json_str(json),
            Err(RegistryError::Duplicate(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SpecRegistry::load("/nonexistent/registry.json").unwrap_err();
        assert!(matches!(err, RegistryError::Io(_)));
    }
}
