//! Prover version probe.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::prover::{ProverConfig, ToolError};

/// Oldest major version the job options are written for.
pub const MIN_SUPPORTED_MAJOR: u32 = 4;

/// A `major.minor.patch` prover version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProverVersion {
    /// Major
    pub major: u32,
    /// Minor
    pub minor: u32,
    /// Patch
    pub patch: u32,
}

impl ProverVersion {
    /// Whether this version is recent enough.
    pub fn is_supported(&self) -> bool {
        self.major >= MIN_SUPPORTED_MAJOR
    }
}

impl std::fmt::Display for ProverVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("valid version pattern"))
}

/// Parse the first `major.minor.patch` triple in `text`.
pub fn parse_version(text: &str) -> Result<ProverVersion, ToolError> {
    let caps = version_regex()
        .captures(text)
        .ok_or_else(|| ToolError::UnparseableVersion(text.trim().to_string()))?;

    let part = |i: usize| -> Result<u32, ToolError> {
        caps[i]
            .parse()
            .map_err(|_| ToolError::UnparseableVersion(text.trim().to_string()))
    };

    Ok(ProverVersion {
        major: part(1)?,
        minor: part(2)?,
        patch: part(3)?,
    })
}

/// Run `<prover> --version` and warn when it is too old or unreadable.
///
/// Never fails the run; returns the version when one could be parsed.
pub async fn check_version(config: &ProverConfig) -> Option<ProverVersion> {
    let line = format!("{} --version", config.program);
    let output = match config.command(&line).output().await {
        Ok(output) => output,
        Err(source) => {
            let err = ToolError::Spawn {
                program: config.program.clone(),
                source,
            };
            warn!("{}", err);
            return None;
        }
    };

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    match parse_version(&text) {
        Ok(version) if version.is_supported() => {
            debug!(%version, "prover version");
            Some(version)
        }
        Ok(version) => {
            warn!(
                "Prover version {} is too old. Please update to version {}.0.0 or higher.",
                version, MIN_SUPPORTED_MAJOR
            );
            Some(version)
        }
        Err(err) => {
            warn!(
                "{}. Please update to version {}.0.0 or higher.",
                err, MIN_SUPPORTED_MAJOR
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        let version = parse_version("certora-cli 7.14.2\n").unwrap();
        assert_eq!(version, ProverVersion { major: 7, minor: 14, patch: 2 });
        assert!(version.is_supported());
        assert_eq!(version.to_string(), "7.14.2");
    }

    #[test]
    fn test_parse_version_old() {
        let version = parse_version("3.6.5").unwrap();
        assert!(!version.is_supported());
    }

    #[test]
    fn test_parse_version_garbage() {
        assert!(matches!(
            parse_version("command not found"),
            Err(ToolError::UnparseableVersion(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_check_version_reads_program_output() {
        let config = ProverConfig::new().with_program("echo certora-cli 5.0.1");
        let version = check_version(&config).await;
        assert_eq!(version, Some(ProverVersion { major: 5, minor: 0, patch: 1 }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_check_version_missing_program_is_not_fatal() {
        let config = ProverConfig::new().with_program("/nonexistent/prover-binary");
        assert_eq!(check_version(&config).await, None);
    }
}
