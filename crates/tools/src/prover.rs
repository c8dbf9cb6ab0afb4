//! Prover invocation.

use std::process::Stdio;

use proofrun_core::{JobDescriptor, DEFAULT_CERTORA_DIR};
use tokio::process::Command;

/// Errors from running the prover tool.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The process could not be started
    #[error("failed to run '{program}': {source}")]
    Spawn {
        /// Program that failed
        program: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The version output held no `major.minor.patch` triple
    #[error("could not parse prover version from '{0}'")]
    UnparseableVersion(String),
}

/// How to locate and invoke the prover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProverConfig {
    /// Executable name or path
    pub program: String,
    /// Folder holding `specs/`
    pub certora_dir: String,
    /// Spec file extension, without the dot
    pub spec_extension: String,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            program: "certoraRun".to_string(),
            certora_dir: DEFAULT_CERTORA_DIR.to_string(),
            spec_extension: "spec".to_string(),
        }
    }
}

impl ProverConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prover executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the certora folder.
    pub fn with_certora_dir(mut self, dir: impl Into<String>) -> Self {
        self.certora_dir = dir.into();
        self
    }

    /// Path of the spec file for `spec`.
    pub fn spec_path(&self, spec: &str) -> String {
        format!("{}/specs/{}.{}", self.certora_dir, spec, self.spec_extension)
    }

    /// Argument list for one job.
    ///
    /// Files, `--verify contract:specPath`, the quoted message, the job's own
    /// options split on whitespace, then `extra_options` last so they win.
    pub fn build_args(&self, job: &JobDescriptor, extra_options: &[String]) -> Vec<String> {
        let mut args = job.files.clone();
        args.push("--verify".to_string());
        args.push(format!("{}:{}", job.contract, self.spec_path(&job.spec)));
        if let Some(msg) = job.message.as_deref().filter(|m| !m.is_empty()) {
            args.push(format!("--msg \"{}\"", msg));
        }
        args.extend(job.split_options());
        args.extend(extra_options.iter().filter(|o| !o.is_empty()).cloned());
        args
    }

    /// Command line as the shell receives it.
    pub fn command_line(&self, args: &[String]) -> String {
        let mut line = self.program.clone();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Shell command running `command_line` with both output streams piped.
    pub fn command(&self, command_line: &str) -> Command {
        let mut cmd = shell();
        cmd.arg(command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

#[cfg(unix)]
fn shell() -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c");
    cmd
}

#[cfg(windows)]
fn shell() -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C");
    cmd
}
