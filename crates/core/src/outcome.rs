//! Result of one finished prover process.

use std::borrow::Cow;
use crate::job::JobDescriptor;

/// Captured result of a job's subprocess.
///
/// Produced once when the process exits and handed to the reporter.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The job that ran
    pub job: JobDescriptor,

    /// Command line as echoed to the operator
    pub command_line: String,

    /// Exit code, absent when killed by a signal or never started
    pub exit_code: Option<i32>,

    /// Terminating signal, if any
    pub signal: Option<String>,

    /// Status URL seen in the live stream before exit
    pub early_status_url: Option<String>,

    /// Merged stdout/stderr in arrival order
    pub output: Vec<u8>,

    /// Set when the process could not be started at all
    pub spawn_error: Option<String>,
}

impl RunOutcome {
    /// Outcome for a job whose process never started.
    pub fn spawn_failed(job: JobDescriptor, command_line: String, error: impl Into<String>) -> Self {
        Self {
            job,
            command_line,
            exit_code: None,
            signal: None,
            early_status_url: None,
            output: Vec::new(),
            spawn_error: Some(error.into()),
        }
    }

    /// Exit code 0 and no signal.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && self.signal.is_none()
    }

    /// Full output decoded as UTF-8, lossily.
    pub fn output_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }

    /// Short description of why the job failed, `None` on success.
    pub fn failure_reason(&self) -> Option<String> {
        if self.success() {
            return None;
        }
        if let Some(error) = &self.spawn_error {
            return Some(format!("failed to start: {}", error));
        }
        match (&self.signal, self.exit_code) {
            (Some(signal), _) => Some(signal.clone()),
            (None, Some(code)) => Some(code.to_string()),
            (None, None) => Some("unknown".to_string()),
        }
    }
}
