//! Events flowing from running jobs to the single orchestration loop.

use proofrun_core::{JobId, RunOutcome};
use tokio::sync::mpsc;

/// Something that happened to a dispatched job.
#[derive(Debug, Clone)]
pub enum JobEvent {
    /// The prover process is about to start
    Started {
        /// Job
        job: JobId,
        /// Command line being run
        command_line: String,
    },
    /// A chunk of merged stdout/stderr
    Output {
        /// Job
        job: JobId,
        /// Raw bytes as read
        chunk: Vec<u8>,
    },
    /// Tracking identifiers appeared in the stream
    StatusUrl {
        /// Job
        job: JobId,
        /// Live status URL
        url: String,
    },
    /// The process exited
    Finished(RunOutcome),
}

impl JobEvent {
    /// Job this event belongs to.
    pub fn job(&self) -> JobId {
        match self {
            Self::Started { job, .. } | Self::Output { job, .. } | Self::StatusUrl { job, .. } => {
                job.clone()
            }
            Self::Finished(outcome) => outcome.job.id(),
        }
    }
}

/// Sending half handed to runners.
pub type EventSender = mpsc::UnboundedSender<JobEvent>;

/// Receiving half drained by the engine.
pub type EventReceiver = mpsc::UnboundedReceiver<JobEvent>;

/// Consumer of job events.
///
/// Called from one loop only, so implementations need no locking.
pub trait EventHandler {
    /// Handle one event.
    fn handle(&mut self, event: &JobEvent) -> std::io::Result<()>;
}
