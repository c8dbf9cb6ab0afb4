//! Runs one prover job as a subprocess.

use std::time::Duration;

use async_trait::async_trait;
use proofrun_core::{JobDescriptor, JobId, RunOutcome};
use proofrun_tools::{check_version, ProverConfig, ToolError};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::event::{EventSender, JobEvent};
use crate::watcher::OutputWatcher;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// How long output still buffered in the pipes is collected once the
/// prover itself has exited. Background children holding the pipes open
/// are not waited for.
pub const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Runs a single job to completion.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// One-time preparation before the first job of a run is dispatched.
    async fn prepare(&self) {}

    /// Run `job`, reporting progress on `events`.
    ///
    /// Must always produce an outcome, including when the process cannot start.
    async fn run(&self, job: JobDescriptor, events: EventSender) -> RunOutcome;
}

/// Runner invoking the external prover.
pub struct ProverRunner {
    config: ProverConfig,
    extra_options: Vec<String>,
}

impl ProverRunner {
    /// Create a runner for `config`.
    pub fn new(config: ProverConfig) -> Self {
        Self {
            config,
            extra_options: Vec::new(),
        }
    }

    /// Options appended to every job, after the job's own.
    pub fn with_extra_options(mut self, options: Vec<String>) -> Self {
        self.extra_options = options;
        self
    }

    /// Prover configuration.
    pub fn config(&self) -> &ProverConfig {
        &self.config
    }
}

#[async_trait]
impl JobRunner for ProverRunner {
    async fn prepare(&self) {
        // Only warns; an unknown or old version never stops the run.
        let _ = check_version(&self.config).await;
    }

    async fn run(&self, job: JobDescriptor, events: EventSender) -> RunOutcome {
        let id = job.id();
        let args = self.config.build_args(&job, &self.extra_options);
        let command_line = self.config.command_line(&args);

        let _ = events.send(JobEvent::Started {
            job: id.clone(),
            command_line: command_line.clone(),
        });

        let mut child = match self.config.command(&command_line).spawn() {
            Ok(child) => child,
            Err(source) => {
                let err = ToolError::Spawn {
                    program: self.config.program.clone(),
                    source,
                };
                error!(spec = %job.spec, contract = %job.contract, "{}", err);
                return RunOutcome::spawn_failed(job, command_line, err.to_string());
            }
        };

        debug!(spec = %job.spec, pid = ?child.id(), "prover started");

        // Both pipes feed one channel, so chunks keep their arrival order.
        let (chunk_tx, mut chunk_rx) = mpsc::unbounded_channel();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(forward(stdout, chunk_tx.clone(), "stdout"));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(forward(stderr, chunk_tx.clone(), "stderr"));
        }
        drop(chunk_tx);

        let mut capture = Capture::new(id, events);
        let mut chunks_open = true;

        let wait = child.wait();
        tokio::pin!(wait);
        let status = loop {
            tokio::select! {
                status = &mut wait => break status,
                chunk = chunk_rx.recv(), if chunks_open => match chunk {
                    Some(chunk) => capture.push(chunk),
                    None => chunks_open = false,
                },
            }
        };

        // Whatever is already in the pipes still belongs to this job.
        let deadline = Instant::now() + OUTPUT_DRAIN_GRACE;
        while chunks_open {
            match tokio::time::timeout_at(deadline, chunk_rx.recv()).await {
                Ok(Some(chunk)) => capture.push(chunk),
                Ok(None) => chunks_open = false,
                Err(_) => {
                    warn!(spec = %job.spec, "prover exited but its output is still open; detaching");
                    break;
                }
            }
        }
        for reader in readers {
            reader.abort();
        }

        let (exit_code, signal) = match status {
            Ok(status) => (status.code(), exit_signal(&status)),
            Err(e) => {
                error!(spec = %job.spec, "failed to wait for prover: {}", e);
                (None, None)
            }
        };
        let Capture {
            output,
            early_status_url,
            ..
        } = capture;

        debug!(spec = %job.spec, ?exit_code, ?signal, bytes = output.len(), "prover exited");

        RunOutcome {
            job,
            command_line,
            exit_code,
            signal,
            early_status_url,
            output,
            spawn_error: None,
        }
    }
}

/// Output collected for one job, mirrored onto the event channel.
struct Capture {
    job: JobId,
    events: EventSender,
    watcher: OutputWatcher,
    output: Vec<u8>,
    early_status_url: Option<String>,
}

impl Capture {
    fn new(job: JobId, events: EventSender) -> Self {
        Self {
            job,
            events,
            watcher: OutputWatcher::new(),
            output: Vec::new(),
            early_status_url: None,
        }
    }

    fn push(&mut self, chunk: Vec<u8>) {
        self.output.extend_from_slice(&chunk);
        if let Some(url) = self.watcher.feed(&chunk) {
            debug!(job = %self.job, %url, "job status available");
            let _ = self.events.send(JobEvent::StatusUrl {
                job: self.job.clone(),
                url: url.clone(),
            });
            self.early_status_url = Some(url);
            self.watcher.detach();
        }
        let _ = self.events.send(JobEvent::Output {
            job: self.job.clone(),
            chunk,
        });
    }
}

/// Copy `reader` into `tx` chunk by chunk until EOF.
fn forward<R>(mut reader: R, tx: mpsc::UnboundedSender<Vec<u8>>, stream: &'static str) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; READ_CHUNK_SIZE];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) => break, // EOF
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("error reading {}: {}", stream, e);
                    break;
                }
            }
        }
    })
}

#[cfg(unix)]
fn exit_signal(status: &std::process::ExitStatus) -> Option<String> {
    use std::os::unix::process::ExitStatusExt;

    status.signal().map(|sig| match sig {
        1 => "SIGHUP".to_string(),
        2 => "SIGINT".to_string(),
        6 => "SIGABRT".to_string(),
        9 => "SIGKILL".to_string(),
        11 => "SIGSEGV".to_string(),
        15 => "SIGTERM".to_string(),
        other => format!("signal {}", other),
    })
}

#[cfg(not(unix))]
fn exit_signal(_status: &std::process::ExitStatus) -> Option<String> {
    None
}
