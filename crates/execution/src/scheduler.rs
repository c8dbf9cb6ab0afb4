//! Bounded-concurrency job scheduling.

use std::num::NonZeroUsize;
use std::sync::Arc;

use proofrun_core::JobDescriptor;
use tokio::sync::{mpsc, Semaphore};
use tracing::debug;

use crate::event::{EventReceiver, JobEvent};
use crate::runner::JobRunner;

/// Default number of provers running at once.
pub const DEFAULT_PARALLELISM: usize = 4;

/// Scheduler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Max concurrent jobs
    pub max_parallel: NonZeroUsize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_parallel: NonZeroUsize::new(DEFAULT_PARALLELISM).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl SchedulerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max concurrent jobs.
    pub fn with_max_parallel(mut self, max: NonZeroUsize) -> Self {
        self.max_parallel = max;
        self
    }
}

/// Jobs handed to the scheduler and the stream of their events.
pub struct Dispatch {
    /// Number of jobs that will run
    pub dispatched: usize,
    /// Closed once every job has finished
    pub events: EventReceiver,
}

/// Runs jobs through a counting permit pool.
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    /// Create a scheduler.
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Start every job, at most `max_parallel` at a time.
    ///
    /// Jobs start in the given order. Each job ends with a
    /// [`JobEvent::Finished`]; the event channel closes after the last one.
    /// Must be called from within a tokio runtime.
    pub fn dispatch<R>(&self, jobs: Vec<JobDescriptor>, runner: Arc<R>) -> Dispatch
    where
        R: JobRunner + ?Sized + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatched = jobs.len();
        let permits = Arc::new(Semaphore::new(self.config.max_parallel.get()));

        tokio::spawn(async move {
            for job in jobs {
                // the pool is never closed
                let Ok(permit) = permits.clone().acquire_owned().await else {
                    break;
                };
                debug!(spec = %job.spec, contract = %job.contract, "dispatching job");

                let runner = runner.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let outcome = runner.run(job, tx.clone()).await;
                    drop(permit);
                    let _ = tx.send(JobEvent::Finished(outcome));
                });
            }
        });

        Dispatch { dispatched, events: rx }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}
