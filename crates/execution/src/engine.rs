//! The orchestration engine - select, dispatch, and fold results.

use std::sync::Arc;

use proofrun_core::{AggregateResult, JobDescriptor, SpecRegistry};
use tracing::{error, info, warn};

use crate::event::{EventHandler, JobEvent};
use crate::runner::JobRunner;
use crate::scheduler::{Scheduler, SchedulerConfig};
use crate::selector::{JobSelector, SelectionRequest};

/// Drives selected jobs through the scheduler and hands every event to one
/// handler, one event at a time.
///
/// ```text
/// Select → Dispatch (≤ N at once) → Stream events → Fold outcomes
/// ```
pub struct ExecutionEngine<R: JobRunner + ?Sized> {
    runner: Arc<R>,
    scheduler: Scheduler,
}

impl<R: JobRunner + ?Sized + 'static> ExecutionEngine<R> {
    /// Create an engine with the default scheduler.
    pub fn new(runner: Arc<R>) -> Self {
        Self {
            runner,
            scheduler: Scheduler::default(),
        }
    }

    /// Set the scheduler configuration.
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.scheduler = Scheduler::new(config);
        self
    }

    /// Resolve `request` against `registry` and run the selected jobs.
    ///
    /// A selection error fails the run before any process starts.
    pub async fn run<H: EventHandler>(
        &self,
        registry: &SpecRegistry,
        request: &SelectionRequest,
        handler: &mut H,
    ) -> AggregateResult {
        match JobSelector::new(registry).select(request) {
            Ok(jobs) => self.run_jobs(jobs, handler).await,
            Err(e) => {
                error!("{}", e);
                let mut result = AggregateResult::new();
                result.fold(true);
                result
            }
        }
    }

    /// Run `jobs` and wait until every one of them has been reported.
    ///
    /// The runner is prepared once, and only when there is something to run.
    pub async fn run_jobs<H: EventHandler>(
        &self,
        jobs: Vec<JobDescriptor>,
        handler: &mut H,
    ) -> AggregateResult {
        let mut result = AggregateResult::new();
        if jobs.is_empty() {
            info!("Nothing to run");
            return result;
        }

        self.runner.prepare().await;

        info!(jobs = jobs.len(), "starting prover jobs");
        let mut dispatch = self.scheduler.dispatch(jobs, self.runner.clone());
        let mut finished = 0usize;

        while let Some(event) = dispatch.events.recv().await {
            if let JobEvent::Finished(outcome) = &event {
                finished += 1;
                result.fold_outcome(outcome);
                if let Some(reason) = outcome.failure_reason() {
                    error!(
                        spec = %outcome.job.spec,
                        contract = %outcome.job.contract,
                        "[{}] Exited with code {}",
                        outcome.job.spec,
                        reason
                    );
                }
            }

            if let Err(e) = handler.handle(&event) {
                warn!(job = %event.job(), "failed to write job output: {}", e);
            }
        }

        // A job task that panicked never reports; count it as failed.
        if finished < dispatch.dispatched {
            error!(
                missing = dispatch.dispatched - finished,
                "some jobs ended without reporting a result"
            );
            result.fold(true);
        }

        info!(jobs = finished, failed = result.is_failure(), "all prover jobs finished");
        result
    }
}
