//! Execution layer - job selection, subprocess running, and scheduling.

#![warn(missing_docs)]

pub mod selector;
pub mod watcher;
pub mod event;
pub mod runner;
pub mod scheduler;
pub mod engine;

pub use selector::{JobSelector, SelectionError, SelectionRequest};
pub use watcher::{extract_status_url, scan_defines, OutputWatcher, WatchState, PROVER_OUTPUT_BASE};
pub use event::{EventHandler, EventReceiver, EventSender, JobEvent};
pub use runner::{JobRunner, ProverRunner};
pub use scheduler::{Dispatch, Scheduler, SchedulerConfig, DEFAULT_PARALLELISM};
pub use engine::ExecutionEngine;
