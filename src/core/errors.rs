/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::types::{Pid, Priority};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the executor when a priority/quantum decision is
/// pushed through the commit interface
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ExecutorError {
    #[error("Executor rejected the decision: {0}")]
    #[diagnostic(
        code(executor::rejected),
        help("The executing entity refused the priority/quantum pair. Check its constraints.")
    )]
    Rejected(String),

    #[error("Executor unavailable: {0}")]
    #[diagnostic(
        code(executor::unavailable),
        help("The executing entity could not be reached. The next pass will retry.")
    )]
    Unavailable(String),
}

/// Scheduling-policy errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedError {
    #[error("Process {0} not found in scheduling table")]
    #[diagnostic(
        code(sched::unknown_process),
        help("The process was never admitted or has already been removed.")
    )]
    UnknownProcess(Pid),

    #[error("Process {0} is already scheduled")]
    #[diagnostic(
        code(sched::already_scheduled),
        help("Admission requires a handle that does not resolve to an active entry.")
    )]
    AlreadyScheduled(Pid),

    #[error("Scheduling table full: no free slot for admission")]
    #[diagnostic(
        code(sched::slot_exhausted),
        help("All table slots are occupied. Remove a process or raise the capacity.")
    )]
    SlotExhausted,

    #[error("Priority {0} outside the configured queue range")]
    #[diagnostic(
        code(sched::invalid_priority),
        help("Ceiling priorities must be below the configured number of queues.")
    )]
    InvalidPriority(Priority),

    #[error("Invalid scheduler configuration: {0}")]
    #[diagnostic(
        code(sched::invalid_config),
        help("Queue geometry and ticket bounds must be internally consistent.")
    )]
    InvalidConfig(String),

    #[error("Commit to executor failed: {0}")]
    #[diagnostic(
        code(sched::commit_failed),
        help("The executor rejected the change. Transactional callers roll back.")
    )]
    CommitFailed(#[from] ExecutorError),
}
