/*!
 * Commit Interface
 * Seam to the executor that actually context-switches and enforces quanta
 */

use crate::core::errors::ExecutorError;
use crate::core::types::{Pid, Priority};
use log::debug;
use std::time::Duration;

/// Pushes a priority/quantum decision to the executing entity.
///
/// Every policy operation that changes a process's priority or quantum
/// calls `commit` before the change is considered durable. Implementations
/// must be bounded and non-blocking: the policy core invokes this while
/// holding the table lock.
pub trait Executor: Send + Sync {
    fn commit(&self, pid: Pid, priority: Priority, quantum: Duration) -> Result<(), ExecutorError>;
}

/// Executor that only logs decisions. Useful for demos and smoke tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingExecutor;

impl Executor for LoggingExecutor {
    fn commit(&self, pid: Pid, priority: Priority, quantum: Duration) -> Result<(), ExecutorError> {
        debug!(
            "commit: pid={} priority={} quantum={:?}",
            pid, priority, quantum
        );
        Ok(())
    }
}
