/*!
 * Scheduling Table Entry
 * Per-process scheduling state held in one table slot
 */

use crate::core::types::{Pid, Priority, Tickets};
use std::time::Duration;

/// One schedulable process
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ProcEntry {
    pub pid: Pid,
    /// Creating process; consulted only at admission for inheritance
    pub parent: Pid,
    /// Current queue level, `[0, num_queues)`, lower = more urgent
    pub priority: Priority,
    /// Best level this process may return to after demotion. `priority`
    /// never goes numerically below this except via lottery promotion.
    pub ceiling: Priority,
    /// Time slice granted per scheduling turn
    pub quantum: Duration,
    /// Lottery weight; zero for processes excluded from the draw
    pub tickets: Tickets,
    /// False means the slot is free
    pub active: bool,
}

impl ProcEntry {
    pub fn vacant() -> Self {
        Self {
            pid: 0,
            parent: 0,
            priority: 0,
            ceiling: 0,
            quantum: Duration::ZERO,
            tickets: 0,
            active: false,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::vacant();
    }
}
