/*!
 * Event System
 * Strongly-typed observability events for scheduling transitions
 *
 * Replaces ad-hoc print side effects: the policy code emits one event per
 * state transition and stays decoupled from whatever consumes them.
 */

use crate::core::types::{Pid, Priority, Tickets};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Event severity for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Severity {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

/// Why a process changed queues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueChangeReason {
    /// Quantum ran out without blocking
    Demoted,
    /// Periodic pass pulled the process back toward its ceiling
    Aged,
    /// Won the lottery draw
    Won,
    /// Lost the lottery draw
    Lost,
    /// Blocked cooperatively while holding the win and was re-promoted
    Rewarded,
}

/// Unified event type - all scheduling observability flows through this
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic timestamp (nanoseconds since first event)
    pub timestamp_ns: u64,
    pub severity: Severity,
    /// Process the event concerns, if any
    pub pid: Option<Pid>,
    pub payload: Payload,
}

/// Event payload - strongly typed variants for each transition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    ProcessAdmitted {
        parent: Pid,
        priority: Priority,
        tickets: Tickets,
    },
    ProcessRemoved {
        tickets_released: Tickets,
    },
    QueueChanged {
        from: Priority,
        to: Priority,
        reason: QueueChangeReason,
    },
    TicketsAdjusted {
        delta: i64,
        held: Tickets,
        pool: u64,
    },
    LotteryDrawn {
        pool: u64,
        ticket: u64,
    },
    LotterySkipped,
    WinnerRewarded {
        tickets: Tickets,
    },
    CeilingChanged {
        from: Priority,
        to: Priority,
    },
    CommitRejected {
        error: String,
    },
}

impl Event {
    /// Create a new event with current timestamp
    #[inline]
    pub fn new(severity: Severity, payload: Payload) -> Self {
        Self {
            timestamp_ns: Self::now_ns(),
            severity,
            pid: None,
            payload,
        }
    }

    /// Attach process context
    #[inline]
    pub fn with_pid(mut self, pid: Pid) -> Self {
        self.pid = Some(pid);
        self
    }

    /// Current time in nanoseconds (monotonic)
    #[inline]
    fn now_ns() -> u64 {
        static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
        let start = START.get_or_init(Instant::now);
        start.elapsed().as_nanos() as u64
    }
}
