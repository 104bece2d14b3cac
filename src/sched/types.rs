/*!
 * Scheduler Types
 * Request and snapshot types shared by the policy operations
 */

use crate::core::types::{Pid, Priority, Tickets};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a process enters the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionMode {
    /// Priority and quantum come from the request; no tickets are granted
    /// and the process never enters the lottery. Used for processes whose
    /// resource shares are assigned externally.
    Explicit,
    /// Priority starts at the baseline user entry level, quantum is copied
    /// from the parent, and the standard ticket grant is issued.
    Inherit,
}

/// Admission request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
    pub pid: Pid,
    pub parent: Pid,
    pub mode: AdmissionMode,
    /// Best priority the process is entitled to return to
    pub ceiling: Priority,
    /// Quantum for explicit admissions; ignored when inheriting
    pub quantum: Duration,
}

impl StartRequest {
    pub fn explicit(pid: Pid, ceiling: Priority, quantum: Duration) -> Self {
        Self {
            pid,
            parent: pid,
            mode: AdmissionMode::Explicit,
            ceiling,
            quantum,
        }
    }

    pub fn inherit(pid: Pid, parent: Pid, ceiling: Priority) -> Self {
        Self {
            pid,
            parent,
            mode: AdmissionMode::Inherit,
            ceiling,
            quantum: Duration::ZERO,
        }
    }
}

/// Result of one lottery draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// The handle promoted to the privileged queue for this round
    Winner(Pid),
    /// Empty ticket pool: the draw was skipped, nothing changed
    NoEligible,
}

/// Counters snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedStats {
    pub admissions: u64,
    pub removals: u64,
    pub expirations: u64,
    pub demotions: u64,
    pub promotions: u64,
    pub draws: u64,
    pub commit_failures: u64,
    pub active_processes: usize,
    pub total_tickets: u64,
}

/// Per-process scheduling snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessStats {
    pub pid: Pid,
    pub parent: Pid,
    pub priority: Priority,
    pub ceiling: Priority,
    pub quantum_micros: u64,
    pub tickets: Tickets,
    /// Whether this process holds the current lottery win
    pub is_winner: bool,
}
