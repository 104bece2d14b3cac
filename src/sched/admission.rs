/*!
 * Admission & Removal
 * Creates and destroys table entries, maintaining the global ticket pool
 */

use super::entry::ProcEntry;
use super::types::{AdmissionMode, StartRequest};
use super::Scheduler;
use crate::core::errors::SchedError;
use crate::core::types::{Pid, SchedResult};
use crate::monitoring::{Event, Payload, Severity};
use log::info;

impl Scheduler {
    /// Admit a process into the scheduling table.
    ///
    /// The decision is committed to the executor before the entry is marked
    /// active; a rejected commit aborts the admission and leaves the slot
    /// free.
    pub fn request_start(&self, req: StartRequest) -> SchedResult<()> {
        if req.ceiling >= self.config.num_queues {
            return Err(SchedError::InvalidPriority(req.ceiling));
        }

        let mut table = self.table.lock();
        if table.resolve(req.pid).is_ok() {
            return Err(SchedError::AlreadyScheduled(req.pid));
        }
        let slot = table.resolve_free()?;

        let (priority, quantum, tickets) = match req.mode {
            AdmissionMode::Explicit => {
                let quantum = if req.quantum.is_zero() {
                    self.config.default_quantum
                } else {
                    req.quantum
                };
                (req.ceiling, quantum, 0)
            }
            AdmissionMode::Inherit => {
                let parent_slot = table.resolve(req.parent)?;
                let parent = table.entry(parent_slot);
                (
                    self.config.baseline(),
                    parent.quantum,
                    self.config.initial_tickets,
                )
            }
        };

        self.commit(req.pid, priority, quantum)?;

        table.admit(
            slot,
            ProcEntry {
                pid: req.pid,
                parent: req.parent,
                priority,
                ceiling: req.ceiling,
                quantum,
                tickets,
                active: true,
            },
        );
        self.stats.inc_admissions();
        info!(
            "Process {} admitted ({:?}, priority={}, ceiling={}, tickets={}, pool={})",
            req.pid,
            req.mode,
            priority,
            req.ceiling,
            tickets,
            table.total_tickets()
        );
        self.emit(
            Event::new(
                Severity::Info,
                Payload::ProcessAdmitted {
                    parent: req.parent,
                    priority,
                    tickets,
                },
            )
            .with_pid(req.pid),
        );
        Ok(())
    }

    /// Remove a process from the table, returning its tickets to nobody:
    /// the pool shrinks by exactly the entry's user-tier holding.
    pub fn request_stop(&self, pid: Pid) -> SchedResult<()> {
        let mut table = self.table.lock();
        let slot = table.resolve(pid)?;
        let released = table.release(slot);
        self.stats.inc_removals();
        info!(
            "Process {} removed (tickets released={}, pool={})",
            pid,
            released.tickets,
            table.total_tickets()
        );
        self.emit(
            Event::new(
                Severity::Info,
                Payload::ProcessRemoved {
                    tickets_released: released.tickets,
                },
            )
            .with_pid(pid),
        );
        Ok(())
    }
}
