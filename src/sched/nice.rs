/*!
 * Priority-Change Requests
 * Transactional ceiling changes with rollback on commit failure
 */

use super::Scheduler;
use crate::core::errors::SchedError;
use crate::core::types::{Pid, Priority, SchedResult};
use crate::monitoring::{Event, Payload, Severity};
use log::{info, warn};

impl Scheduler {
    /// Set a process's ceiling priority, moving it there immediately.
    ///
    /// All-or-nothing: if the executor rejects the change, priority,
    /// ceiling, and tickets are restored byte-for-byte. Tickets are part
    /// of the saved set even though this operation does not alter them
    /// today, so future ticket-aware variants keep the same guarantee.
    pub fn request_set_ceiling(&self, pid: Pid, new_ceiling: Priority) -> SchedResult<()> {
        if new_ceiling >= self.config.num_queues {
            return Err(SchedError::InvalidPriority(new_ceiling));
        }

        let mut table = self.table.lock();
        let slot = table.resolve(pid)?;

        let entry = table.entry(slot);
        let (old_priority, old_ceiling, old_tickets) =
            (entry.priority, entry.ceiling, entry.tickets);

        table.set_priority(slot, new_ceiling);
        table.set_ceiling(slot, new_ceiling);

        let quantum = table.entry(slot).quantum;
        match self.commit(pid, new_ceiling, quantum) {
            Ok(()) => {
                info!(
                    "Process {} ceiling changed {} -> {}",
                    pid, old_ceiling, new_ceiling
                );
                self.emit(
                    Event::new(
                        Severity::Info,
                        Payload::CeilingChanged {
                            from: old_ceiling,
                            to: new_ceiling,
                        },
                    )
                    .with_pid(pid),
                );
                Ok(())
            }
            Err(err) => {
                table.restore(slot, old_priority, old_ceiling, old_tickets);
                warn!(
                    "Process {} ceiling change rolled back (commit rejected)",
                    pid
                );
                Err(err)
            }
        }
    }
}
