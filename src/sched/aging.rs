/*!
 * Aging Balancer
 * Pulls demoted processes back toward their ceiling, one level per pass
 *
 * Sole anti-starvation mechanism for processes not holding the lottery
 * win: any process stops being demoted further and climbs back to its
 * ceiling in bounded time.
 */

use super::table::ProcTable;
use super::Scheduler;
use crate::monitoring::{Event, Payload, QueueChangeReason, Severity};
use log::debug;

impl Scheduler {
    /// Run one aging pass against the current table
    pub fn balance_queues(&self) {
        let mut table = self.table.lock();
        self.balance_locked(&mut table);
    }

    pub(super) fn balance_locked(&self, table: &mut ProcTable) {
        for slot in 0..table.capacity() {
            let entry = table.entry(slot);
            if !entry.active || entry.priority <= entry.ceiling {
                continue;
            }
            let (pid, from) = (entry.pid, entry.priority);
            let to = from - 1;
            table.set_priority(slot, to);
            debug!("Process {} aged {} -> {}", pid, from, to);
            self.emit(
                Event::new(
                    Severity::Debug,
                    Payload::QueueChanged {
                        from,
                        to,
                        reason: QueueChangeReason::Aged,
                    },
                )
                .with_pid(pid),
            );

            let entry = table.entry(slot);
            let (priority, quantum) = (entry.priority, entry.quantum);
            // Best-effort: a rejected commit is reported by the helper and
            // the next pass retries from the unchanged ceiling gap.
            let _ = self.commit(pid, priority, quantum);
        }
    }
}
