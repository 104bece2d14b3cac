/*!
 * Process Scheduling Table
 * Fixed-capacity slot arena with incremental ticket-pool bookkeeping
 *
 * Every mutation of tickets, priority, or slot occupancy goes through the
 * methods here so `total_tickets` always equals the sum of tickets held by
 * active user-tier entries. The pool is never recomputed lazily.
 */

use super::entry::ProcEntry;
use crate::core::config::SchedConfig;
use crate::core::errors::SchedError;
use crate::core::types::{Pid, Priority, Tickets};
use dashmap::DashMap;

pub(super) struct ProcTable {
    slots: Vec<ProcEntry>,
    /// Handle -> slot index for O(1) resolution
    index: DashMap<Pid, usize>,
    /// Sum of tickets over active user-tier entries, maintained incrementally
    total_tickets: u64,
    /// Round memory: handle promoted by the most recent lottery draw
    last_winner: Option<Pid>,
    user_tier_start: Priority,
    min_tickets: Tickets,
    max_tickets: Tickets,
}

impl ProcTable {
    pub fn new(config: &SchedConfig) -> Self {
        Self {
            slots: vec![ProcEntry::vacant(); config.capacity],
            index: DashMap::new(),
            total_tickets: 0,
            last_winner: None,
            user_tier_start: config.user_tier_start,
            min_tickets: config.min_tickets,
            max_tickets: config.max_tickets,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn entry(&self, slot: usize) -> &ProcEntry {
        &self.slots[slot]
    }

    #[inline]
    pub fn total_tickets(&self) -> u64 {
        self.total_tickets
    }

    #[inline]
    pub fn last_winner(&self) -> Option<Pid> {
        self.last_winner
    }

    pub fn set_last_winner(&mut self, pid: Pid) {
        self.last_winner = Some(pid);
    }

    pub fn clear_last_winner(&mut self) {
        self.last_winner = None;
    }

    /// Resolve a handle to the slot of an active entry
    pub fn resolve(&self, pid: Pid) -> Result<usize, SchedError> {
        let slot = self
            .index
            .get(&pid)
            .map(|entry| *entry)
            .ok_or(SchedError::UnknownProcess(pid))?;
        if !self.slots[slot].active || self.slots[slot].pid != pid {
            return Err(SchedError::UnknownProcess(pid));
        }
        Ok(slot)
    }

    /// Find a free slot for admission
    pub fn resolve_free(&self) -> Result<usize, SchedError> {
        self.slots
            .iter()
            .position(|entry| !entry.active)
            .ok_or(SchedError::SlotExhausted)
    }

    #[inline]
    fn is_user_tier(&self, priority: Priority) -> bool {
        priority >= self.user_tier_start
    }

    /// Pool contribution of one entry
    #[inline]
    fn contribution(&self, entry: &ProcEntry) -> u64 {
        if entry.active && self.is_user_tier(entry.priority) {
            u64::from(entry.tickets)
        } else {
            0
        }
    }

    /// Occupy a slot with a fully populated entry
    pub fn admit(&mut self, slot: usize, mut entry: ProcEntry) {
        debug_assert!(!self.slots[slot].active, "admission into an occupied slot");
        entry.active = true;
        self.total_tickets += self.contribution(&entry);
        self.index.insert(entry.pid, slot);
        self.slots[slot] = entry;
        self.debug_check_pool();
    }

    /// Clear a slot, returning the released entry
    pub fn release(&mut self, slot: usize) -> ProcEntry {
        let entry = self.slots[slot].clone();
        self.total_tickets -= self.contribution(&entry);
        self.index.remove(&entry.pid);
        if self.last_winner == Some(entry.pid) {
            self.last_winner = None;
        }
        self.slots[slot].clear();
        self.debug_check_pool();
        entry
    }

    /// Move an entry to a new queue level, keeping the pool exact when the
    /// move crosses the user-tier boundary
    pub fn set_priority(&mut self, slot: usize, priority: Priority) {
        let before = self.contribution(&self.slots[slot]);
        self.slots[slot].priority = priority;
        let after = self.contribution(&self.slots[slot]);
        self.total_tickets = self.total_tickets - before + after;
        self.debug_check_pool();
    }

    pub fn set_ceiling(&mut self, slot: usize, ceiling: Priority) {
        self.slots[slot].ceiling = ceiling;
    }

    /// Adjust an entry's tickets by `delta`, clamped to the configured
    /// bounds. Entries holding zero tickets do not participate in the
    /// lottery and are left untouched. Returns the applied delta.
    pub fn adjust_tickets(&mut self, slot: usize, delta: i64) -> i64 {
        let held = self.slots[slot].tickets;
        if held == 0 {
            return 0;
        }
        let target = (i64::from(held) + delta)
            .clamp(i64::from(self.min_tickets), i64::from(self.max_tickets));
        let applied = target - i64::from(held);
        if applied == 0 {
            return 0;
        }
        let before = self.contribution(&self.slots[slot]);
        self.slots[slot].tickets = target as Tickets;
        let after = self.contribution(&self.slots[slot]);
        self.total_tickets = self.total_tickets - before + after;
        self.debug_check_pool();
        applied
    }

    /// Restore the transactional fields of an entry after a failed commit
    pub fn restore(&mut self, slot: usize, priority: Priority, ceiling: Priority, tickets: Tickets) {
        let before = self.contribution(&self.slots[slot]);
        let entry = &mut self.slots[slot];
        entry.priority = priority;
        entry.ceiling = ceiling;
        entry.tickets = tickets;
        let after = self.contribution(&self.slots[slot]);
        self.total_tickets = self.total_tickets - before + after;
        self.debug_check_pool();
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|entry| entry.active).count()
    }

    /// Recompute the pool from scratch; the incremental value must match
    #[cfg(any(test, debug_assertions))]
    pub fn recomputed_pool(&self) -> u64 {
        self.slots.iter().map(|entry| self.contribution(entry)).sum()
    }

    #[inline]
    fn debug_check_pool(&self) {
        debug_assert_eq!(self.total_tickets, self.recomputed_pool());
    }

    #[cfg(not(any(test, debug_assertions)))]
    #[inline]
    fn debug_check_pool(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn table() -> ProcTable {
        ProcTable::new(&SchedConfig::default().with_capacity(4))
    }

    fn user_entry(pid: Pid, tickets: Tickets) -> ProcEntry {
        ProcEntry {
            pid,
            parent: 1,
            priority: 15,
            ceiling: 15,
            quantum: Duration::from_millis(200),
            tickets,
            active: true,
        }
    }

    #[test]
    fn test_admit_and_resolve() {
        let mut table = table();
        let slot = table.resolve_free().unwrap();
        table.admit(slot, user_entry(7, 20));

        assert_eq!(table.resolve(7).unwrap(), slot);
        assert_eq!(table.total_tickets(), 20);
        assert!(table.resolve(8).is_err());
    }

    #[test]
    fn test_release_subtracts_pool_and_forgets_winner() {
        let mut table = table();
        table.admit(0, user_entry(7, 20));
        table.set_last_winner(7);

        let released = table.release(0);
        assert_eq!(released.tickets, 20);
        assert_eq!(table.total_tickets(), 0);
        assert_eq!(table.last_winner(), None);
        assert!(table.resolve(7).is_err());
    }

    #[test]
    fn test_slot_exhaustion() {
        let mut table = table();
        for pid in 0..4 {
            let slot = table.resolve_free().unwrap();
            table.admit(slot, user_entry(pid + 10, 1));
        }
        assert_eq!(table.resolve_free(), Err(SchedError::SlotExhausted));
    }

    #[test]
    fn test_tier_crossing_updates_pool() {
        let mut table = table();
        table.admit(0, user_entry(7, 20));
        assert_eq!(table.total_tickets(), 20);

        // Into the system tier: tickets leave the pool
        table.set_priority(0, 3);
        assert_eq!(table.total_tickets(), 0);

        // Back into the user tier
        table.set_priority(0, 14);
        assert_eq!(table.total_tickets(), 20);
    }

    #[test]
    fn test_adjust_tickets_clamps_and_skips_nonholders() {
        let mut table = table();
        table.admit(0, user_entry(7, 2));
        let mut zero = user_entry(8, 0);
        zero.priority = 15;
        table.admit(1, zero);

        assert_eq!(table.adjust_tickets(0, -5), -1); // floored at min
        assert_eq!(table.entry(0).tickets, 1);
        assert_eq!(table.adjust_tickets(0, 500), 99); // capped at max
        assert_eq!(table.entry(0).tickets, 100);
        assert_eq!(table.adjust_tickets(1, 1), 0); // non-participant untouched
        assert_eq!(table.entry(1).tickets, 0);
        assert_eq!(table.total_tickets(), 100);
    }

    #[test]
    fn test_restore_reconciles_pool() {
        let mut table = table();
        table.admit(0, user_entry(7, 20));
        table.set_priority(0, 3); // left the pool
        table.set_ceiling(0, 3);

        table.restore(0, 15, 15, 20);
        assert_eq!(table.entry(0).priority, 15);
        assert_eq!(table.entry(0).ceiling, 15);
        assert_eq!(table.total_tickets(), 20);
    }
}
